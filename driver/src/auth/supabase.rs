use error_stack::Report;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use kernel::interface::auth::{AuthEvent, AuthProvider, AuthSession, SignUpOutcome};
use kernel::prelude::entity::{UserId, UserName};
use kernel::KernelError;

use crate::env;
use crate::error::{ConvertError, DriverError};

static SUPABASE_URL: &str = "SUPABASE_URL";
static SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// GoTrue password-grant client. Holds the live session in memory and
/// broadcasts every sign-in/sign-out so state holders can react.
pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<StoredSession>>,
    events: broadcast::Sender<AuthEvent>,
}

struct StoredSession {
    access_token: String,
    session: AuthSession,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUserRecord,
}

#[derive(Deserialize)]
struct AuthUserRecord {
    id: Uuid,
    email: String,
    #[serde(default)]
    user_metadata: UserMetadataRecord,
}

#[derive(Deserialize, Default)]
struct UserMetadataRecord {
    full_name: Option<String>,
}

/// Sign-up responds with a session only when email confirmation is off.
#[derive(Deserialize)]
struct SignUpResponse {
    session: Option<TokenResponse>,
}

#[derive(Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl SupabaseAuth {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        let base_url = env(SUPABASE_URL).convert_error()?;
        let anon_key = env(SUPABASE_ANON_KEY).convert_error()?;
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key,
            session: RwLock::new(None),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn session_of(user: &AuthUserRecord) -> AuthSession {
        AuthSession::new(
            UserId::new(user.id),
            user.email.clone(),
            user.user_metadata.full_name.clone().map(UserName::new),
        )
    }

    async fn adopt(&self, token: TokenResponse) -> AuthSession {
        let session = Self::session_of(&token.user);
        *self.session.write().await = Some(StoredSession {
            access_token: token.access_token,
            session: session.clone(),
        });
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        session
    }

    /// Maps the provider's well-known failure messages onto something a
    /// person can act on; anything else passes through verbatim.
    async fn translate_failure(response: reqwest::Response) -> Report<KernelError> {
        let status = response.status();
        let detail = response
            .json::<AuthErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error_description.or(body.msg))
            .unwrap_or_else(|| format!("auth request failed with status {status}"));
        let report = Report::new(KernelError::Auth);
        if detail.contains("Email not confirmed") {
            report.attach_printable("confirm your email address before signing in")
        } else if detail.contains("Invalid login credentials") {
            report.attach_printable("invalid email or password")
        } else {
            report.attach_printable(detail)
        }
    }
}

#[async_trait::async_trait]
impl AuthProvider for SupabaseAuth {
    async fn current_session(&self) -> error_stack::Result<Option<AuthSession>, KernelError> {
        let stored = self.session.read().await;
        Ok(stored.as_ref().map(|stored| stored.session.clone()))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &UserName,
    ) -> error_stack::Result<SignUpOutcome, KernelError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": name.as_ref() },
            }))
            .send()
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        if !response.status().is_success() {
            return Err(Self::translate_failure(response).await);
        }
        let body = response
            .json::<SignUpResponse>()
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        match body.session {
            Some(token) => Ok(SignUpOutcome::SignedIn(self.adopt(token).await)),
            None => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> error_stack::Result<AuthSession, KernelError> {
        let response = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        if !response.status().is_success() {
            return Err(Self::translate_failure(response).await);
        }
        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        Ok(self.adopt(token).await)
    }

    async fn sign_out(&self) -> error_stack::Result<(), KernelError> {
        let stored = self.session.write().await.take();
        if let Some(stored) = stored {
            let response = self
                .http
                .post(format!("{}/auth/v1/logout", self.base_url))
                .header("apikey", &self.anon_key)
                .bearer_auth(&stored.access_token)
                .send()
                .await;
            match response {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!("remote sign-out failed with status {}", response.status());
                }
                Err(error) => tracing::warn!("remote sign-out failed: {error}"),
                Ok(_) => {}
            }
        }
        // The local session is gone either way.
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }
}
