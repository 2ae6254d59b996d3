use destructure::Destructure;
use vodca::References;

use crate::entity::{UserId, UserName};
use crate::KernelError;

/// Authenticated identity as reported by the hosted auth collaborator.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct AuthSession {
    user_id: UserId,
    email: String,
    display_name: Option<UserName>,
}

impl AuthSession {
    pub fn new(user_id: UserId, email: impl Into<String>, display_name: Option<UserName>) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name,
        }
    }
}

/// Emitted by the provider whenever the session changes; the application
/// repopulates or clears its in-memory user and cart state in response.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(AuthSession),
    /// The provider wants the address verified before the first sign-in.
    ConfirmationRequired,
}

#[async_trait::async_trait]
pub trait AuthProvider: 'static + Sync + Send {
    async fn current_session(&self) -> error_stack::Result<Option<AuthSession>, KernelError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &UserName,
    ) -> error_stack::Result<SignUpOutcome, KernelError>;

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> error_stack::Result<AuthSession, KernelError>;

    async fn sign_out(&self) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnAuthProvider: 'static + Sync + Send {
    type AuthProvider: AuthProvider;
    fn auth_provider(&self) -> &Self::AuthProvider;
}
