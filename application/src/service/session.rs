use kernel::interface::auth::{
    AuthEvent, AuthProvider, AuthSession, DependOnAuthProvider, SignUpOutcome,
};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{CartQuery, DependOnCartQuery, DependOnUserQuery, UserQuery};
use kernel::prelude::entity::{CartItem, User, UserId, UserName};
use kernel::KernelError;

use crate::service::user::profile_from_session;
use crate::state::DependOnStoreState;
use crate::transfer::{SignInDto, SignUpDto, UserDto};

#[async_trait::async_trait]
pub trait SessionService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnAuthProvider
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnCartQuery<Connection>
    + DependOnStoreState
{
    async fn sign_in(&mut self, dto: SignInDto) -> error_stack::Result<UserDto, KernelError> {
        let session = self
            .auth_provider()
            .sign_in(&dto.email, &dto.password)
            .await?;
        Ok(self.adopt_session(&session).await)
    }

    /// `None` means the provider wants the email address confirmed before
    /// the first sign-in.
    async fn sign_up(
        &mut self,
        dto: SignUpDto,
    ) -> error_stack::Result<Option<UserDto>, KernelError> {
        let outcome = self
            .auth_provider()
            .sign_up(&dto.email, &dto.password, &UserName::new(dto.name))
            .await?;
        match outcome {
            SignUpOutcome::SignedIn(session) => Ok(Some(self.adopt_session(&session).await)),
            SignUpOutcome::ConfirmationRequired => Ok(None),
        }
    }

    async fn sign_out(&mut self) -> error_stack::Result<(), KernelError> {
        self.auth_provider().sign_out().await?;
        self.store_state_mut().clear_session();
        Ok(())
    }

    /// Reaction to the provider's change feed.
    async fn handle_auth_event(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) => {
                self.adopt_session(&session).await;
            }
            AuthEvent::SignedOut => self.store_state_mut().clear_session(),
        }
    }

    /// A fresh session never fails on collaborator hiccups: an unreachable
    /// profile degrades to the bare session identity and an unreachable
    /// cart to an empty one, both logged.
    async fn adopt_session(&mut self, session: &AuthSession) -> UserDto {
        let user = match self.fetch_profile(session).await {
            Ok(user) => user,
            Err(report) => {
                tracing::warn!("profile load failed: {report:?}");
                profile_from_session(session)
            }
        };
        let user_id = user.id().clone();
        self.store_state_mut().set_user(Some(user.clone()));
        match self.fetch_cart(&user_id).await {
            Ok(cart) => self.store_state_mut().replace_cart(cart),
            Err(report) => tracing::warn!("cart reload failed: {report:?}"),
        }
        UserDto::from(user)
    }

    async fn fetch_profile(
        &self,
        session: &AuthSession,
    ) -> error_stack::Result<User, KernelError> {
        let mut con = self.database_connection().acquire().await?;
        let stored = self
            .user_query()
            .find_by_id(&mut con, session.user_id())
            .await?;
        Ok(stored.unwrap_or_else(|| profile_from_session(session)))
    }

    async fn fetch_cart(
        &self,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        let mut con = self.database_connection().acquire().await?;
        self.cart_query().find_by_user(&mut con, user_id).await
    }
}

impl<Connection: Send, T> SessionService<Connection> for T where
    T: DependOnAuthProvider
        + DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnCartQuery<Connection>
        + DependOnStoreState
{
}
