use error_stack::Report;

use kernel::interface::auth::AuthSession;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{BookId, User, UserName};
use kernel::KernelError;

use crate::state::DependOnStoreState;
use crate::transfer::{GetBookDto, UpdateProfileDto, UserDto};

/// Identity to show before (or instead of) a stored profile row: the
/// display name if the provider has one, otherwise the mailbox name.
pub(crate) fn profile_from_session(session: &AuthSession) -> User {
    let name = session.display_name().clone().unwrap_or_else(|| {
        let mailbox = session.email().split('@').next().unwrap_or("reader");
        UserName::new(mailbox)
    });
    User::from_session(session.user_id().clone(), name, session.email().clone())
}

#[async_trait::async_trait]
pub trait ProfileService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserQuery<Connection>
    + DependOnUserModifier<Connection>
    + DependOnStoreState
{
    async fn update_profile(
        &mut self,
        dto: UpdateProfileDto,
    ) -> error_stack::Result<UserDto, KernelError> {
        let user = self.store_state().user().cloned().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to edit your profile")
        })?;
        let user = user.reconstruct(|user| {
            user.name = UserName::new(dto.name);
            user.avatar = dto.avatar;
        });
        let mut con = self.database_connection().acquire().await?;
        self.user_modifier().upsert(&mut con, &user).await?;
        self.store_state_mut().set_user(Some(user.clone()));
        Ok(UserDto::from(user))
    }

    /// Favorites toggle locally first and settle last-writer-wins; a failed
    /// push is logged only.
    async fn toggle_favorite(
        &mut self,
        dto: GetBookDto,
    ) -> error_stack::Result<UserDto, KernelError> {
        let user = self.store_state().user().cloned().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to save favorites")
        })?;
        let user = user.toggle_favorite(BookId::new(dto.id));
        self.store_state_mut().set_user(Some(user.clone()));
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self.user_modifier().upsert(&mut con, &user).await {
                    tracing::warn!("favorite update failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for favorite update failed: {report:?}"),
        }
        Ok(UserDto::from(user))
    }

    async fn load_profile(
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
}

impl<Connection: Send, T> ProfileService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserQuery<Connection>
        + DependOnUserModifier<Connection>
        + DependOnStoreState
{
}
