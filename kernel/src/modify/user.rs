use crate::entity::User;
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserModifier<Connection: Send>: 'static + Sync + Send {
    /// Creates or replaces the profile row keyed by the user's identity.
    async fn upsert(
        &self,
        con: &mut Connection,
        user: &User,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnUserModifier<Connection: Send>: 'static + Sync + Send {
    type UserModifier: UserModifier<Connection>;
    fn user_modifier(&self) -> &Self::UserModifier;
}
