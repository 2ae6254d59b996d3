use crate::entity::{CartItem, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartQuery<Connection: Send>: Sync + Send + 'static {
    /// The user's persisted cart, oldest line first.
    async fn find_by_user(
        &self,
        con: &mut Connection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError>;
}

pub trait DependOnCartQuery<Connection: Send>: Sync + Send + 'static {
    type CartQuery: CartQuery<Connection>;
    fn cart_query(&self) -> &Self::CartQuery;
}
