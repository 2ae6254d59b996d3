use crate::entity::{CartItem, CartItemId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartModifier<Connection: Send>: 'static + Sync + Send {
    /// Inserts a line and returns the identity issued by the store.
    async fn insert(
        &self,
        con: &mut Connection,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<CartItemId, KernelError>;

    /// Pushes an already-recomputed quantity/duration/price triple.
    async fn update_pricing(
        &self,
        con: &mut Connection,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError>;

    async fn delete(
        &self,
        con: &mut Connection,
        id: &CartItemId,
    ) -> error_stack::Result<(), KernelError>;

    /// Removes every line belonging to the user (order placement).
    async fn clear(
        &self,
        con: &mut Connection,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnCartModifier<Connection: Send>: 'static + Sync + Send {
    type CartModifier: CartModifier<Connection>;
    fn cart_modifier(&self) -> &Self::CartModifier;
}
