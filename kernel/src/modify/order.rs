use crate::entity::Order;
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderModifier<Connection: Send>: 'static + Sync + Send {
    async fn insert(
        &self,
        con: &mut Connection,
        order: &Order,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnOrderModifier<Connection: Send>: 'static + Sync + Send {
    type OrderModifier: OrderModifier<Connection>;
    fn order_modifier(&self) -> &Self::OrderModifier;
}
