mod address;
mod id;
mod status;

pub use self::{address::*, id::*, status::*};

use destructure::Destructure;
use vodca::References;

use crate::entity::common::{CreatedAt, Price};
use crate::entity::{CartItem, UserId};

/// Processing fee applied on top of the cart subtotal.
pub const ORDER_FEE_RATE: f64 = 0.05;

/// Snapshot of a cart at placement time. Immutable once created.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    items: Vec<CartItem>,
    total_amount: Price,
    payment_method: String,
    address: Address,
    status: OrderStatus,
    created_at: CreatedAt<Order>,
}

impl Order {
    pub fn place(
        id: OrderId,
        user_id: UserId,
        items: Vec<CartItem>,
        payment_method: impl Into<String>,
        address: Address,
    ) -> Self {
        let total_amount = Self::total_with_fee(&items);
        Self {
            id,
            user_id,
            items,
            total_amount,
            payment_method: payment_method.into(),
            address,
            status: OrderStatus::Confirmed,
            created_at: CreatedAt::now(),
        }
    }

    /// Subtotal plus the 5% fee, rounded once.
    pub fn total_with_fee(items: &[CartItem]) -> Price {
        let subtotal: i64 = items.iter().map(|item| item.price().amount()).sum();
        let fee = (subtotal as f64 * ORDER_FEE_RATE).round() as i64;
        Price::new(subtotal + fee)
    }
}
