use uuid::Uuid;

use kernel::prelude::entity::{CartItem, DestructCartItem, PurchaseKind};

#[derive(Debug, Clone)]
pub struct CartItemDto {
    pub id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub kind: PurchaseKind,
    pub quantity: i32,
    pub rent_weeks: Option<i32>,
    pub security_deposit: Option<i64>,
    pub unit_price: i64,
    pub price: i64,
}

impl From<CartItem> for CartItemDto {
    fn from(value: CartItem) -> Self {
        let DestructCartItem {
            id,
            book_id,
            title,
            author,
            image_url,
            kind,
            quantity,
            rent_weeks,
            security_deposit,
            unit_price,
            price,
        } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            title,
            author,
            image_url,
            kind,
            quantity: quantity.count(),
            rent_weeks: rent_weeks.map(|weeks| weeks.count()),
            security_deposit: security_deposit.map(|price| price.amount()),
            unit_price: unit_price.amount(),
            price: price.amount(),
        }
    }
}

pub struct AddToCartDto {
    pub book_id: Uuid,
    pub kind: PurchaseKind,
    pub quantity: i32,
    pub rent_weeks: Option<i32>,
}

pub struct RemoveCartItemDto {
    pub id: Uuid,
}

pub struct ChangeQuantityDto {
    pub id: Uuid,
    pub quantity: i32,
}

pub struct ChangeRentWeeksDto {
    pub id: Uuid,
    pub weeks: i32,
}
