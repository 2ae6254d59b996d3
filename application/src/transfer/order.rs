use uuid::Uuid;

use kernel::prelude::entity::{Address, AddressKind, DestructOrder, Order};

use crate::transfer::CartItemDto;

pub struct AddressDto {
    pub full_name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub secondary_phone: Option<String>,
    pub house_no: String,
    pub floor_no: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub kind: AddressKind,
}

impl From<AddressDto> for Address {
    fn from(value: AddressDto) -> Self {
        Address {
            full_name: value.full_name,
            email: value.email,
            country_code: value.country_code,
            phone: value.phone,
            secondary_phone: value.secondary_phone,
            house_no: value.house_no,
            floor_no: value.floor_no,
            street: value.street,
            city: value.city,
            state: value.state,
            country: value.country,
            zip: value.zip,
            kind: value.kind,
        }
    }
}

pub struct PlaceOrderDto {
    pub payment_method: String,
    pub address: AddressDto,
}

#[derive(Debug, Clone)]
pub struct OrderDto {
    pub id: Uuid,
    pub items: Vec<CartItemDto>,
    pub total_amount: i64,
    pub payment_method: String,
    pub status: String,
}

impl From<Order> for OrderDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            user_id: _,
            items,
            total_amount,
            payment_method,
            address: _,
            status,
            created_at: _,
        } = value.into_destruct();
        Self {
            id: id.into(),
            items: items.into_iter().map(CartItemDto::from).collect(),
            total_amount: total_amount.amount(),
            payment_method,
            status: status.as_str().to_string(),
        }
    }
}
