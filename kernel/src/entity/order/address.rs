use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressKind {
    Home,
    Office,
}

/// Shipping address exactly as collected by the checkout form. Plain data,
/// stored verbatim alongside the order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Address {
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
