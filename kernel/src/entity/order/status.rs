use serde::{Deserialize, Serialize};

/// Orders are historical records; `Confirmed` is the only modeled state and
/// no further transitions exist.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "Confirmed",
        }
    }
}
