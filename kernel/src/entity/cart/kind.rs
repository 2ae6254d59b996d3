use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

/// How a line item acquires the book: outright purchase or weekly rental.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseKind {
    Buy,
    Rent,
}

impl PurchaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseKind::Buy => "BUY",
            PurchaseKind::Rent => "RENT",
        }
    }
}

impl FromStr for PurchaseKind {
    type Err = Report<KernelError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "BUY" => Ok(PurchaseKind::Buy),
            "RENT" => Ok(PurchaseKind::Rent),
            other => Err(Report::new(KernelError::Validation)
                .attach_printable(format!("unknown purchase kind: {other}"))),
        }
    }
}
