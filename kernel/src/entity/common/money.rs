use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Whole-rupee amount. Line totals and fees stay in integers; each
/// computation rounds once, never cumulatively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Fromln,
    AsRefln,
)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn new(amount: impl Into<i64>) -> Self {
        Self(amount.into())
    }

    pub fn amount(&self) -> i64 {
        self.0
    }
}
