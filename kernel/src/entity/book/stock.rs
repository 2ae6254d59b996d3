use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Remaining purchasable copies of a book.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Stock(i32);

impl Stock {
    pub fn new(count: impl Into<i32>) -> Self {
        Self(count.into())
    }

    /// Stock left after a purchase, floored at zero.
    pub fn decrement(&self, purchased: i32) -> Self {
        Self((self.0 - purchased).max(0))
    }

    pub fn covers(&self, requested: i32) -> bool {
        requested <= self.0
    }

    pub fn is_exhausted(&self) -> bool {
        self.0 <= 0
    }
}
