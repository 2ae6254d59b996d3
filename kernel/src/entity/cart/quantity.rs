use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Units of a line item, at least one. Zero or negative requests are
/// rejected before any state changes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(quantity: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let quantity = quantity.into();
        if quantity < 1 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("quantity must be at least 1, got {quantity}")));
        }
        Ok(Self(quantity))
    }

    pub fn count(&self) -> i32 {
        self.0
    }
}
