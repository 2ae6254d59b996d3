use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Rental duration in weeks, at least one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct RentWeeks(i32);

impl RentWeeks {
    pub fn new(weeks: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let weeks = weeks.into();
        if weeks < 1 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("rent duration must be at least 1 week, got {weeks}")));
        }
        Ok(Self(weeks))
    }

    pub fn count(&self) -> i32 {
        self.0
    }
}
