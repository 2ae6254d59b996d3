use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::Review;
use crate::KernelError;

/// Star rating constrained to [1, 5].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Rating(i32);

impl Rating {
    pub fn new(rating: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let rating = rating.into();
        if !(1..=5).contains(&rating) {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("rating must be between 1 and 5, got {rating}")));
        }
        Ok(Self(rating))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct AverageRating(f64);

impl AverageRating {
    pub fn new(value: impl Into<f64>) -> Self {
        Self(value.into())
    }

    /// Mean of all review ratings rounded to one decimal place, 0 when the
    /// book has no reviews.
    pub fn of(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self(0.0);
        }
        let total: i64 = reviews
            .iter()
            .map(|review| i64::from(*review.rating().as_ref()))
            .sum();
        let mean = total as f64 / reviews.len() as f64;
        Self((mean * 10.0).round() / 10.0)
    }
}
