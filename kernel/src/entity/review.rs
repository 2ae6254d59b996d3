mod id;

pub use self::id::*;

use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::common::CreatedAt;
use crate::entity::{Rating, UserId, UserName};

#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct Review {
    id: ReviewId,
    user_id: UserId,
    user_name: UserName,
    rating: Rating,
    comment: String,
    created_at: CreatedAt<Review>,
}

impl Review {
    pub fn new(
        id: ReviewId,
        user_id: UserId,
        user_name: UserName,
        rating: Rating,
        comment: impl Into<String>,
        created_at: CreatedAt<Review>,
    ) -> Self {
        Self {
            id,
            user_id,
            user_name,
            rating,
            comment: comment.into(),
            created_at,
        }
    }
}
