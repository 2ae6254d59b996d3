mod id;
mod rating;
mod stock;
mod title;

pub use self::{id::*, rating::*, stock::*, title::*};

use destructure::{Destructure, Mutation};
use error_stack::Report;
use vodca::References;

use crate::entity::common::{CreatedAt, Price};
use crate::entity::{Review, UserId};
use crate::KernelError;

#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: String,
    description: String,
    category: String,
    marked_price: Price,
    price_buy: Price,
    price_rent: Price,
    security_deposit: Option<Price>,
    stock: Stock,
    image_url: String,
    images: Vec<String>,
    reviews: Vec<Review>,
    average_rating: AverageRating,
    owner_id: Option<UserId>,
    created_at: CreatedAt<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        marked_price: Price,
        price_buy: Price,
        price_rent: Price,
        security_deposit: Option<Price>,
        stock: Stock,
        image_url: impl Into<String>,
        images: Vec<String>,
        reviews: Vec<Review>,
        average_rating: AverageRating,
        owner_id: Option<UserId>,
        created_at: CreatedAt<Book>,
    ) -> Self {
        Self {
            id,
            title,
            author: author.into(),
            description: description.into(),
            category: category.into(),
            marked_price,
            price_buy,
            price_rent,
            security_deposit,
            stock,
            image_url: image_url.into(),
            images,
            reviews,
            average_rating,
            owner_id,
            created_at,
        }
    }

    /// Informational discount against the marked price. Never feeds into
    /// line-item pricing.
    pub fn discount_percent(&self) -> i64 {
        let marked = self.marked_price.amount();
        let buy = self.price_buy.amount();
        if marked > buy && marked > 0 {
            (((marked - buy) as f64 / marked as f64) * 100.0).round() as i64
        } else {
            0
        }
    }

    pub fn review_by(&self, user_id: &UserId) -> Option<&Review> {
        self.reviews.iter().find(|review| review.user_id() == user_id)
    }

    /// One review per user. A second submission from the same user is
    /// rejected so the caller can offer the edit path instead.
    pub fn add_review(mut self, review: Review) -> error_stack::Result<Self, KernelError> {
        if self.review_by(review.user_id()).is_some() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("you have already reviewed this book, edit your review instead"));
        }
        self.reviews.insert(0, review);
        self.average_rating = AverageRating::of(&self.reviews);
        Ok(self)
    }

    /// Replaces the user's existing review in place and recomputes the
    /// average over the full updated list.
    pub fn edit_review(mut self, review: Review) -> error_stack::Result<Self, KernelError> {
        let Some(slot) = self
            .reviews
            .iter_mut()
            .find(|existing| existing.user_id() == review.user_id())
        else {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("no existing review to edit for this user"));
        };
        *slot = review;
        self.average_rating = AverageRating::of(&self.reviews);
        Ok(self)
    }

    pub fn decrement_stock(mut self, purchased: i32) -> Self {
        self.stock = self.stock.decrement(purchased);
        self
    }
}
