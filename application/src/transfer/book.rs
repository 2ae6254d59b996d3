use uuid::Uuid;

use kernel::prelude::entity::{Book, DestructBook, DestructReview, Review};

#[derive(Debug, Clone)]
pub struct ReviewDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        let DestructReview {
            id,
            user_id,
            user_name,
            rating,
            comment,
            created_at: _,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            rating: rating.into(),
            comment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: String,
    pub marked_price: i64,
    pub price_buy: i64,
    pub price_rent: i64,
    pub security_deposit: Option<i64>,
    pub discount_percent: i64,
    pub stock: i32,
    pub image_url: String,
    pub images: Vec<String>,
    pub reviews: Vec<ReviewDto>,
    pub average_rating: f64,
    pub owner_id: Option<Uuid>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let discount_percent = value.discount_percent();
        let DestructBook {
            id,
            title,
            author,
            description,
            category,
            marked_price,
            price_buy,
            price_rent,
            security_deposit,
            stock,
            image_url,
            images,
            reviews,
            average_rating,
            owner_id,
            created_at: _,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author,
            description,
            category,
            marked_price: marked_price.amount(),
            price_buy: price_buy.amount(),
            price_rent: price_rent.amount(),
            security_deposit: security_deposit.map(|price| price.amount()),
            discount_percent,
            stock: stock.into(),
            image_url,
            images,
            reviews: reviews.into_iter().map(ReviewDto::from).collect(),
            average_rating: average_rating.into(),
            owner_id: owner_id.map(Into::into),
        }
    }
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct ListBookDto {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: String,
    pub marked_price: i64,
    pub price_buy: i64,
    pub price_rent: i64,
    pub security_deposit: Option<i64>,
    pub stock: i32,
    pub image_url: String,
    pub images: Vec<String>,
}

pub struct AddReviewDto {
    pub book_id: Uuid,
    pub rating: i32,
    pub comment: String,
}
