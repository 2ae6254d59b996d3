use error_stack::Report;
use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::{PgConnection, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    AverageRating, Book, BookId, BookTitle, CreatedAt, Price, Rating, Review, ReviewId, Stock,
    UserId, UserName,
};
use kernel::KernelError;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery<PoolConnection<Postgres>> for PostgresBookRepository {
    async fn find_all(
        &self,
        con: &mut PoolConnection<Postgres>,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl BookModifier<PoolConnection<Postgres>> for PostgresBookRepository {
    async fn create(
        &self,
        con: &mut PoolConnection<Postgres>,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update_stock(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &BookId,
        stock: &Stock,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update_stock(con, id, stock).await
    }

    async fn update_reviews(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &BookId,
        reviews: &[Review],
        average: &AverageRating,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update_reviews(con, id, reviews, average).await
    }
}

/// Stored shape of one review inside the `reviews` jsonb column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(in crate::database) struct ReviewRecord {
    id: Uuid,
    user_id: Uuid,
    user_name: String,
    rating: i32,
    comment: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<&Review> for ReviewRecord {
    fn from(review: &Review) -> Self {
        Self {
            id: *review.id().as_ref(),
            user_id: *review.user_id().as_ref(),
            user_name: review.user_name().as_ref().clone(),
            rating: *review.rating().as_ref(),
            comment: review.comment().clone(),
            created_at: *review.created_at().as_ref(),
        }
    }
}

impl TryFrom<ReviewRecord> for Review {
    type Error = Report<KernelError>;

    fn try_from(record: ReviewRecord) -> Result<Self, Self::Error> {
        Ok(Review::new(
            ReviewId::new(record.id),
            UserId::new(record.user_id),
            UserName::new(record.user_name),
            Rating::new(record.rating)?,
            record.comment,
            CreatedAt::new(record.created_at),
        ))
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    description: String,
    category: String,
    marked_price: i64,
    price_buy: i64,
    price_rent: i64,
    security_deposit: Option<i64>,
    quantity: i32,
    image_url: String,
    images: Vec<String>,
    reviews: Json<Vec<ReviewRecord>>,
    average_rating: f64,
    owner_id: Option<Uuid>,
    created_at: OffsetDateTime,
}

impl TryFrom<BookRow> for Book {
    type Error = Report<KernelError>;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let reviews = row
            .reviews
            .0
            .into_iter()
            .map(Review::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Book::new(
            BookId::new(row.id),
            BookTitle::new(row.title),
            row.author,
            row.description,
            row.category,
            Price::new(row.marked_price),
            Price::new(row.price_buy),
            Price::new(row.price_rent),
            row.security_deposit.map(Price::new),
            Stock::new(row.quantity),
            row.image_url,
            row.images,
            reviews,
            AverageRating::new(row.average_rating),
            row.owner_id.map(UserId::new),
            CreatedAt::new(row.created_at),
        ))
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        // language=postgresql
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, description, category, marked_price, price_buy,
                   price_rent, security_deposit, quantity, image_url, images, reviews,
                   average_rating, owner_id, created_at
            FROM books
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        // language=postgresql
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, description, category, marked_price, price_buy,
                   price_rent, security_deposit, quantity, image_url, images, reviews,
                   average_rating, owner_id, created_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        let reviews = book
            .reviews()
            .iter()
            .map(ReviewRecord::from)
            .collect::<Vec<_>>();
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, description, category, marked_price,
                               price_buy, price_rent, security_deposit, quantity, image_url,
                               images, reviews, average_rating, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author())
        .bind(book.description())
        .bind(book.category())
        .bind(book.marked_price().as_ref())
        .bind(book.price_buy().as_ref())
        .bind(book.price_rent().as_ref())
        .bind(book.security_deposit().map(|price| price.amount()))
        .bind(book.stock().as_ref())
        .bind(book.image_url())
        .bind(book.images())
        .bind(Json(reviews))
        .bind(book.average_rating().as_ref())
        .bind(book.owner_id().as_ref().map(|id| *id.as_ref()))
        .bind(book.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_stock(
        con: &mut PgConnection,
        id: &BookId,
        stock: &Stock,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE books SET quantity = $2 WHERE id = $1")
            .bind(id.as_ref())
            .bind(stock.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn update_reviews(
        con: &mut PgConnection,
        id: &BookId,
        reviews: &[Review],
        average: &AverageRating,
    ) -> error_stack::Result<(), KernelError> {
        let records = reviews.iter().map(ReviewRecord::from).collect::<Vec<_>>();
        // language=postgresql
        sqlx::query("UPDATE books SET reviews = $2, average_rating = $3 WHERE id = $1")
            .bind(id.as_ref())
            .bind(Json(records))
            .bind(average.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }
}
