use error_stack::Report;
use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};
use uuid::Uuid;

use kernel::interface::query::CartQuery;
use kernel::interface::update::CartModifier;
use kernel::prelude::entity::{
    BookId, CartItem, CartItemId, Price, PurchaseKind, Quantity, RentWeeks, UserId,
};
use kernel::KernelError;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresCartRepository;

#[async_trait::async_trait]
impl CartQuery<PoolConnection<Postgres>> for PostgresCartRepository {
    async fn find_by_user(
        &self,
        con: &mut PoolConnection<Postgres>,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        PgCartInternal::find_by_user(con, user_id).await
    }
}

#[async_trait::async_trait]
impl CartModifier<PoolConnection<Postgres>> for PostgresCartRepository {
    async fn insert(
        &self,
        con: &mut PoolConnection<Postgres>,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<CartItemId, KernelError> {
        PgCartInternal::insert(con, user_id, item).await
    }

    async fn update_pricing(
        &self,
        con: &mut PoolConnection<Postgres>,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::update_pricing(con, item).await
    }

    async fn delete(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &CartItemId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::delete(con, id).await
    }

    async fn clear(
        &self,
        con: &mut PoolConnection<Postgres>,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::clear(con, user_id).await
    }
}

/// Stored shape of a cart line as embedded in an order's `items` jsonb
/// column. The live cart lives in its own table; orders keep a frozen copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(in crate::database) struct CartItemRecord {
    id: Uuid,
    book_id: Uuid,
    title: String,
    author: String,
    image_url: String,
    #[serde(rename = "type")]
    kind: String,
    quantity: i32,
    rent_weeks: Option<i32>,
    security_deposit: Option<i64>,
    unit_price: i64,
    price: i64,
}

impl From<&CartItem> for CartItemRecord {
    fn from(item: &CartItem) -> Self {
        Self {
            id: *item.id().as_ref(),
            book_id: *item.book_id().as_ref(),
            title: item.title().clone(),
            author: item.author().clone(),
            image_url: item.image_url().clone(),
            kind: item.kind().as_str().to_string(),
            quantity: item.quantity().count(),
            rent_weeks: item.rent_weeks().map(|weeks| weeks.count()),
            security_deposit: item.security_deposit().map(|price| price.amount()),
            unit_price: item.unit_price().amount(),
            price: item.price().amount(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: Uuid,
    book_id: Uuid,
    title: String,
    author: String,
    image_url: String,
    #[sqlx(rename = "type")]
    kind: String,
    quantity: i32,
    rent_weeks: Option<i32>,
    security_deposit: Option<i64>,
    unit_price: i64,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = Report<KernelError>;

    // The derived price is recomputed from the snapshot instead of read
    // back, so a stale stored total can never survive a reload.
    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        Ok(CartItem::new(
            CartItemId::new(row.id),
            BookId::new(row.book_id),
            row.title,
            row.author,
            row.image_url,
            row.kind.parse::<PurchaseKind>()?,
            Quantity::new(row.quantity)?,
            row.rent_weeks.map(RentWeeks::new).transpose()?,
            row.security_deposit.map(Price::new),
            Price::new(row.unit_price),
        ))
    }
}

pub(in crate::database) struct PgCartInternal;

impl PgCartInternal {
    async fn find_by_user(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        // language=postgresql
        let rows = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT id, book_id, title, author, image_url, type, quantity, rent_weeks,
                   security_deposit, unit_price
            FROM cart_items
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(CartItem::try_from).collect()
    }

    async fn insert(
        con: &mut PgConnection,
        user_id: &UserId,
        item: &CartItem,
    ) -> error_stack::Result<CartItemId, KernelError> {
        // language=postgresql
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO cart_items (user_id, book_id, title, author, image_url, type,
                                    quantity, rent_weeks, security_deposit, unit_price, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(user_id.as_ref())
        .bind(item.book_id().as_ref())
        .bind(item.title())
        .bind(item.author())
        .bind(item.image_url())
        .bind(item.kind().as_str())
        .bind(item.quantity().count())
        .bind(item.rent_weeks().map(|weeks| weeks.count()))
        .bind(item.security_deposit().map(|price| price.amount()))
        .bind(item.unit_price().as_ref())
        .bind(item.price().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(CartItemId::new(id))
    }

    async fn update_pricing(
        con: &mut PgConnection,
        item: &CartItem,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE cart_items SET quantity = $2, rent_weeks = $3, price = $4 WHERE id = $1")
            .bind(item.id().as_ref())
            .bind(item.quantity().count())
            .bind(item.rent_weeks().map(|weeks| weeks.count()))
            .bind(item.price().as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &CartItemId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn clear(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }
}
