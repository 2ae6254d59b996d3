use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::{PgConnection, Postgres};

use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::Order;
use kernel::KernelError;

use crate::database::postgres::CartItemRecord;
use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderModifier<PoolConnection<Postgres>> for PostgresOrderRepository {
    async fn insert(
        &self,
        con: &mut PoolConnection<Postgres>,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::insert(con, order).await
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn insert(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        let items = order
            .items()
            .iter()
            .map(CartItemRecord::from)
            .collect::<Vec<_>>();
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, items, total_amount, payment_method, address,
                                status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.user_id().as_ref())
        .bind(Json(items))
        .bind(order.total_amount().as_ref())
        .bind(order.payment_method())
        .bind(Json(order.address()))
        .bind(order.status().as_str())
        .bind(order.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
