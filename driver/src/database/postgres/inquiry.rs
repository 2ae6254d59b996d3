use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};

use kernel::interface::update::InquiryModifier;
use kernel::prelude::entity::Inquiry;
use kernel::KernelError;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresInquiryRepository;

#[async_trait::async_trait]
impl InquiryModifier<PoolConnection<Postgres>> for PostgresInquiryRepository {
    async fn insert(
        &self,
        con: &mut PoolConnection<Postgres>,
        inquiry: &Inquiry,
    ) -> error_stack::Result<(), KernelError> {
        PgInquiryInternal::insert(con, inquiry).await
    }
}

pub(in crate::database) struct PgInquiryInternal;

impl PgInquiryInternal {
    async fn insert(
        con: &mut PgConnection,
        inquiry: &Inquiry,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO inquiries (full_name, email, mobile, query, time_slot)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(inquiry.full_name())
        .bind(inquiry.email())
        .bind(inquiry.mobile())
        .bind(inquiry.query())
        .bind(inquiry.time_slot())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
