use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};
use uuid::Uuid;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{BookId, User, UserId, UserName};
use kernel::KernelError;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresProfileRepository;

#[async_trait::async_trait]
impl UserQuery<PoolConnection<Postgres>> for PostgresProfileRepository {
    async fn find_by_id(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgProfileInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl UserModifier<PoolConnection<Postgres>> for PostgresProfileRepository {
    async fn upsert(
        &self,
        con: &mut PoolConnection<Postgres>,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgProfileInternal::upsert(con, user).await
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: String,
    avatar: Option<String>,
    rented_books: Vec<Uuid>,
    bought_books: Vec<Uuid>,
    favorite_books: Vec<Uuid>,
    listed_books: Vec<Uuid>,
}

fn book_ids(ids: Vec<Uuid>) -> Vec<BookId> {
    ids.into_iter().map(BookId::new).collect()
}

fn raw_ids(ids: &[BookId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_ref()).collect()
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        User::new(
            UserId::new(row.id),
            UserName::new(row.name),
            row.email,
            row.avatar,
            book_ids(row.rented_books),
            book_ids(row.bought_books),
            book_ids(row.favorite_books),
            book_ids(row.listed_books),
        )
    }
}

pub(in crate::database) struct PgProfileInternal;

impl PgProfileInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        // language=postgresql
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, email, avatar, rented_books, bought_books, favorite_books,
                   listed_books
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn upsert(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO profiles (id, name, email, avatar, rented_books, bought_books,
                                  favorite_books, listed_books)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                avatar = EXCLUDED.avatar,
                rented_books = EXCLUDED.rented_books,
                bought_books = EXCLUDED.bought_books,
                favorite_books = EXCLUDED.favorite_books,
                listed_books = EXCLUDED.listed_books
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.name().as_ref())
        .bind(user.email())
        .bind(user.avatar())
        .bind(raw_ids(user.rented_books()))
        .bind(raw_ids(user.bought_books()))
        .bind(raw_ids(user.favorite_books()))
        .bind(raw_ids(user.listed_books()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
