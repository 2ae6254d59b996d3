use std::collections::HashMap;

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::ForumQuery;
use kernel::interface::update::ForumModifier;
use kernel::prelude::entity::{
    CreatedAt, ForumPost, ForumPostId, ForumReply, ForumReplyId, UserId, UserName,
};
use kernel::KernelError;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresForumRepository;

#[async_trait::async_trait]
impl ForumQuery<PoolConnection<Postgres>> for PostgresForumRepository {
    async fn find_all(
        &self,
        con: &mut PoolConnection<Postgres>,
    ) -> error_stack::Result<Vec<ForumPost>, KernelError> {
        PgForumInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl ForumModifier<PoolConnection<Postgres>> for PostgresForumRepository {
    async fn insert_post(
        &self,
        con: &mut PoolConnection<Postgres>,
        post: &ForumPost,
    ) -> error_stack::Result<ForumPostId, KernelError> {
        PgForumInternal::insert_post(con, post).await
    }

    async fn insert_reply(
        &self,
        con: &mut PoolConnection<Postgres>,
        reply: &ForumReply,
    ) -> error_stack::Result<ForumReplyId, KernelError> {
        PgForumInternal::insert_reply(con, reply).await
    }

    async fn update_post_likes(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &ForumPostId,
        liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError> {
        PgForumInternal::update_post_likes(con, id, liked_by).await
    }

    async fn update_reply_likes(
        &self,
        con: &mut PoolConnection<Postgres>,
        id: &ForumReplyId,
        liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError> {
        PgForumInternal::update_reply_likes(con, id, liked_by).await
    }
}

#[derive(sqlx::FromRow)]
struct ForumPostRow {
    id: Uuid,
    author_id: Uuid,
    author_name: String,
    title: String,
    content: String,
    category: String,
    tags: Vec<String>,
    liked_by: Vec<Uuid>,
    created_at: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
struct ForumReplyRow {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    author_name: String,
    content: String,
    liked_by: Vec<Uuid>,
    created_at: OffsetDateTime,
}

fn likers(ids: Vec<Uuid>) -> Vec<UserId> {
    ids.into_iter().map(UserId::new).collect()
}

fn raw_likers(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_ref()).collect()
}

impl From<ForumReplyRow> for ForumReply {
    fn from(row: ForumReplyRow) -> Self {
        ForumReply::new(
            ForumReplyId::new(row.id),
            ForumPostId::new(row.post_id),
            UserId::new(row.author_id),
            UserName::new(row.author_name),
            row.content,
            likers(row.liked_by),
            CreatedAt::new(row.created_at),
        )
    }
}

impl ForumPostRow {
    fn into_post(self, replies: Vec<ForumReply>) -> ForumPost {
        ForumPost::new(
            ForumPostId::new(self.id),
            UserId::new(self.author_id),
            UserName::new(self.author_name),
            self.title,
            self.content,
            self.category,
            self.tags,
            likers(self.liked_by),
            replies,
            CreatedAt::new(self.created_at),
        )
    }
}

pub(in crate::database) struct PgForumInternal;

impl PgForumInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<ForumPost>, KernelError> {
        // language=postgresql
        let posts = sqlx::query_as::<_, ForumPostRow>(
            r#"
            SELECT id, author_id, author_name, title, content, category, tags, liked_by,
                   created_at
            FROM forum_posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&mut *con)
        .await
        .convert_error()?;

        let post_ids = posts.iter().map(|post| post.id).collect::<Vec<_>>();
        // language=postgresql
        let replies = sqlx::query_as::<_, ForumReplyRow>(
            r#"
            SELECT id, post_id, author_id, author_name, content, liked_by, created_at
            FROM forum_replies
            WHERE post_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(&post_ids)
        .fetch_all(con)
        .await
        .convert_error()?;

        let mut grouped: HashMap<Uuid, Vec<ForumReply>> = HashMap::new();
        for reply in replies {
            grouped
                .entry(reply.post_id)
                .or_default()
                .push(ForumReply::from(reply));
        }
        Ok(posts
            .into_iter()
            .map(|post| {
                let replies = grouped.remove(&post.id).unwrap_or_default();
                post.into_post(replies)
            })
            .collect())
    }

    async fn insert_post(
        con: &mut PgConnection,
        post: &ForumPost,
    ) -> error_stack::Result<ForumPostId, KernelError> {
        // language=postgresql
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO forum_posts (author_id, author_name, title, content, category, tags,
                                     liked_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(post.author_id().as_ref())
        .bind(post.author_name().as_ref())
        .bind(post.title())
        .bind(post.content())
        .bind(post.category())
        .bind(post.tags())
        .bind(raw_likers(post.liked_by()))
        .bind(post.created_at().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(ForumPostId::new(id))
    }

    async fn insert_reply(
        con: &mut PgConnection,
        reply: &ForumReply,
    ) -> error_stack::Result<ForumReplyId, KernelError> {
        // language=postgresql
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO forum_replies (post_id, author_id, author_name, content, liked_by,
                                       created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(reply.post_id().as_ref())
        .bind(reply.author_id().as_ref())
        .bind(reply.author_name().as_ref())
        .bind(reply.content())
        .bind(raw_likers(reply.liked_by()))
        .bind(reply.created_at().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(ForumReplyId::new(id))
    }

    async fn update_post_likes(
        con: &mut PgConnection,
        id: &ForumPostId,
        liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE forum_posts SET liked_by = $2 WHERE id = $1")
            .bind(id.as_ref())
            .bind(raw_likers(liked_by))
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn update_reply_likes(
        con: &mut PgConnection,
        id: &ForumReplyId,
        liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query("UPDATE forum_replies SET liked_by = $2 WHERE id = $1")
            .bind(id.as_ref())
            .bind(raw_likers(liked_by))
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }
}
