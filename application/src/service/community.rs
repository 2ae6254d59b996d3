use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{DependOnForumQuery, ForumQuery};
use kernel::interface::update::{DependOnForumModifier, ForumModifier};
use kernel::prelude::entity::{
    CreatedAt, ForumPost, ForumPostId, ForumReply, ForumReplyId, UserId,
};
use kernel::KernelError;

use crate::state::DependOnStoreState;
use crate::transfer::{
    AskQuestionDto, ForumPostDto, ForumReplyDto, ReplyDto, TogglePostLikeDto, ToggleReplyLikeDto,
};

#[async_trait::async_trait]
pub trait ForumService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnForumQuery<Connection>
    + DependOnForumModifier<Connection>
    + DependOnStoreState
{
    async fn load_posts(&mut self) -> error_stack::Result<Vec<ForumPostDto>, KernelError> {
        let mut con = self.database_connection().acquire().await?;
        let posts = self.forum_query().find_all(&mut con).await?;
        self.store_state_mut().replace_posts(posts.clone());
        Ok(posts.into_iter().map(ForumPostDto::from).collect())
    }

    /// Optimistic post: it heads the board immediately, adopts the issued
    /// identity on success and is withdrawn on failure.
    async fn ask_question(
        &mut self,
        dto: AskQuestionDto,
    ) -> error_stack::Result<ForumPostDto, KernelError> {
        let user = self.store_state().user().cloned().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to ask a question")
        })?;
        let post = ForumPost::new(
            ForumPostId::new(Uuid::new_v4()),
            user.id().clone(),
            user.name().clone(),
            dto.title,
            dto.content,
            dto.category,
            dto.tags,
            vec![],
            vec![],
            CreatedAt::now(),
        );
        let provisional = post.id().clone();
        let rollback = self.store_state_mut().push_post(post.clone());
        let mut con = match self.database_connection().acquire().await {
            Ok(con) => con,
            Err(report) => {
                rollback.apply(self.store_state_mut());
                return Err(report);
            }
        };
        match self.forum_modifier().insert_post(&mut con, &post).await {
            Ok(issued) => {
                self.store_state_mut().adopt_post_id(&provisional, issued.clone());
                Ok(ForumPostDto::from(post.with_id(issued)))
            }
            Err(report) => {
                rollback.apply(self.store_state_mut());
                Err(report)
            }
        }
    }

    async fn reply(&mut self, dto: ReplyDto) -> error_stack::Result<ForumReplyDto, KernelError> {
        let user = self.store_state().user().cloned().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to reply")
        })?;
        let post_id = ForumPostId::new(dto.post_id);
        let reply = ForumReply::new(
            ForumReplyId::new(Uuid::new_v4()),
            post_id.clone(),
            user.id().clone(),
            user.name().clone(),
            dto.content,
            vec![],
            CreatedAt::now(),
        );
        let provisional = reply.id().clone();
        let rollback = self
            .store_state_mut()
            .add_reply(&post_id, reply.clone())
            .ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable("no such discussion")
            })?;
        let mut con = match self.database_connection().acquire().await {
            Ok(con) => con,
            Err(report) => {
                rollback.apply(self.store_state_mut());
                return Err(report);
            }
        };
        match self.forum_modifier().insert_reply(&mut con, &reply).await {
            Ok(issued) => {
                self.store_state_mut()
                    .adopt_reply_id(&post_id, &provisional, issued.clone());
                Ok(ForumReplyDto::from(reply.with_id(issued)))
            }
            Err(report) => {
                rollback.apply(self.store_state_mut());
                Err(report)
            }
        }
    }

    /// Likes settle last-writer-wins; the whole liker list is pushed and a
    /// failure is logged only.
    async fn toggle_post_like(
        &mut self,
        dto: TogglePostLikeDto,
    ) -> error_stack::Result<ForumPostDto, KernelError> {
        let user_id = self.liker()?;
        let post_id = ForumPostId::new(dto.post_id);
        let post = self
            .store_state()
            .post(&post_id)
            .ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable("no such discussion")
            })?
            .clone();
        let toggled = post.toggle_like(user_id);
        self.store_state_mut().update_post(toggled.clone());
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self
                    .forum_modifier()
                    .update_post_likes(&mut con, &post_id, toggled.liked_by())
                    .await
                {
                    tracing::warn!("post like update failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for like update failed: {report:?}"),
        }
        Ok(ForumPostDto::from(toggled))
    }

    async fn toggle_reply_like(
        &mut self,
        dto: ToggleReplyLikeDto,
    ) -> error_stack::Result<ForumPostDto, KernelError> {
        let user_id = self.liker()?;
        let post_id = ForumPostId::new(dto.post_id);
        let reply_id = ForumReplyId::new(dto.reply_id);
        let post = self
            .store_state()
            .post(&post_id)
            .ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable("no such discussion")
            })?
            .clone();
        let toggled = post.toggle_reply_like(&reply_id, user_id);
        self.store_state_mut().update_post(toggled.clone());
        let liked_by = toggled
            .replies()
            .iter()
            .find(|reply| reply.id() == &reply_id)
            .map(|reply| reply.liked_by().clone())
            .unwrap_or_default();
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self
                    .forum_modifier()
                    .update_reply_likes(&mut con, &reply_id, &liked_by)
                    .await
                {
                    tracing::warn!("reply like update failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for like update failed: {report:?}"),
        }
        Ok(ForumPostDto::from(toggled))
    }

    fn liker(&self) -> error_stack::Result<UserId, KernelError> {
        self.store_state()
            .user()
            .map(|user| user.id().clone())
            .ok_or_else(|| {
                Report::new(KernelError::Auth).attach_printable("sign in to like a post")
            })
    }
}

impl<Connection: Send, T> ForumService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnForumQuery<Connection>
        + DependOnForumModifier<Connection>
        + DependOnStoreState
{
}

#[cfg(test)]
mod test {
    use crate::service::mock::{signed_in, MockApp};
    use crate::service::ForumService;
    use crate::transfer::{AskQuestionDto, ReplyDto, TogglePostLikeDto};

    fn question() -> AskQuestionDto {
        AskQuestionDto {
            title: "Underrated sci-fi?".to_string(),
            content: "Looking for deep cuts.".to_string(),
            category: "Science Fiction".to_string(),
            tags: vec!["scifi".to_string()],
        }
    }

    #[tokio::test]
    async fn question_heads_the_board_with_the_issued_identity() {
        let mut app = MockApp::new();
        signed_in(&mut app);

        let dto = app.ask_question(question()).await.unwrap();
        assert_eq!(app.state().posts().len(), 1);
        assert_eq!(*app.state().posts()[0].id().as_ref(), dto.id);
        assert_eq!(app.forum.posts_inserted(), 1);
    }

    #[tokio::test]
    async fn rejected_question_is_withdrawn() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        app.forum.fail_post();

        assert!(app.ask_question(question()).await.is_err());
        assert!(app.state().posts().is_empty());
    }

    #[tokio::test]
    async fn reply_attaches_and_rolls_back_on_failure() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let post = app.ask_question(question()).await.unwrap();

        let reply = app
            .reply(ReplyDto {
                post_id: post.id,
                content: "Try Blindsight.".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(app.state().posts()[0].replies().len(), 1);
        assert_eq!(*app.state().posts()[0].replies()[0].id().as_ref(), reply.id);

        app.forum.fail_reply();
        assert!(app
            .reply(ReplyDto {
                post_id: post.id,
                content: "dropped".to_string(),
            })
            .await
            .is_err());
        assert_eq!(app.state().posts()[0].replies().len(), 1);
    }

    #[tokio::test]
    async fn like_toggles_locally_even_when_the_push_fails() {
        let mut app = MockApp::new();
        let user = signed_in(&mut app);
        let post = app.ask_question(question()).await.unwrap();
        app.forum.fail_likes();

        let dto = app
            .toggle_post_like(TogglePostLikeDto { post_id: post.id })
            .await
            .unwrap();
        assert_eq!(dto.likes, 1);
        assert!(app.state().posts()[0].liked_by().contains(user.id()));
    }

    #[tokio::test]
    async fn guests_cannot_post() {
        let mut app = MockApp::new();
        assert!(app.ask_question(question()).await.is_err());
    }
}
