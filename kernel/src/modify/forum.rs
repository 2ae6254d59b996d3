use crate::entity::{ForumPost, ForumPostId, ForumReply, ForumReplyId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ForumModifier<Connection: Send>: 'static + Sync + Send {
    async fn insert_post(
        &self,
        con: &mut Connection,
        post: &ForumPost,
    ) -> error_stack::Result<ForumPostId, KernelError>;

    async fn insert_reply(
        &self,
        con: &mut Connection,
        reply: &ForumReply,
    ) -> error_stack::Result<ForumReplyId, KernelError>;

    async fn update_post_likes(
        &self,
        con: &mut Connection,
        id: &ForumPostId,
        liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError>;

    async fn update_reply_likes(
        &self,
        con: &mut Connection,
        id: &ForumReplyId,
        liked_by: &[UserId],
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnForumModifier<Connection: Send>: 'static + Sync + Send {
    type ForumModifier: ForumModifier<Connection>;
    fn forum_modifier(&self) -> &Self::ForumModifier;
}
