mod id;

pub use self::id::*;

use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::common::CreatedAt;
use crate::entity::{UserId, UserName};

fn toggle(liked_by: &mut Vec<UserId>, user_id: UserId) {
    if liked_by.contains(&user_id) {
        liked_by.retain(|liker| liker != &user_id);
    } else {
        liked_by.push(user_id);
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct ForumReply {
    id: ForumReplyId,
    post_id: ForumPostId,
    author_id: UserId,
    author_name: UserName,
    content: String,
    liked_by: Vec<UserId>,
    created_at: CreatedAt<ForumReply>,
}

impl ForumReply {
    pub fn new(
        id: ForumReplyId,
        post_id: ForumPostId,
        author_id: UserId,
        author_name: UserName,
        content: impl Into<String>,
        liked_by: Vec<UserId>,
        created_at: CreatedAt<ForumReply>,
    ) -> Self {
        Self {
            id,
            post_id,
            author_id,
            author_name,
            content: content.into(),
            liked_by,
            created_at,
        }
    }

    pub fn with_id(mut self, id: ForumReplyId) -> Self {
        self.id = id;
        self
    }

    pub fn toggle_like(mut self, user_id: UserId) -> Self {
        toggle(&mut self.liked_by, user_id);
        self
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct ForumPost {
    id: ForumPostId,
    author_id: UserId,
    author_name: UserName,
    title: String,
    content: String,
    category: String,
    tags: Vec<String>,
    liked_by: Vec<UserId>,
    replies: Vec<ForumReply>,
    created_at: CreatedAt<ForumPost>,
}

impl ForumPost {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ForumPostId,
        author_id: UserId,
        author_name: UserName,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
        liked_by: Vec<UserId>,
        replies: Vec<ForumReply>,
        created_at: CreatedAt<ForumPost>,
    ) -> Self {
        Self {
            id,
            author_id,
            author_name,
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags,
            liked_by,
            replies,
            created_at,
        }
    }

    pub fn with_id(mut self, id: ForumPostId) -> Self {
        self.id = id;
        self
    }

    pub fn with_reply(mut self, reply: ForumReply) -> Self {
        self.replies.push(reply);
        self
    }

    pub fn toggle_like(mut self, user_id: UserId) -> Self {
        toggle(&mut self.liked_by, user_id);
        self
    }

    /// Swaps a provisional reply identity for the one issued by the store.
    pub fn adopt_reply_id(mut self, provisional: &ForumReplyId, issued: ForumReplyId) -> Self {
        self.replies = self
            .replies
            .into_iter()
            .map(|reply| {
                if reply.id() == provisional {
                    reply.with_id(issued.clone())
                } else {
                    reply
                }
            })
            .collect();
        self
    }

    pub fn toggle_reply_like(mut self, reply_id: &ForumReplyId, user_id: UserId) -> Self {
        self.replies = self
            .replies
            .into_iter()
            .map(|reply| {
                if reply.id() == reply_id {
                    reply.toggle_like(user_id.clone())
                } else {
                    reply
                }
            })
            .collect();
        self
    }
}
