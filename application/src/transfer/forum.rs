use uuid::Uuid;

use kernel::prelude::entity::{DestructForumPost, DestructForumReply, ForumPost, ForumReply};

#[derive(Debug, Clone)]
pub struct ForumReplyDto {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub likes: usize,
    pub liked_by: Vec<Uuid>,
}

impl From<ForumReply> for ForumReplyDto {
    fn from(value: ForumReply) -> Self {
        let DestructForumReply {
            id,
            post_id,
            author_id,
            author_name,
            content,
            liked_by,
            created_at: _,
        } = value.into_destruct();
        Self {
            id: id.into(),
            post_id: post_id.into(),
            author_id: author_id.into(),
            author_name: author_name.into(),
            content,
            likes: liked_by.len(),
            liked_by: liked_by.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForumPostDto {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub likes: usize,
    pub liked_by: Vec<Uuid>,
    pub replies: Vec<ForumReplyDto>,
}

impl From<ForumPost> for ForumPostDto {
    fn from(value: ForumPost) -> Self {
        let DestructForumPost {
            id,
            author_id,
            author_name,
            title,
            content,
            category,
            tags,
            liked_by,
            replies,
            created_at: _,
        } = value.into_destruct();
        Self {
            id: id.into(),
            author_id: author_id.into(),
            author_name: author_name.into(),
            title,
            content,
            category,
            tags,
            likes: liked_by.len(),
            liked_by: liked_by.into_iter().map(Into::into).collect(),
            replies: replies.into_iter().map(ForumReplyDto::from).collect(),
        }
    }
}

pub struct AskQuestionDto {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
}

pub struct ReplyDto {
    pub post_id: Uuid,
    pub content: String,
}

pub struct TogglePostLikeDto {
    pub post_id: Uuid,
}

pub struct ToggleReplyLikeDto {
    pub post_id: Uuid,
    pub reply_id: Uuid,
}
