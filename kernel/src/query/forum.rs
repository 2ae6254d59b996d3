use crate::entity::ForumPost;
use crate::KernelError;

#[async_trait::async_trait]
pub trait ForumQuery<Connection: Send>: Sync + Send + 'static {
    /// All posts newest-first, each carrying its replies oldest-first.
    async fn find_all(
        &self,
        con: &mut Connection,
    ) -> error_stack::Result<Vec<ForumPost>, KernelError>;
}

pub trait DependOnForumQuery<Connection: Send>: Sync + Send + 'static {
    type ForumQuery: ForumQuery<Connection>;
    fn forum_query(&self) -> &Self::ForumQuery;
}
