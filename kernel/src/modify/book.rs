use crate::entity::{AverageRating, Book, BookId, Review, Stock};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier<Connection: Send>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;

    /// Absolute stock write; the caller computes the floored value.
    async fn update_stock(
        &self,
        con: &mut Connection,
        id: &BookId,
        stock: &Stock,
    ) -> error_stack::Result<(), KernelError>;

    /// Review list and derived average persist as one statement so they can
    /// never disagree in the store.
    async fn update_reviews(
        &self,
        con: &mut Connection,
        id: &BookId,
        reviews: &[Review],
        average: &AverageRating,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier<Connection: Send>: 'static + Sync + Send {
    type BookModifier: BookModifier<Connection>;
    fn book_modifier(&self) -> &Self::BookModifier;
}
