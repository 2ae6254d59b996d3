use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookId, CreatedAt, Rating, Review, ReviewId};
use kernel::KernelError;

use crate::state::DependOnStoreState;
use crate::transfer::{AddReviewDto, BookDto};

#[async_trait::async_trait]
pub trait ReviewService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnBookModifier<Connection>
    + DependOnStoreState
{
    /// First review from this user on this book; a second submission is
    /// rejected in favor of the edit path.
    async fn add_review(&mut self, dto: AddReviewDto) -> error_stack::Result<BookDto, KernelError> {
        let (book, review) = self.build_review(&dto)?;
        let updated = book.add_review(review)?;
        self.store_state_mut().update_book(updated.clone());
        self.persist_reviews(&updated).await;
        Ok(BookDto::from(updated))
    }

    async fn edit_review(
        &mut self,
        dto: AddReviewDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let (book, review) = self.build_review(&dto)?;
        let updated = book.edit_review(review)?;
        self.store_state_mut().update_book(updated.clone());
        self.persist_reviews(&updated).await;
        Ok(BookDto::from(updated))
    }

    fn build_review(
        &self,
        dto: &AddReviewDto,
    ) -> error_stack::Result<(Book, Review), KernelError> {
        let user = self.store_state().user().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to review a book")
        })?;
        let book_id = BookId::new(dto.book_id);
        let book = self
            .store_state()
            .book(&book_id)
            .ok_or_else(|| {
                Report::new(KernelError::Validation)
                    .attach_printable("book is not in the catalogue")
            })?
            .clone();
        let review = Review::new(
            ReviewId::new(Uuid::new_v4()),
            user.id().clone(),
            user.name().clone(),
            Rating::new(dto.rating)?,
            dto.comment.clone(),
            CreatedAt::now(),
        );
        Ok((book, review))
    }

    /// The list and its derived average go out as one write. The local
    /// aggregation is authoritative; a failed push is logged, not undone.
    async fn persist_reviews(&self, book: &Book) {
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self
                    .book_modifier()
                    .update_reviews(&mut con, book.id(), book.reviews(), book.average_rating())
                    .await
                {
                    tracing::warn!("review update failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for review update failed: {report:?}"),
        }
    }
}

impl<Connection: Send, T> ReviewService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnBookModifier<Connection>
        + DependOnStoreState
{
}
