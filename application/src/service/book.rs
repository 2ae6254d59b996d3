use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier, DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{AverageRating, Book, BookId, BookTitle, CreatedAt, Price, Stock};
use kernel::KernelError;

use crate::state::DependOnStoreState;
use crate::transfer::{BookDto, GetBookDto, ListBookDto};

#[async_trait::async_trait]
pub trait BookService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnBookQuery<Connection>
    + DependOnBookModifier<Connection>
    + DependOnUserModifier<Connection>
    + DependOnStoreState
{
    /// Wholesale catalogue refresh. On failure the local copy is left
    /// untouched and keeps serving.
    async fn fetch_books(&mut self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut con = self.database_connection().acquire().await?;
        let books = self.book_query().find_all(&mut con).await?;
        self.store_state_mut().replace_books(books.clone());
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn select_book(
        &mut self,
        dto: GetBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let id = BookId::new(dto.id);
        let book = match self.store_state().book(&id).cloned() {
            Some(book) => Some(book),
            None => {
                let mut con = self.database_connection().acquire().await?;
                self.book_query().find_by_id(&mut con, &id).await?
            }
        };
        self.store_state_mut().select_book(book.clone());
        Ok(book.map(BookDto::from))
    }

    /// Optimistic listing: the book heads the local catalogue immediately
    /// and is withdrawn if the store rejects it. The owner's profile update
    /// is best effort.
    async fn list_book(&mut self, dto: ListBookDto) -> error_stack::Result<BookDto, KernelError> {
        let user = self.store_state().user().cloned().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to list a book")
        })?;
        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new(dto.title),
            dto.author,
            dto.description,
            dto.category,
            Price::new(dto.marked_price),
            Price::new(dto.price_buy),
            Price::new(dto.price_rent),
            dto.security_deposit.map(Price::new),
            Stock::new(dto.stock),
            dto.image_url,
            dto.images,
            vec![],
            AverageRating::new(0.0),
            Some(user.id().clone()),
            CreatedAt::now(),
        );
        let rollback = self.store_state_mut().push_book(book.clone());
        let mut con = match self.database_connection().acquire().await {
            Ok(con) => con,
            Err(report) => {
                rollback.apply(self.store_state_mut());
                return Err(report);
            }
        };
        if let Err(report) = self.book_modifier().create(&mut con, &book).await {
            rollback.apply(self.store_state_mut());
            return Err(report);
        }
        let owner = user.record_listing(book.id().clone());
        if let Err(report) = self.user_modifier().upsert(&mut con, &owner).await {
            tracing::warn!("profile listing update failed: {report:?}");
        }
        self.store_state_mut().set_user(Some(owner));
        Ok(BookDto::from(book))
    }
}

impl<Connection: Send, T> BookService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnBookQuery<Connection>
        + DependOnBookModifier<Connection>
        + DependOnUserModifier<Connection>
        + DependOnStoreState
{
}
