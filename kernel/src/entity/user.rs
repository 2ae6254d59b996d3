mod id;
mod name;

pub use self::{id::*, name::*};

use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::BookId;

/// Marketplace profile. The four book-id lists serve disjoint purposes;
/// ordering inside them is irrelevant.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct User {
    id: UserId,
    name: UserName,
    email: String,
    avatar: Option<String>,
    rented_books: Vec<BookId>,
    bought_books: Vec<BookId>,
    favorite_books: Vec<BookId>,
    listed_books: Vec<BookId>,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UserId,
        name: UserName,
        email: impl Into<String>,
        avatar: Option<String>,
        rented_books: Vec<BookId>,
        bought_books: Vec<BookId>,
        favorite_books: Vec<BookId>,
        listed_books: Vec<BookId>,
    ) -> Self {
        Self {
            id,
            name,
            email: email.into(),
            avatar,
            rented_books,
            bought_books,
            favorite_books,
            listed_books,
        }
    }

    /// Bare profile built from the auth session alone, used until (or in
    /// place of) a stored profile row.
    pub fn from_session(id: UserId, name: UserName, email: impl Into<String>) -> Self {
        Self::new(id, name, email, None, vec![], vec![], vec![], vec![])
    }

    pub fn record_purchase(mut self, book_id: BookId) -> Self {
        self.bought_books.push(book_id);
        self
    }

    pub fn record_rental(mut self, book_id: BookId) -> Self {
        self.rented_books.push(book_id);
        self
    }

    pub fn record_listing(mut self, book_id: BookId) -> Self {
        self.listed_books.insert(0, book_id);
        self
    }

    pub fn is_favorite(&self, book_id: &BookId) -> bool {
        self.favorite_books.contains(book_id)
    }

    pub fn toggle_favorite(mut self, book_id: BookId) -> Self {
        if self.is_favorite(&book_id) {
            self.favorite_books.retain(|favorite| favorite != &book_id);
        } else {
            self.favorite_books.push(book_id);
        }
        self
    }
}
