use uuid::Uuid;

use kernel::prelude::entity::{BookId, DestructUser, User};

#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub rented_books: Vec<Uuid>,
    pub bought_books: Vec<Uuid>,
    pub favorite_books: Vec<Uuid>,
    pub listed_books: Vec<Uuid>,
}

fn raw_ids(ids: Vec<BookId>) -> Vec<Uuid> {
    ids.into_iter().map(Into::into).collect()
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id,
            name,
            email,
            avatar,
            rented_books,
            bought_books,
            favorite_books,
            listed_books,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email,
            avatar,
            rented_books: raw_ids(rented_books),
            bought_books: raw_ids(bought_books),
            favorite_books: raw_ids(favorite_books),
            listed_books: raw_ids(listed_books),
        }
    }
}

pub struct UpdateProfileDto {
    pub name: String,
    pub avatar: Option<String>,
}

pub struct SignUpDto {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct SignInDto {
    pub email: String,
    pub password: String,
}
