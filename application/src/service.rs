mod book;
mod cart;
mod community;
mod contact;
mod order;
mod recommend;
mod review;
mod session;
mod user;

pub use self::{
    book::*, cart::*, community::*, contact::*, order::*, recommend::*, review::*, session::*,
    user::*,
};

#[cfg(test)]
pub(crate) mod mock;
