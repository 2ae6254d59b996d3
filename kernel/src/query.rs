mod book;
mod cart;
mod forum;
mod user;

pub use self::{book::*, cart::*, forum::*, user::*};
