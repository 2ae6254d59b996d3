mod book;
mod cart;
mod common;
mod forum;
mod inquiry;
mod order;
mod review;
mod user;

pub use self::{
    book::*, cart::*, common::*, forum::*, inquiry::*, order::*, review::*, user::*,
};
