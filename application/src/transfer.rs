mod book;
mod cart;
mod forum;
mod inquiry;
mod order;
mod user;

pub use self::{book::*, cart::*, forum::*, inquiry::*, order::*, user::*};
