//! Record types of the payment tracker

#[macro_use]
mod macros;

mod area;
mod collector;
mod company;
mod payment;
mod shop;
mod user;

pub use area::Area;
pub use collector::Collector;
pub use company::Company;
pub use payment::Payment;
pub use shop::Shop;
pub use user::{Role, User};
