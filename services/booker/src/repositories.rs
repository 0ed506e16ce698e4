//! Repositories for database operations

pub mod hotel;
pub mod order;
pub mod user;

pub use hotel::{HomePageSample, HotelRepository};
pub use order::OrderRepository;
pub use user::UserRepository;
