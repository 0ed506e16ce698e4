//! Entities and request payloads for the booking site

pub mod hotel;
pub mod order;
pub mod user;

pub use hotel::{Hotel, HotelChanges, HotelForm, NewHotel};
pub use order::{BookingRequest, NewOrder, Order, OrderDetails, OrderSummary};
pub use user::{LoginRequest, NewUser, SessionUser, SignUpRequest, User, UserResponse};
