//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    repositories::{HotelRepository, OrderRepository, UserRepository},
    session::SessionManager,
    uploads::ImageStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub hotel_repository: HotelRepository,
    pub order_repository: OrderRepository,
    pub user_repository: UserRepository,
    pub sessions: SessionManager,
    pub images: ImageStore,
    pub secure_cookies: bool,
}

impl AppState {
    /// Wire the repositories to one pool
    pub fn new(
        pool: PgPool,
        sessions: SessionManager,
        images: ImageStore,
        secure_cookies: bool,
    ) -> Self {
        Self {
            hotel_repository: HotelRepository::new(pool.clone()),
            order_repository: OrderRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool),
            sessions,
            images,
            secure_cookies,
        }
    }
}
