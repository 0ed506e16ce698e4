//! Booking site routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{load_session, require_admin, require_user},
    state::AppState,
};

pub mod account;
pub mod admin;
pub mod hotels;

/// Largest accepted admin form, image included
const MAX_ADMIN_FORM_BYTES: usize = 10 * 1024 * 1024;

/// Create the router for the booking site
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/confirmation", get(account::booking_confirmation))
        .route("/order-placed", post(account::order_placed))
        .route("/my-account", get(account::my_account))
        .route_layer(middleware::from_fn(require_user));

    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_page))
        .route("/admin/add", post(admin::create_hotel))
        .route("/admin/edit-remove", post(admin::edit_remove))
        .route("/admin/orders", get(admin::all_orders))
        .route(
            "/admin/:hotel_id/update",
            get(admin::update_hotel_page).post(admin::update_hotel),
        )
        .route(
            "/admin/:hotel_id/delete",
            get(admin::delete_hotel_page).post(admin::delete_hotel),
        )
        .layer(DefaultBodyLimit::max(MAX_ADMIN_FORM_BYTES))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(hotels::home_page))
        .route("/all", get(hotels::all_hotels))
        .route("/all/:hotel_id", get(hotels::hotel_detail))
        .route("/countries", get(hotels::country_list))
        .route("/countries/:country", get(hotels::hotels_by_country))
        .route("/results", post(hotels::search_results))
        .route("/sign-up", post(account::sign_up))
        .route("/login", post(account::login))
        .route("/logout", get(account::logout))
        .merge(user_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "booker"
    }))
}

/// Hotel ids arrive as raw path segments; anything that is not a UUID
/// cannot name a hotel.
fn parse_hotel_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Hotel not found".to_string()))
}
