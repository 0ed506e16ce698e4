//! Accounts, sessions and bookings

use axum::{
    Extension, Form, Json,
    extract::{Query, State},
    http::StatusCode,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        BookingRequest, Hotel, LoginRequest, NewOrder, NewUser, Order, OrderDetails,
        OrderSummary, SessionUser, SignUpRequest, UserResponse,
    },
    repositories::user::{hash_password, verify_password},
    session::SESSION_COOKIE,
    state::AppState,
    validation::{ValidationErrors, validate_password, validate_username},
};

#[derive(Serialize)]
pub struct SessionStarted {
    pub message: String,
    pub user: SessionUser,
}

#[derive(Serialize)]
pub struct ConfirmationPage {
    pub title: &'static str,
    pub hotel: Hotel,
    pub booking: OrderDetails,
    pub total_cost: f64,
}

#[derive(Serialize)]
pub struct OrderPlaced {
    pub message: String,
    pub order: Order,
    pub hotel: Hotel,
}

#[derive(Serialize)]
pub struct AccountPage {
    pub title: &'static str,
    pub user: UserResponse,
    pub orders: Vec<OrderSummary>,
}

/// Register a new user and log them in
pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<SignUpRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<SessionStarted>)> {
    let mut errors = ValidationErrors::new();
    errors.check("username", validate_username(&payload.username));
    errors.check("password", validate_password(&payload.password));
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let new_user = NewUser {
        username: payload.username,
        password_hash,
    };
    let user = match state.user_repository.create(&new_user).await {
        Ok(user) => user,
        Err(e) if e.is_unique_violation() => {
            return Err(ValidationErrors::single("username", "Username is already taken").into());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Registered user {}", user.id);

    let session_user = SessionUser::from(&user);
    let jar = start_session(&state, jar, &session_user).await?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionStarted {
            message: format!("Welcome to Let's Travel, {}", session_user.username),
            user: session_user,
        }),
    ))
}

/// Log in with username and password.
///
/// Unknown users and wrong passwords get the same answer.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<LoginRequest>,
) -> ApiResult<(CookieJar, Json<SessionStarted>)> {
    info!("Login attempt for user: {}", payload.username);

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = verify_password(&user.password_hash, &payload.password).map_err(|e| {
        error!("Stored password hash for user {} is unusable: {}", user.id, e);
        ApiError::InternalServerError
    })?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let session_user = SessionUser::from(&user);
    let jar = start_session(&state, jar, &session_user).await?;

    Ok((
        jar,
        Json(SessionStarted {
            message: format!("Welcome back, {}", session_user.username),
            user: session_user,
        }),
    ))
}

/// End the current session, if there is one
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.sessions.delete_session(cookie.value()).await {
            warn!("Failed to delete session: {}", e);
        }
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(json!({ "message": "You are now logged out" })))
}

/// Price a prospective booking without storing it
pub async fn booking_confirmation(
    State(state): State<AppState>,
    Extension(_user): Extension<SessionUser>,
    Query(booking): Query<BookingRequest>,
) -> ApiResult<Json<ConfirmationPage>> {
    booking.validate(Utc::now().date_naive())?;
    let hotel = booked_hotel(&state, &booking).await?;
    let details = booking.order_details(hotel.cost_per_night);
    let total_cost = booking.total_cost(hotel.cost_per_night);

    Ok(Json(ConfirmationPage {
        title: "Confirm your booking",
        hotel,
        booking: details,
        total_cost,
    }))
}

/// Store a booking for the logged-in user
pub async fn order_placed(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Form(booking): Form<BookingRequest>,
) -> ApiResult<(StatusCode, Json<OrderPlaced>)> {
    booking.validate(Utc::now().date_naive())?;
    let hotel = booked_hotel(&state, &booking).await?;

    let order = state
        .order_repository
        .create(NewOrder {
            user_id: user.user_id,
            hotel_id: hotel.id,
            order_details: booking.order_details(hotel.cost_per_night),
        })
        .await?;
    info!("User {} booked hotel {}", user.user_id, hotel.id);

    Ok((
        StatusCode::CREATED,
        Json(OrderPlaced {
            message: format!("Thank you for booking {}", hotel.name),
            order,
            hotel,
        }),
    ))
}

/// The logged-in user's profile and bookings
pub async fn my_account(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<AccountPage>> {
    // The session may outlive the account it names
    let account = state
        .user_repository
        .find_by_id(user.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    let orders = state.order_repository.list_for_user(account.id).await?;

    Ok(Json(AccountPage {
        title: "My account",
        user: UserResponse::from(account),
        orders,
    }))
}

async fn booked_hotel(state: &AppState, booking: &BookingRequest) -> ApiResult<Hotel> {
    state
        .hotel_repository
        .find_by_id(booking.hotel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))
}

/// Create a session and attach its cookie
async fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &SessionUser,
) -> ApiResult<CookieJar> {
    let token = state.sessions.create_session(user).await.map_err(|e| {
        error!("Failed to create session: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(jar.add(session_cookie(token, state.secure_cookies)))
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
