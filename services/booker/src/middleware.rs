//! Session loading and access gates

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::error;

use crate::{error::ApiError, models::SessionUser, session::SESSION_COOKIE, state::AppState};

/// Capability a route requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    User,
    Admin,
}

/// Decide whether a (possibly anonymous) visitor may proceed
pub fn authorize(user: Option<&SessionUser>, access: Access) -> Result<(), ApiError> {
    match (user, access) {
        (None, _) => Err(ApiError::Unauthorized),
        (Some(user), Access::Admin) if !user.is_admin => Err(ApiError::Forbidden),
        (Some(_), _) => Ok(()),
    }
}

/// Resolve the session cookie, if any, into a [`SessionUser`] extension
pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        // An unreachable session store leaves the visitor anonymous
        match state.sessions.get_session(cookie.value()).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => {}
            Err(e) => error!("Failed to load session: {}", e),
        }
    }

    next.run(req).await
}

/// Reject anonymous visitors
pub async fn require_user(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    authorize(req.extensions().get::<SessionUser>(), Access::User)?;
    Ok(next.run(req).await)
}

/// Reject anonymous visitors and users without the admin flag
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    authorize(req.extensions().get::<SessionUser>(), Access::Admin)?;
    Ok(next.run(req).await)
}
