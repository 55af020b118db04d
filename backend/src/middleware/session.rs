use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    session::{self, Session, SessionState},
    types::AppError,
};

/// Session guard for admin routes
///
/// This middleware:
/// 1. Reads the `Access`, `ExpiresIn` and `TokenSetTime` cookies
/// 2. Rejects requests without a token with 401
/// 3. Rejects expired sessions with 401 and clears the session cookies
///
/// The token itself is not validated here; the backend does that on every
/// forwarded call.
pub async fn session_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let now_ms = chrono::Utc::now().timestamp_millis();

    match Session::from_jar(&jar).state(now_ms) {
        SessionState::Active { .. } => next.run(request).await,
        SessionState::Missing => AppError::new(
            StatusCode::UNAUTHORIZED,
            "missing_session",
            "Sign in to access the admin API",
            false,
        )
        .into_response(),
        SessionState::Expired => {
            tracing::debug!("Rejecting expired admin session");
            (
                session::end(jar),
                AppError::new(
                    StatusCode::UNAUTHORIZED,
                    "session_expired",
                    "Session expired, sign in again",
                    false,
                ),
            )
                .into_response()
        }
    }
}
