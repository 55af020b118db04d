use aide::axum::ApiRouter;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::instrument;

use crate::{
    gateway::{BackendGateways, GatewayClient},
    services::auth::{self, SignInRequest},
    session::{self, Session, SessionState, DEFAULT_EXPIRES_IN_MS},
    types::{envelope::UNKNOWN_ERROR, ApiEnvelope, Environment, ValidatedJson},
};

/// What the dashboard learns from a login; the token stays in the cookie
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Token lifetime in milliseconds
    pub expires_in: i64,
    /// Epoch milliseconds at which the session expires
    pub expires_at: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Creates the session router
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .route("/api/session", get(status))
        .route("/api/session/login", post(login))
        .route("/api/session/logout", post(logout))
}

#[instrument(skip_all)]
async fn login(
    Extension(gateways): Extension<BackendGateways>,
    Extension(environment): Extension<Environment>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Response {
    // Sign-in is anonymous; any stale cookie token is not sent
    let client = GatewayClient::new(gateways.admin, None);
    let envelope = auth::sign_in(&client, &request).await;

    let Some(data) = envelope.data.filter(|_| envelope.success) else {
        tracing::warn!(status = envelope.status, "Admin sign-in failed");
        let message = envelope
            .message
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return ApiEnvelope::<LoginData>::failure(envelope.status, message).into_response();
    };

    let now_ms = chrono::Utc::now().timestamp_millis();
    let expires_in = data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_MS);
    let jar = session::start(
        jar,
        data.access_token,
        expires_in,
        now_ms,
        environment.secure_cookies(),
    );
    tracing::info!("Admin signed in");

    let login = LoginData {
        expires_in,
        expires_at: now_ms.saturating_add(expires_in),
    };
    (jar, ApiEnvelope::ok(envelope.status, login)).into_response()
}

#[allow(clippy::unused_async)]
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (session::end(jar), StatusCode::NO_CONTENT)
}

#[allow(clippy::unused_async)]
async fn status(jar: CookieJar) -> Json<SessionStatus> {
    let now_ms = chrono::Utc::now().timestamp_millis();

    let status = match Session::from_jar(&jar).state(now_ms) {
        SessionState::Active { expires_at_ms } => SessionStatus {
            authenticated: true,
            expires_at: Some(expires_at_ms),
        },
        SessionState::Missing | SessionState::Expired => SessionStatus {
            authenticated: false,
            expires_at: None,
        },
    };

    Json(status)
}
