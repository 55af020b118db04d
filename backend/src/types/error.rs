//! Universal error handling for the API

use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{cloudinary::CloudinaryError, gateway::GatewayError};

/// API error response body returned by every failing route
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: Cow<'static, str>,
    /// Human-readable error message
    pub message: Cow<'static, str>,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(
        status: StatusCode,
        code: &'static str,
        msg: &'static str,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody {
                    code: Cow::Borrowed(code),
                    message: Cow::Borrowed(msg),
                },
            },
        }
    }

    /// Validation failure whose code comes from the `validator` message
    #[must_use]
    pub fn validation(code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            inner: ApiErrorResponse {
                allow_retry: false,
                error: ErrorBody {
                    code: code.into(),
                    message: Cow::Borrowed("Request validation failed"),
                },
            },
        }
    }

    /// Generic failure of the edge forwarding handlers
    #[must_use]
    pub const fn forwarding_failed() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "proxy_error",
            "Failed to forward request",
            true,
        )
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.inner.error.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Forwarding failures never leak upstream detail to the caller
impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        tracing::error!("Forwarding error: {err}");
        Self::forwarding_failed()
    }
}

impl From<CloudinaryError> for AppError {
    fn from(err: CloudinaryError) -> Self {
        use CloudinaryError::{InvalidResponse, NotConfigured, Rejected, Transport};

        match &err {
            NotConfigured => {
                tracing::error!("Cloudinary upload requested but credentials are missing");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upload_not_configured",
                    "Image upload is not configured",
                    false,
                )
            }
            Rejected { status, message } => {
                tracing::warn!(%status, "Cloudinary rejected upload: {message}");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "upload_failed",
                    "Image upload failed",
                    false,
                )
            }
            Transport(_) | InvalidResponse(_) => {
                tracing::error!("Cloudinary error: {err}");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "upload_failed",
                    "Image upload failed",
                    true,
                )
            }
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
