//! Uniform result shape returned by every gateway call

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Message used when the backend gave no usable error text
pub const UNKNOWN_ERROR: &str = "Unknown Error";
/// Message used when no response was received at all
pub const SERVER_ERROR: &str = "Server Error";
/// Message used when a 2xx body does not match the expected payload
pub const MALFORMED_RESPONSE: &str = "Malformed backend response";

/// Outcome of a backend call.
///
/// Callers branch on `success` rather than on an error type: the gateway
/// never fails, it reports failures through this envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiEnvelope<T> {
    /// Whether the backend answered with a 2xx status and a well-formed body
    pub success: bool,
    /// Backend status, or 500 when no response was received
    pub status: u16,
    /// Error text, only present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Parsed payload, `null` on failure
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope
    #[must_use]
    pub const fn ok(status: u16, data: T) -> Self {
        Self {
            success: true,
            status,
            message: None,
            data: Some(data),
        }
    }

    /// Failed envelope
    #[must_use]
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Envelope for a call that never reached the backend
    #[must_use]
    pub fn server_error() -> Self {
        Self::failure(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // Statuses that forbid a body would drop the envelope on the wire
        let status = if carries_body(status) { status } else { StatusCode::OK };
        (status, Json(self)).into_response()
    }
}

/// Whether HTTP allows a response body with `status`
pub(crate) fn carries_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::RESET_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

impl<T: JsonSchema> OperationOutput for ApiEnvelope<T> {
    type Inner = Self;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<Self>::operation_response(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_serializes_null_data() {
        let envelope: ApiEnvelope<serde_json::Value> =
            ApiEnvelope::failure(401, "Invalid credentials");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "status": 401,
                "message": "Invalid credentials",
                "data": null
            })
        );
    }

    #[test]
    fn test_success_omits_message() {
        let envelope = ApiEnvelope::ok(200, json!({"results": []}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "status": 200, "data": {"results": []}})
        );
    }

    #[test]
    fn test_server_error_shape() {
        let envelope: ApiEnvelope<()> = ApiEnvelope::server_error();
        assert!(!envelope.success);
        assert_eq!(envelope.status, 500);
        assert_eq!(envelope.message.as_deref(), Some("Server Error"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_response_uses_envelope_status() {
        let envelope: ApiEnvelope<()> = ApiEnvelope::failure(404, "Not found");
        assert_eq!(envelope.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_no_content_envelope_is_sent_as_ok() {
        let envelope: ApiEnvelope<serde_json::Value> =
            ApiEnvelope::ok(204, serde_json::Value::Null);
        let response = envelope.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"success": true, "status": 204, "data": null}));
    }
}
