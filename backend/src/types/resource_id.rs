//! Backend resource identifiers taken from the request path

use std::fmt;

use aide::{operation::OperationInput, OperationOutput};
use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};

use crate::types::error::AppError;

/// Identifier of a backend entity, safe to splice into a backend path.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted, and `.` or
/// `..` alone are rejected, so an id always stays one path segment under the
/// collection it is placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId(String);

impl ResourceId {
    /// Validates a raw id
    #[must_use]
    pub fn new(id: &str) -> Option<Self> {
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');

        if id.is_empty() || id == "." || id == ".." || !id.chars().all(allowed) {
            return None;
        }
        Some(Self(id.to_string()))
    }

    /// `<collection>/<id>`
    #[must_use]
    pub fn under(&self, collection: &str) -> String {
        format!("{}/{}", collection.trim_end_matches('/'), self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid_id() -> AppError {
    AppError::new(
        StatusCode::BAD_REQUEST,
        "invalid_id",
        "Invalid resource id",
        false,
    )
}

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;

        Self::new(&id).ok_or_else(|| {
            tracing::warn!(id = %id, "Rejected resource id");
            invalid_id()
        })
    }
}

impl OperationInput for ResourceId {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Path::<String>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AppError::inferred_responses(ctx, operation)
    }
}
