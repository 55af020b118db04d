//! Browser-facing proxy to the public backend.
//!
//! Unlike the admin routes, the credential is the incoming `Authorization`
//! header; no cookie is read. The backend's status and JSON body are
//! returned unchanged and any failure collapses into a generic 500.

use aide::axum::ApiRouter;
use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::{
    gateway::{BackendGateways, Credential, ForwardRequest, QueryParams, UpstreamResponse},
    types::{envelope::carries_body, AppError},
};

/// Creates the proxy router
pub fn handler() -> ApiRouter {
    ApiRouter::new().route(
        "/api/proxy/{*path}",
        get(forward)
            .post(forward)
            .put(forward)
            .patch(forward)
            .delete(forward),
    )
}

/// Incoming `Authorization` header, forwarded verbatim
pub(super) fn forwarded_credential(headers: &HeaderMap) -> Option<Credential> {
    headers.get(AUTHORIZATION).cloned().map(Credential::Forwarded)
}

/// Mirrors the backend status and JSON body
pub(super) fn mirror(response: &UpstreamResponse) -> Result<Response, AppError> {
    if !carries_body(response.status) {
        return Ok(response.status.into_response());
    }

    let body = response.json()?;
    Ok((response.status, Json(body)).into_response())
}

#[instrument(skip(gateways, headers, query, body))]
async fn forward(
    Extension(gateways): Extension<BackendGateways>,
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let query = if method == Method::GET {
        query.into_iter().collect()
    } else {
        QueryParams::new()
    };

    let body = if method == Method::GET || body.is_empty() {
        None
    } else {
        let value: Value = serde_json::from_slice(&body).map_err(|err| {
            tracing::warn!("Proxy received a non-JSON body: {err}");
            AppError::forwarding_failed()
        })?;
        Some(value)
    };

    let request = ForwardRequest::new(method, format!("/{path}"))
        .query(query)
        .body(body)
        .credential(forwarded_credential(&headers));

    let response = gateways.public.forward(request).await?;

    mirror(&response)
}
