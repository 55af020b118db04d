//! Authenticated gateway to the external I-HAVEN backend.
//!
//! Every backend call in the service goes through [`ApiGateway::forward`],
//! whether it originates from a session-backed admin route (token from the
//! `Access` cookie) or from the browser-facing proxy (token from the incoming
//! `Authorization` header). [`ApiGateway::request`] wraps `forward` and
//! folds every outcome into an [`ApiEnvelope`].

mod client;
mod credential;
mod error;
mod query;

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, StatusCode};
use reqwest::{Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use client::{BackendGateways, GatewayClient};
pub use credential::Credential;
pub use error::GatewayError;
pub use query::QueryParams;

use crate::types::envelope::{ApiEnvelope, MALFORMED_RESPONSE, UNKNOWN_ERROR};

/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// A single call to forward to the backend
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the gateway base, with or without leading `/`
    pub path: String,
    /// Query parameters
    pub query: QueryParams,
    /// JSON body
    pub body: Option<Value>,
    /// Source of the `Authorization` header
    pub credential: Option<Credential>,
}

impl ForwardRequest {
    /// Request without query, body or credential
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            credential: None,
        }
    }

    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }
}

/// Raw backend answer: any status counts as a transport success
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Backend status code
    pub status: StatusCode,
    /// Unparsed body
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Parses the body as JSON, treating an empty body as `null`
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidResponse` if the body is not JSON
    pub fn json(&self) -> Result<Value, GatewayError> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    /// Body as JSON if possible, otherwise as a JSON string
    #[must_use]
    pub fn json_lossy(&self) -> Value {
        self.json()
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }

    /// Error text the backend put in `message` or `errorMessage`
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let body = self.json().ok()?;
        ["message", "errorMessage"]
            .iter()
            .find_map(|field| body.get(field).and_then(Value::as_str))
            .map(ToString::to_string)
    }
}

/// HTTP client bound to one backend base URL
pub struct ApiGateway {
    base_url: String,
    origin: HeaderValue,
    http_client: ClientWithMiddleware,
}

impl ApiGateway {
    /// Creates a gateway for `base_url` that sends `origin` as `Origin`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or origin is invalid, or the HTTP
    /// client cannot be built
    pub fn new(base_url: &str, origin: &str, timeout: Duration) -> Result<Self, GatewayError> {
        Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        let origin = HeaderValue::from_str(origin)
            .map_err(|_| GatewayError::InvalidUrl(format!("invalid origin {origin}")))?;

        let reqwest_client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .user_agent(format!("ihaven-gateway/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            origin,
            http_client,
        })
    }

    /// Base URL this gateway forwards to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `<base-url><path>?<query>`
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidUrl` if the result is not a valid URL,
    /// or if `path` carries a query, a fragment or a dot segment that would
    /// leave the base path
    pub fn url_for(&self, path: &str, query: &QueryParams) -> Result<Url, GatewayError> {
        if path.contains(['?', '#']) || path.split('/').any(is_dot_segment) {
            return Err(GatewayError::InvalidUrl(format!("unsafe path {path}")));
        }

        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!("{}{separator}{path}", self.base_url))
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }

        Ok(url)
    }

    /// Sends one request to the backend, exactly once.
    ///
    /// # Errors
    ///
    /// Fails only when no response was received or the request could not
    /// be built; every backend status is returned as `Ok`
    pub async fn forward(&self, request: ForwardRequest) -> Result<UpstreamResponse, GatewayError> {
        let url = self.url_for(&request.path, &request.query)?;

        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .header(header::ORIGIN, self.origin.clone());

        if let Some(credential) = &request.credential {
            builder = builder.header(header::AUTHORIZATION, credential.header_value()?);
        }

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        tracing::debug!(method = %request.method, path = %request.path, "Forwarding to backend");

        let response = builder.send().await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(UpstreamResponse { status, body })
    }

    /// Calls the backend and folds the outcome into an envelope.
    ///
    /// Never fails: transport errors become a 500 envelope, backend errors
    /// carry the backend's status and message.
    pub async fn request<T: DeserializeOwned>(&self, request: ForwardRequest) -> ApiEnvelope<T> {
        let method = request.method.clone();
        let path = request.path.clone();

        match self.forward(request).await {
            Ok(response) => envelope_from_response(&response),
            Err(err) => {
                tracing::error!(%method, %path, "Backend call failed: {err}");
                ApiEnvelope::server_error()
            }
        }
    }

    /// `GET` with query parameters; absent values are skipped
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: QueryParams,
        credential: Option<Credential>,
    ) -> ApiEnvelope<T> {
        self.request(
            ForwardRequest::new(Method::GET, path)
                .query(params)
                .credential(credential),
        )
        .await
    }

    /// `POST` with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        credential: Option<Credential>,
    ) -> ApiEnvelope<T> {
        self.send_with_body(Method::POST, path, body, credential).await
    }

    /// `PATCH` with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        credential: Option<Credential>,
    ) -> ApiEnvelope<T> {
        self.send_with_body(Method::PATCH, path, body, credential).await
    }

    /// `DELETE` without a body
    pub async fn del<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: Option<Credential>,
    ) -> ApiEnvelope<T> {
        self.request(ForwardRequest::new(Method::DELETE, path).credential(credential))
            .await
    }

    async fn send_with_body<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        credential: Option<Credential>,
    ) -> ApiEnvelope<T> {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(%method, %path, "Failed to serialize request body: {err}");
                return ApiEnvelope::server_error();
            }
        };

        self.request(
            ForwardRequest::new(method, path)
                .body(Some(body))
                .credential(credential),
        )
        .await
    }
}

/// Maps a backend answer onto the envelope contract
fn envelope_from_response<T: DeserializeOwned>(response: &UpstreamResponse) -> ApiEnvelope<T> {
    let status = response.status.as_u16();

    if !response.status.is_success() {
        let message = response
            .error_message()
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return ApiEnvelope::failure(status, message);
    }

    match serde_json::from_value::<T>(response.json_lossy()) {
        Ok(data) => ApiEnvelope::ok(status, data),
        Err(err) => {
            tracing::warn!(status, "Backend payload did not match expected shape: {err}");
            ApiEnvelope::failure(StatusCode::BAD_GATEWAY.as_u16(), MALFORMED_RESPONSE)
        }
    }
}

fn is_dot_segment(segment: &str) -> bool {
    let segment = segment.to_ascii_lowercase().replace("%2e", ".");
    segment == "." || segment == ".."
}
