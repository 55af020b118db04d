use std::sync::Arc;

use aide::OperationIo;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Method, StatusCode},
};
use axum_extra::extract::CookieJar;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{ApiGateway, Credential, ForwardRequest, GatewayError, QueryParams};
use crate::{
    session::Session,
    types::{ApiEnvelope, AppError, Environment},
};

/// The two backend bases the service talks to.
///
/// `admin` serves session-backed admin routes, `public` serves the
/// browser-facing proxy and upload forwarding.
#[derive(Clone)]
pub struct BackendGateways {
    /// Gateway for `/v1-admin`
    pub admin: Arc<ApiGateway>,
    /// Gateway for `/v1`
    pub public: Arc<ApiGateway>,
}

impl BackendGateways {
    /// Builds both gateways from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL or the origin is invalid
    pub fn from_environment(environment: &Environment) -> Result<Self, GatewayError> {
        let origin = environment.gateway_origin();
        let timeout = environment.upstream_timeout();

        Ok(Self {
            admin: Arc::new(ApiGateway::new(
                &environment.backend_admin_url(),
                &origin,
                timeout,
            )?),
            public: Arc::new(ApiGateway::new(
                &environment.backend_public_url(),
                &origin,
                timeout,
            )?),
        })
    }
}

/// Request-scoped admin gateway carrying the `Access` cookie token.
///
/// Use it as an extractor in handlers:
/// ```ignore
/// async fn list(client: GatewayClient) -> ApiEnvelope<Value> {
///     client.get("/users", QueryParams::new()).await
/// }
/// ```
#[derive(Clone, OperationIo)]
pub struct GatewayClient {
    gateway: Arc<ApiGateway>,
    credential: Option<Credential>,
}

impl GatewayClient {
    /// Client with an explicit token, `None` for anonymous calls
    #[must_use]
    pub fn new(gateway: Arc<ApiGateway>, token: Option<String>) -> Self {
        Self {
            gateway,
            credential: token.map(Credential::Bearer),
        }
    }

    /// Calls the backend with any method and optional JSON body
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiEnvelope<T> {
        self.gateway
            .request(
                ForwardRequest::new(method, path)
                    .body(body)
                    .credential(self.credential.clone()),
            )
            .await
    }

    /// `GET` with query parameters; absent values are skipped
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: QueryParams) -> ApiEnvelope<T> {
        self.gateway
            .get(path, params, self.credential.clone())
            .await
    }

    /// `POST` with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiEnvelope<T> {
        self.gateway
            .post(path, body, self.credential.clone())
            .await
    }

    /// `PATCH` with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiEnvelope<T> {
        self.gateway
            .patch(path, body, self.credential.clone())
            .await
    }

    /// `DELETE`
    pub async fn del<T: DeserializeOwned>(&self, path: &str) -> ApiEnvelope<T> {
        self.gateway.del(path, self.credential.clone()).await
    }
}

impl<S> FromRequestParts<S> for GatewayClient
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let gateways = parts
            .extensions
            .get::<BackendGateways>()
            .cloned()
            .ok_or_else(|| {
                AppError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Backend gateway is not configured",
                    false,
                )
            })?;

        let session = Session::from_jar(&CookieJar::from_headers(&parts.headers));

        Ok(Self::new(gateways.admin, session.token))
    }
}
