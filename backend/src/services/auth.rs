use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{gateway::GatewayClient, types::ApiEnvelope};

/// Admin login form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct SignInRequest {
    /// Admin email
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    /// Admin password
    #[validate(length(min = 1, message = "missing_password"))]
    pub password: String,
}

/// Token issued by `/auth/sign-in`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInData {
    /// Bearer token for later calls
    #[serde(alias = "access_token", alias = "token")]
    pub access_token: String,
    /// Token lifetime in milliseconds
    #[serde(default, alias = "expires_in")]
    pub expires_in: Option<i64>,
}

/// Exchanges admin credentials for a bearer token
pub async fn sign_in(client: &GatewayClient, request: &SignInRequest) -> ApiEnvelope<SignInData> {
    client.post("/auth/sign-in", request).await
}
