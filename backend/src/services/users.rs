use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Extra, ListQuery, Paginated};
use crate::{
    gateway::{GatewayClient, QueryParams},
    types::{ApiEnvelope, ResourceId},
};

/// A platform user as listed in the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Login email
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Role on the platform
    #[serde(default)]
    pub role: Option<String>,
    /// Whether the user is active
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Short bio
    #[serde(default)]
    pub bio: Option<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

pub async fn list_users(client: &GatewayClient, query: &ListQuery) -> ApiEnvelope<Paginated<User>> {
    client.get("/users", query.to_params()).await
}

pub async fn get_user_profile(
    client: &GatewayClient,
    id: &ResourceId,
) -> ApiEnvelope<UserProfile> {
    client
        .get(&id.under("/public/profile"), QueryParams::new())
        .await
}
