use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Extra, ListQuery, Paginated};
use crate::{
    gateway::GatewayClient,
    types::{ApiEnvelope, ResourceId},
};

/// Someone who signed up before launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Signup time as the backend formats it
    #[serde(default)]
    pub created_at: Option<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

pub async fn list_waitlist(
    client: &GatewayClient,
    query: &ListQuery,
) -> ApiEnvelope<Paginated<WaitlistEntry>> {
    client.get("/waitlist", query.to_params()).await
}

pub async fn remove_waitlist_entry(
    client: &GatewayClient,
    id: &ResourceId,
) -> ApiEnvelope<Value> {
    client.del(&id.under("/waitlist")).await
}
