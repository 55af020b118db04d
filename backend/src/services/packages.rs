use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{Extra, ListQuery, Paginated};
use crate::{
    gateway::{GatewayClient, QueryParams},
    types::{ApiEnvelope, ResourceId},
};

/// A subscription package sold on the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Package name
    pub name: String,
    /// Price as the backend formats it
    #[serde(default)]
    pub price: Option<Value>,
    /// Billing period
    #[serde(default)]
    pub duration: Option<String>,
    /// Marketing description
    #[serde(default)]
    pub description: Option<String>,
    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating a package
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    /// Package name
    #[validate(length(min = 1, message = "missing_name"))]
    pub name: String,
    /// Price
    pub price: Value,
    /// Billing period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Marketing description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,
}

/// Partial update of a package; only set fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

pub async fn list_packages(
    client: &GatewayClient,
    query: &ListQuery,
) -> ApiEnvelope<Paginated<Package>> {
    client.get("/packages", query.to_params()).await
}

pub async fn create_package(client: &GatewayClient, package: &NewPackage) -> ApiEnvelope<Package> {
    client.post("/packages", package).await
}

pub async fn get_package(client: &GatewayClient, id: &ResourceId) -> ApiEnvelope<Package> {
    client
        .get(&id.under("/package"), QueryParams::new())
        .await
}

pub async fn update_package(
    client: &GatewayClient,
    id: &ResourceId,
    patch: &PackagePatch,
) -> ApiEnvelope<Package> {
    client.patch(&id.under("/package"), patch).await
}

/// The backend answers deletes with an arbitrary acknowledgement body
pub async fn delete_package(client: &GatewayClient, id: &ResourceId) -> ApiEnvelope<Value> {
    client.del(&id.under("/package")).await
}

/// Package as shown on the public storefront
pub async fn get_public_package(
    client: &GatewayClient,
    id: &ResourceId,
) -> ApiEnvelope<Package> {
    client
        .get(&id.under("/public/packages"), QueryParams::new())
        .await
}
