//! Read-only lookups on the backend's public surface

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Extra;
use crate::{
    gateway::{GatewayClient, QueryParams},
    types::{ApiEnvelope, ResourceId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(alias = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Aggregate rating of a merchant or package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

pub async fn get_faq(client: &GatewayClient, id: &ResourceId) -> ApiEnvelope<Vec<Faq>> {
    client
        .get(&id.under("/public/faq"), QueryParams::new())
        .await
}

pub async fn get_rating(client: &GatewayClient, id: &ResourceId) -> ApiEnvelope<Rating> {
    client.get(&id.under("/rate"), QueryParams::new()).await
}

pub async fn get_reviews(
    client: &GatewayClient,
    id: &ResourceId,
) -> ApiEnvelope<Vec<Review>> {
    client
        .get(&id.under("/rate/reviews"), QueryParams::new())
        .await
}
