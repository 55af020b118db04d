use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{Extra, ListQuery, Paginated};
use crate::{
    gateway::{GatewayClient, QueryParams},
    types::{ApiEnvelope, ResourceId},
};

/// Publication state of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// A blog post; `content` is the editor's HTML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for creating a post
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    #[validate(length(min = 1, message = "missing_title"))]
    pub title: String,
    #[validate(length(min = 1, message = "missing_content"))]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update of a post; only set fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

pub async fn list_posts(
    client: &GatewayClient,
    query: &ListQuery,
) -> ApiEnvelope<Paginated<BlogPost>> {
    client.get("/blog", query.to_params()).await
}

pub async fn create_post(client: &GatewayClient, post: &NewBlogPost) -> ApiEnvelope<BlogPost> {
    client.post("/blog", post).await
}

pub async fn get_post(client: &GatewayClient, id: &ResourceId) -> ApiEnvelope<BlogPost> {
    client.get(&id.under("/blog"), QueryParams::new()).await
}

pub async fn update_post(
    client: &GatewayClient,
    id: &ResourceId,
    patch: &BlogPostPatch,
) -> ApiEnvelope<BlogPost> {
    client.patch(&id.under("/blog"), patch).await
}

pub async fn delete_post(client: &GatewayClient, id: &ResourceId) -> ApiEnvelope<Value> {
    client.del(&id.under("/blog")).await
}
