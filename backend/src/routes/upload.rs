use std::sync::Arc;

use aide::axum::ApiRouter;
use axum::{
    http::{HeaderMap, Method},
    response::Response,
    routing::post,
    Extension, Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::instrument;
use validator::Validate;

use super::proxy::{forwarded_credential, mirror};
use crate::{
    cloudinary::ImageUploader,
    gateway::{BackendGateways, ForwardRequest},
    types::{AppError, ValidatedJson},
};

/// Backend path that stores arbitrary uploaded files
const BACKEND_UPLOAD_PATH: &str = "/upload/any";

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct FileUploadRequest {
    /// Base64 encoded file
    #[serde(default)]
    #[validate(length(min = 1, message = "missing_file"))]
    pub file: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadRequest {
    /// Base64 data URI of the image
    #[serde(default)]
    #[validate(length(min = 1, message = "missing_image"))]
    pub image: String,
    /// Cloudinary preset, defaults to the configured one
    pub upload_preset: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ImageUploadResponse {
    pub url: String,
}

/// Creates the upload router.
///
/// Editor widgets call these endpoints cross-origin, so every route answers
/// CORS preflight requests and carries permissive CORS headers.
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .route("/api/upload/any", post(upload_file))
        .route("/api/proxy/upload/any", post(upload_file))
        .route("/api/upload", post(upload_image))
        .layer(CorsLayer::permissive())
}

#[instrument(skip(gateways, headers, payload))]
async fn upload_file(
    Extension(gateways): Extension<BackendGateways>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<FileUploadRequest>,
) -> Result<Response, AppError> {
    let request = ForwardRequest::new(Method::POST, BACKEND_UPLOAD_PATH)
        .body(Some(json!({ "file": payload.file })))
        .credential(forwarded_credential(&headers));

    let response = gateways.public.forward(request).await?;

    mirror(&response)
}

#[instrument(skip(uploader, payload))]
async fn upload_image(
    Extension(uploader): Extension<Arc<dyn ImageUploader>>,
    ValidatedJson(payload): ValidatedJson<ImageUploadRequest>,
) -> Result<Json<ImageUploadResponse>, AppError> {
    let uploaded = uploader
        .upload_image(&payload.image, payload.upload_preset.as_deref())
        .await?;

    Ok(Json(ImageUploadResponse { url: uploaded.url }))
}
