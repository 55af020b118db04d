//! Signed image uploads to Cloudinary
mod error;

use std::collections::BTreeMap;
use std::time::Duration;

use axum::http::header;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub use error::CloudinaryError;

/// Public Cloudinary API host
pub const CLOUDINARY_API_BASE_URL: &str = "https://api.cloudinary.com";

/// Cloudinary account credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Account cloud name, part of the upload URL
    pub cloud_name: String,
    /// API key sent with every upload
    pub api_key: String,
    /// Secret used to sign uploads, never sent
    pub api_secret: String,
    /// Preset applied when the caller does not name one
    pub default_upload_preset: Option<String>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// HTTPS delivery URL
    pub url: String,
    /// Cloudinary asset identifier
    pub public_id: Option<String>,
}

/// Trait for uploading images to an image host
#[async_trait::async_trait]
pub trait ImageUploader: Send + Sync {
    /// Uploads `image` (base64 data URI or remote URL) and returns its URL
    async fn upload_image(
        &self,
        image: &str,
        upload_preset: Option<&str>,
    ) -> Result<UploadedImage, CloudinaryError>;
}

/// Uploader used when credentials are missing; every upload fails
pub struct UnconfiguredUploader;

#[async_trait::async_trait]
impl ImageUploader for UnconfiguredUploader {
    async fn upload_image(
        &self,
        _image: &str,
        _upload_preset: Option<&str>,
    ) -> Result<UploadedImage, CloudinaryError> {
        Err(CloudinaryError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    #[serde(default)]
    public_id: Option<String>,
}

/// HTTP client for the Cloudinary upload API
pub struct CloudinaryClient {
    config: CloudinaryConfig,
    api_base_url: String,
    http_client: ClientWithMiddleware,
}

impl CloudinaryClient {
    /// Creates a client posting to `api_base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        config: CloudinaryConfig,
        api_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CloudinaryError> {
        let reqwest_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CloudinaryError::Transport(e.to_string()))?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            config,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base_url, self.config.cloud_name
        )
    }
}

/// Cloudinary request signature: the sorted `key=value` pairs joined with
/// `&`, followed by the API secret, hashed with SHA-256.
#[must_use]
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{to_sign}{api_secret}")))
}

#[async_trait::async_trait]
impl ImageUploader for CloudinaryClient {
    async fn upload_image(
        &self,
        image: &str,
        upload_preset: Option<&str>,
    ) -> Result<UploadedImage, CloudinaryError> {
        let mut signed = BTreeMap::new();
        signed.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        if let Some(preset) = upload_preset.or(self.config.default_upload_preset.as_deref()) {
            signed.insert("upload_preset", preset.to_string());
        }
        let signature = sign_params(&signed, &self.config.api_secret);

        let mut body: serde_json::Map<String, Value> = signed
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value)))
            .collect();
        body.insert("file".to_string(), Value::from(image));
        body.insert("api_key".to_string(), Value::from(self.config.api_key.as_str()));
        body.insert("signature".to_string(), Value::from(signature));
        body.insert("signature_algorithm".to_string(), Value::from("sha256"));

        let json_body = serde_json::to_vec(&body)
            .map_err(|e| CloudinaryError::InvalidResponse(e.to_string()))?;

        let response = self
            .http_client
            .post(self.upload_url())
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(json_body)
            .send()
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CloudinaryError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            // Cloudinary reports failures as {"error": {"message": ...}}
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(ToString::to_string))
                .unwrap_or(text);
            return Err(CloudinaryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = serde_json::from_str(&text)
            .map_err(|e| CloudinaryError::InvalidResponse(e.to_string()))?;

        tracing::info!(public_id = ?uploaded.public_id, "Image uploaded to Cloudinary");

        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::Mutex;

    use super::{CloudinaryError, ImageUploader, UploadedImage};

    /// Records uploads and answers with a fixed URL
    pub struct MockImageUploader {
        url: String,
        uploads: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MockImageUploader {
        #[must_use]
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                uploads: Mutex::new(Vec::new()),
            }
        }

        /// `(image, upload_preset)` for every upload so far
        ///
        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn uploads(&self) -> Vec<(String, Option<String>)> {
            self.uploads.lock().expect("uploads lock poisoned").clone()
        }
    }

    #[async_trait::async_trait]
    impl ImageUploader for MockImageUploader {
        async fn upload_image(
            &self,
            image: &str,
            upload_preset: Option<&str>,
        ) -> Result<UploadedImage, CloudinaryError> {
            self.uploads
                .lock()
                .expect("uploads lock poisoned")
                .push((image.to_string(), upload_preset.map(ToString::to_string)));

            Ok(UploadedImage {
                url: self.url.clone(),
                public_id: None,
            })
        }
    }
}
