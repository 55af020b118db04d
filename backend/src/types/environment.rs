//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use tracing::Level;

use crate::cloudinary::CloudinaryConfig;

/// Default base for the admin gateway (server-side calls)
const DEFAULT_BACKEND_ADMIN_URL: &str = "https://ihaven.vercel.app/v1-admin";
/// Default base for the browser-facing proxy and upload forwarding
const DEFAULT_BACKEND_PUBLIC_URL: &str = "https://ihaven.vercel.app/v1";
/// Default `Origin` header sent to the backend
const DEFAULT_GATEWAY_ORIGIN: &str = "http://localhost:3000";
/// Default outbound request timeout in seconds
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Local development
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable.
    ///
    /// When `APP_ENV` is unset, `NODE_ENV=production` selects production so
    /// deployments configured for the dashboard keep their cookie policy.
    /// Any other `NODE_ENV` value selects development.
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let Ok(app_env) = env::var("APP_ENV") else {
            let node_env = env::var("NODE_ENV").unwrap_or_default();
            return if node_env.trim().eq_ignore_ascii_case("production") {
                Self::Production
            } else {
                Self::Development
            };
        };

        let env = app_env.trim().to_lowercase();
        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" | "test" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Base URL for the admin gateway
    #[must_use]
    pub fn backend_admin_url(&self) -> String {
        env::var("BACKEND_ADMIN_URL").unwrap_or_else(|_| DEFAULT_BACKEND_ADMIN_URL.to_string())
    }

    /// Base URL for the edge forwarding handlers
    #[must_use]
    pub fn backend_public_url(&self) -> String {
        env::var("BACKEND_PUBLIC_URL").unwrap_or_else(|_| DEFAULT_BACKEND_PUBLIC_URL.to_string())
    }

    /// Fixed `Origin` header attached to every backend call
    #[must_use]
    pub fn gateway_origin(&self) -> String {
        env::var("GATEWAY_ORIGIN").unwrap_or_else(|_| DEFAULT_GATEWAY_ORIGIN.to_string())
    }

    /// Timeout for a single outbound call
    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        let secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Whether session cookies carry the `Secure` attribute
    #[must_use]
    pub const fn secure_cookies(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Cloudinary credentials, if all three are configured
    #[must_use]
    pub fn cloudinary_config(&self) -> Option<CloudinaryConfig> {
        let non_empty = |name: &str| env::var(name).ok().filter(|val| !val.trim().is_empty());

        Some(CloudinaryConfig {
            cloud_name: non_empty("CLOUDINARY_CLOUD_NAME")?,
            api_key: non_empty("CLOUDINARY_API_KEY")?,
            api_secret: non_empty("CLOUDINARY_API_SECRET")?,
            default_upload_preset: non_empty("NEXT_PUBLIC_CLOUDINARY_UPLOAD_PRESET"),
        })
    }

    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
