//! Error types for Cloudinary uploads

use thiserror::Error;

/// Errors that can occur while uploading an image
#[derive(Error, Debug)]
pub enum CloudinaryError {
    /// Credentials are missing from the environment
    #[error("Cloudinary is not configured")]
    NotConfigured,

    /// No response was received
    #[error("Cloudinary unreachable: {0}")]
    Transport(String),

    /// Cloudinary answered with an error status
    #[error("Cloudinary rejected the upload ({status}): {message}")]
    Rejected {
        /// HTTP status returned by Cloudinary
        status: u16,
        /// Error text from the response body
        message: String,
    },

    /// The success body could not be parsed
    #[error("Invalid Cloudinary response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest_middleware::Error> for CloudinaryError {
    fn from(error: reqwest_middleware::Error) -> Self {
        Self::Transport(error.to_string())
    }
}
