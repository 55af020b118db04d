use axum::http::HeaderValue;

use super::GatewayError;

/// Where the `Authorization` header of a forwarded call comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Token read from the `Access` session cookie
    Bearer(String),
    /// `Authorization` header received from the browser, sent unchanged
    Forwarded(HeaderValue),
}

impl Credential {
    /// Header value to send to the backend
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidCredential` if the token contains
    /// characters that are not valid in a header
    pub fn header_value(&self) -> Result<HeaderValue, GatewayError> {
        match self {
            Self::Bearer(token) => {
                let mut value = HeaderValue::try_from(format!("Bearer {token}"))
                    .map_err(|_| GatewayError::InvalidCredential)?;
                value.set_sensitive(true);
                Ok(value)
            }
            Self::Forwarded(value) => Ok(value.clone()),
        }
    }
}
