//! Backend REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, categories, sliders,
//!   delivery charges, orders and admin identity
//! - No local persistence and no response caching; every page fetches live
//! - Privileged calls carry `Authorization: Bearer <token>` from the session
//!
//! # Example
//!
//! ```rust,ignore
//! use feriwala_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(config.backend_api_url.clone());
//! let products = client.products().await?;
//! client.delete_product(&token, &products[0].id).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use thiserror::Error;

/// Fallback shown when the backend gives no usable error text.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection refused, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl BackendError {
    /// Text suitable for a flash message or inline form error.
    ///
    /// Only the backend's own `message`/`error` text is passed through;
    /// transport and parse failures collapse to a generic notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::NotFound(_) => "The requested item no longer exists.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Pull a human-readable message out of a backend error body.
///
/// Backend errors look like `{ "message": "..." }` or `{ "error": "..." }`.
/// Anything else yields an empty string.
pub(crate) fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };

    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message":"Product not found"}"#),
            "Product not found"
        );
        assert_eq!(
            extract_error_message(r#"{"error":"Invalid delivery charge"}"#),
            "Invalid delivery charge"
        );
        // message wins when both are present
        assert_eq!(extract_error_message(r#"{"message":"a","error":"b"}"#), "a");
        assert_eq!(extract_error_message(r#"{"error":{"code":1}}"#), "");
        assert_eq!(extract_error_message("<html>Bad Gateway</html>"), "");
        assert_eq!(extract_error_message(""), "");
    }

    #[test]
    fn test_user_message() {
        let err = BackendError::Status {
            status: 400,
            message: "Category is in use".to_string(),
        };
        assert_eq!(err.user_message(), "Category is in use");

        let err = BackendError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let err = BackendError::Parse(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }
}
