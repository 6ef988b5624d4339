//! Error types for the API client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

/// Message carried by the cancellation sentinel.
pub const CANCELLED_MESSAGE: &str = "Request cancelled";

// == Api Error Enum ==
/// Unified error type for every call made through the client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-2xx status.
    ///
    /// `message` is the best available human-readable text: the body's
    /// `detail`, then `message`, then `HTTP {status}`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request was superseded by a newer one under the same key
    /// (or by a bulk cancel) before it settled.
    #[error("{}", CANCELLED_MESSAGE)]
    Cancelled,

    /// Transport-level failure (DNS, connection reset, invalid URL...)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A successful response body could not be decoded into the requested type
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request body could not be serialized to JSON
    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),
}

impl ApiError {
    /// Returns true for the cancellation sentinel.
    ///
    /// UI stores use this to suppress error banners during rapid navigation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// HTTP status for `Http` failures, None otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_message_verbatim() {
        let err = ApiError::Http {
            status: 400,
            message: "Invalid email".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid email");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled_sentinel() {
        let err = ApiError::Cancelled;
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), CANCELLED_MESSAGE);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_decode_error_from_serde() {
        let serde_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ApiError = serde_err.into();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
