//! Internal error types for backend requests.
//!
//! These errors are internal to `dlwatch-client` and are mapped to core port
//! errors at the boundary.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success HTTP status.
    #[error("Backend request failed with status {status}: {endpoint}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Path of the endpoint that was requested (credentials stripped)
        endpoint: String,
    },

    /// The backend answered with something that is not the expected shape.
    #[error("Invalid response from backend: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_error_message() {
        let error = ClientError::RequestFailed {
            status: 500,
            endpoint: "/api/downloads".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("/api/downloads"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ClientError = parse_error.into();
        assert!(matches!(error, ClientError::JsonParse(_)));
        assert!(error.to_string().starts_with("JSON parsing error"));
    }

    #[test]
    fn test_url_error_converts() {
        let error: ClientError = ::url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(error, ClientError::InvalidUrl(_)));
    }
}
