//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No HTTP client types in any signature
//! - Transport failures are mapped to [`ApiError`] by the adapter
//! - Commands are intent-based, one method per backend operation

pub mod backend;
pub mod download_commands;
pub mod download_feed;
pub mod notification_sink;
pub mod readiness;

use thiserror::Error;

pub use backend::{BackendSettings, BackendSettingsPort, FeatureFlags, SharedSettings};
pub use download_commands::{ClearSelection, CommandAck, DownloadCommandPort};
pub use download_feed::DownloadFeedPort;
pub use notification_sink::{NoopNotifier, Notice, NoticeLevel, NotificationSinkPort};
pub use readiness::{ReadinessNotifier, ReadinessSignal, readiness_channel};

/// Result type for backend port operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by backend ports.
///
/// Adapters map their transport-specific errors into these variants so the
/// core never sees HTTP client types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend could not be reached.
    #[error("Network error: {message}")]
    Network {
        /// Detailed error message.
        message: String,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("Backend request failed with status {status}: {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The endpoint that was requested.
        endpoint: String,
    },

    /// The backend answered with a payload that could not be decoded.
    #[error("Invalid response from backend: {message}")]
    InvalidResponse {
        /// Description of what was invalid.
        message: String,
    },

    /// The client is misconfigured (bad base URL, etc.).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

impl ApiError {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Whether the backend itself is unreachable (as opposed to misbehaving).
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
