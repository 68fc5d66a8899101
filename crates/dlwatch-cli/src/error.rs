//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from core errors to exit codes and user-facing messages.

use dlwatch_core::{ActionError, ActionFailure, ApiError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or lookup error caused by what the user typed.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The backend cannot be reached, or the download manager is off.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Configuration error (bad server URL, etc.).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered, but not with what was asked for.
    #[error("{0}")]
    Backend(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Backend(_) => 1,
            Self::Arguments(_) => 2,    // EX_USAGE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network { message } => Self::Unavailable(message),
            ApiError::Configuration { message } => Self::Config(message),
            other @ (ApiError::Status { .. } | ApiError::InvalidResponse { .. }) => {
                Self::Backend(other.to_string())
            }
        }
    }
}

impl From<ActionError> for CliError {
    fn from(err: ActionError) -> Self {
        let summary = err.to_string();
        match err.cause {
            ActionFailure::Api(api) if api.is_unreachable() => Self::from(api),
            ActionFailure::Api(ApiError::Configuration { message }) => Self::Config(message),
            _ => Self::Backend(summary),
        }
    }
}
