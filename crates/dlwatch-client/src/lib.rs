//! HTTP client for the download backend.
//!
//! [`DefaultApiClient`] talks to the backend's REST API and implements the
//! `dlwatch-core` ports for fetching downloads, issuing commands and loading
//! backend settings. Transport errors stay inside this crate and are mapped
//! to [`dlwatch_core::ApiError`] at the port boundary.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dlwatch_client::{ApiClientConfig, DefaultApiClient};
//! use dlwatch_core::DownloadFeedPort;
//!
//! # fn main() -> Result<(), dlwatch_core::ApiError> {
//! let config = ApiClientConfig::new()
//!     .with_base_url("http://localhost:17442")
//!     .with_api_key("secret");
//! let feed: Arc<dyn DownloadFeedPort> = Arc::new(DefaultApiClient::new(&config)?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultApiClient is meant to be used through the core port traits, not its
// internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultApiClient;

// Configuration
pub use config::{ApiClientConfig, DEFAULT_BASE_URL};
