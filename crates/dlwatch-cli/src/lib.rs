//! Terminal front end for the download backend.
//!
//! `dlwatch` polls the backend's download list, renders it as a table and
//! issues pause, resume, restart, cancel and clear commands.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Only used by the binary entry point
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
