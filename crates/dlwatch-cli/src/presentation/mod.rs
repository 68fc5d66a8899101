//! Shared CLI presentation utilities.
//!
//! This module provides display and formatting functions for consistent
//! CLI output across commands.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Reconciliation and status derivation belong in `dlwatch-core`

pub mod download_table;
pub mod tables;

// Re-export commonly used items
pub use download_table::{
    DownloadRow, download_row, format_progress, format_started, print_downloads, state_label,
};
pub use tables::{format_optional, print_separator, truncate_string};
