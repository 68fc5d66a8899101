//! Core domain types, reconciliation engine and port definitions for dlwatch.
//!
//! This crate keeps a local list of downloads in sync with a remote backend
//! that only ever reports full snapshots. It has no knowledge of HTTP: the
//! backend is reached through the traits in [`ports`], implemented by
//! adapter crates.
//!
//! # Structure
//!
//! - [`domain`] - the `Download` record and its lenient decoding
//! - [`reconcile`] - the canonical set, the snapshot merger and status flags
//! - [`ports`] - trait abstractions for the backend and the user
//! - [`services`] - the polling scheduler and the action dispatcher

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod reconcile;
pub mod services;

// Silence unused dev-dependency warnings (used only in integration tests)
#[cfg(test)]
use tokio_test as _;

pub use domain::{Container, ContentTarget, Download, DownloadStep};
pub use ports::{
    ApiError, ApiResult, BackendSettings, BackendSettingsPort, ClearSelection, CommandAck,
    DownloadCommandPort, DownloadFeedPort, FeatureFlags, NoopNotifier, Notice, NoticeLevel,
    NotificationSinkPort, ReadinessNotifier, ReadinessSignal, SharedSettings, readiness_channel,
};
pub use reconcile::{DownloadSet, MergeReport, StatusFlags, aggregate, merge};
pub use services::{
    ActionError, ActionFailure, DownloadAction, DownloadActions, DownloadPoller, DownloadScope,
    DownloadsView, PollHandle, PollerConfig, PollerState, StartOutcome, load_backend_settings,
};
