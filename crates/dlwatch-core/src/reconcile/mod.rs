//! Snapshot reconciliation: the canonical set, the merger and derived flags.

mod set;
mod status;

pub use set::{DownloadSet, MergeReport, merge};
pub use status::{StatusFlags, aggregate};
