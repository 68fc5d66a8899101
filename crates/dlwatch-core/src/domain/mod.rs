//! Domain types for downloads reported by the backend.

mod download;
pub mod lenient;

pub use download::{Container, ContentTarget, Download, DownloadStep};
