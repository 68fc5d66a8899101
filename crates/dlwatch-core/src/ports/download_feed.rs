//! Download feed port definition.
//!
//! The feed is the read side of the backend: it returns the current set of
//! downloads, optionally scoped to a list of uids.

use async_trait::async_trait;

use super::ApiResult;
use crate::domain::Download;

/// Port for fetching the backend's current downloads.
///
/// # Usage
///
/// ```ignore
/// let feed: Arc<dyn DownloadFeedPort> = /* ... */;
/// if let Some(snapshot) = feed.fetch_downloads(None).await? {
///     set.reconcile(&snapshot);
/// }
/// ```
#[async_trait]
pub trait DownloadFeedPort: Send + Sync {
    /// Fetch one snapshot.
    ///
    /// `uids` scopes the request to a subset; `None` means all downloads.
    /// `Ok(None)` means the backend answered without a download list.
    async fn fetch_downloads(&self, uids: Option<&[String]>) -> ApiResult<Option<Vec<Download>>>;
}
