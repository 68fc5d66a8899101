//! List command handler.
//!
//! Fetches the download list once and prints it.

use anyhow::Result;
use dlwatch_core::{DownloadFeedPort, DownloadScope, DownloadSet, merge};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::print_downloads;

/// Fetch one snapshot and merge it into an empty set.
///
/// Returns `None` when the server answered without a download list.
pub async fn fetch_once(
    feed: &dyn DownloadFeedPort,
    scope: &DownloadScope,
) -> Result<Option<DownloadSet>, CliError> {
    let uids = scope.uids();
    let snapshot = feed.fetch_downloads(uids.as_deref()).await?;
    Ok(snapshot.map(|snapshot| merge(DownloadSet::new(), &snapshot)))
}

/// Execute the list command.
pub async fn execute(ctx: &CliContext, uids: Vec<String>) -> Result<()> {
    let scope = DownloadScope::from_uids(uids);

    match fetch_once(ctx.feed.as_ref(), &scope).await? {
        Some(set) => print_downloads(&set.to_vec(), set.status()),
        None => println!("The server did not report a download list."),
    }

    Ok(())
}
