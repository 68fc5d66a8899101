//! Error command handler.
//!
//! Prints the full error text of one download, which the table truncates.

use anyhow::Result;
use dlwatch_core::DownloadFeedPort;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Look up a download's error text.
///
/// Returns `Ok(None)` when the download exists but has not failed.
pub async fn find_error(feed: &dyn DownloadFeedPort, uid: &str) -> Result<Option<String>, CliError> {
    let uids = [uid.to_string()];
    let snapshot = feed.fetch_downloads(Some(uids.as_slice())).await?.unwrap_or_default();

    let download = snapshot
        .into_iter()
        .find(|d| d.uid == uid)
        .ok_or_else(|| CliError::Arguments(format!("no download with uid '{uid}'")))?;

    Ok(download.error.filter(|e| !e.is_empty()))
}

/// Execute the error command.
pub async fn execute(ctx: &CliContext, uid: &str) -> Result<()> {
    match find_error(ctx.feed.as_ref(), uid).await? {
        Some(text) => println!("{text}"),
        None => println!("Download {uid} has not failed."),
    }
    Ok(())
}
