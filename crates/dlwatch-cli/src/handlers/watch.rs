//! Watch command handler.
//!
//! Loads the backend settings, waits for them, checks the download-manager
//! flag and then polls until Ctrl-C, redrawing the table whenever the
//! download list changes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dlwatch_core::{
    DownloadPoller, DownloadScope, DownloadsView, PollHandle, PollerConfig, SharedSettings,
    StartOutcome, load_backend_settings, readiness_channel,
};
use tracing::{debug, info};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::print_downloads;

const SETTINGS_ATTEMPTS: u32 = 3;
const SETTINGS_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Arguments for the watch command.
#[derive(Debug, Clone)]
pub struct WatchArgs {
    pub uids: Vec<String>,
    pub interval: Duration,
    pub keep_stale: bool,
}

/// Load settings, honour the feature flag and start polling.
pub async fn start(ctx: &CliContext, args: WatchArgs) -> Result<PollHandle, CliError> {
    let settings = Arc::new(SharedSettings::new());
    let (notifier, readiness) = readiness_channel();

    let loader = {
        let port = Arc::clone(&ctx.settings);
        let settings = Arc::clone(&settings);
        tokio::spawn(async move {
            load_backend_settings(
                port.as_ref(),
                &settings,
                &notifier,
                SETTINGS_ATTEMPTS,
                SETTINGS_RETRY_DELAY,
            )
            .await
        })
    };

    let config = PollerConfig::new()
        .with_interval(args.interval)
        .with_discard_stale(!args.keep_stale);
    let poller = DownloadPoller::new(
        Arc::clone(&ctx.feed),
        DownloadScope::from_uids(args.uids),
        config,
    );

    match poller.start_when_ready(readiness, settings.as_ref()).await {
        StartOutcome::Polling(handle) => Ok(handle),
        StartOutcome::NavigateAway => Err(CliError::Unavailable(
            "the download manager is disabled on the server".to_string(),
        )),
        StartOutcome::Abandoned => match loader.await {
            Ok(Err(e)) => Err(e.into()),
            Ok(Ok(_)) => Err(CliError::Backend(
                "backend settings loaded without marking the service ready".to_string(),
            )),
            Err(e) => Err(CliError::Backend(format!("settings loader failed: {e}"))),
        },
    }
}

/// Whether a published view should be drawn.
///
/// Nothing is drawn before the first answer; afterwards only new revisions
/// are drawn.
pub fn should_render(view: &DownloadsView, last_rendered: Option<u64>) -> bool {
    view.retrieved && last_rendered != Some(view.revision)
}

fn render(view: &DownloadsView) {
    // Clear the screen and move the cursor home
    print!("\x1B[2J\x1B[H");
    print_downloads(&view.downloads, view.status);
}

/// Execute the watch command.
pub async fn execute(ctx: &CliContext, args: WatchArgs) -> Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let handle = tokio::select! {
        handle = start(ctx, args) => handle?,
        _ = &mut ctrl_c => return Ok(()),
    };
    info!("Watching downloads; press Ctrl-C to stop");

    let mut views = handle.views();
    let mut last_rendered = None;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if should_render(&view, last_rendered) {
                    render(&view);
                    last_rendered = Some(view.revision);
                }
            }
        }
    }

    debug!("Stopping watch");
    handle.shutdown().await;
    Ok(())
}
