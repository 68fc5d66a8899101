//! Download list rendering.

use chrono::{DateTime, Local, Utc};
use dlwatch_core::{Download, StatusFlags};

use super::tables::{format_optional, print_separator, truncate_string};

const TABLE_WIDTH: usize = 118;

/// One table row, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRow {
    pub started: String,
    pub title: String,
    pub step: String,
    pub subscription: String,
    pub progress: String,
    pub state: &'static str,
}

/// Format a start timestamp (milliseconds since the epoch) in local time.
#[allow(clippy::cast_possible_truncation)] // sub-millisecond precision is irrelevant here
pub fn format_started(timestamp_ms: Option<f64>) -> String {
    timestamp_ms
        .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
        .map_or_else(
            || "--".to_string(),
            |utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            },
        )
}

/// Format progress as a percentage with one decimal.
pub fn format_progress(download: &Download) -> String {
    if download.finished {
        return "100.0%".to_string();
    }
    download
        .percent_complete
        .map_or_else(|| "--".to_string(), |p| format!("{p:.1}%"))
}

/// Short state label. Errors win over every other state.
pub fn state_label(download: &Download) -> &'static str {
    if download.has_error() {
        "error"
    } else if download.finished {
        "finished"
    } else if download.paused {
        "paused"
    } else {
        "running"
    }
}

/// Build the table row for one download.
pub fn download_row(download: &Download) -> DownloadRow {
    let title = download
        .title
        .as_deref()
        .or(download.url.as_deref())
        .unwrap_or(&download.uid);

    DownloadRow {
        started: format_started(download.timestamp_start),
        title: title.to_string(),
        step: download.step().label().to_string(),
        subscription: format_optional(download.sub_name.as_ref(), "--"),
        progress: format_progress(download),
        state: state_label(download),
    }
}

/// Print downloads as a table followed by a hint line for bulk actions.
pub fn print_downloads(downloads: &[Download], status: StatusFlags) {
    if downloads.is_empty() {
        println!("No downloads.");
        return;
    }

    println!(
        "{:<19}  {:<40}  {:<17}  {:<16}  {:>8}  {:<8}  Uid",
        "Started", "Title", "Step", "Subscription", "Progress", "State"
    );
    print_separator(TABLE_WIDTH);

    for download in downloads {
        let row = download_row(download);
        println!(
            "{:<19}  {:<40}  {:<17}  {:<16}  {:>8}  {:<8}  {}",
            row.started,
            truncate_string(&row.title, 40),
            row.step,
            truncate_string(&row.subscription, 16),
            row.progress,
            row.state,
            download.uid
        );
    }

    print_separator(TABLE_WIDTH);
    println!("{}", status_hint(status));
}

fn status_hint(status: StatusFlags) -> String {
    match (status.running_exists, status.paused_exists) {
        (true, true) => "Some downloads are running and some are paused (pause-all / resume-all)",
        (true, false) => "Downloads are running (pause-all)",
        (false, true) => "Downloads are paused (resume-all)",
        (false, false) => "Nothing running or paused",
    }
    .to_string()
}
