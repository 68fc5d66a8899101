//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use clap::Subcommand;

/// Available commands.
///
/// Commands that change remote state only send the request; the effect is
/// visible the next time the list is fetched.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the download list and redraw it whenever it changes
    Watch {
        /// Only track these download uids (repeatable)
        #[arg(long = "uid")]
        uids: Vec<String>,
        /// Delay between polls in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Apply responses in arrival order, even if a newer one was already shown
        #[arg(long)]
        keep_stale: bool,
    },

    /// Fetch the download list once and print it
    List {
        /// Only list these download uids (repeatable)
        #[arg(long = "uid")]
        uids: Vec<String>,
    },

    /// Pause a download
    Pause {
        /// Download uid
        uid: String,
    },

    /// Resume a paused download
    Resume {
        /// Download uid
        uid: String,
    },

    /// Restart a download
    Restart {
        /// Download uid
        uid: String,
    },

    /// Cancel a download
    Cancel {
        /// Download uid
        uid: String,
    },

    /// Remove a download from the list
    Clear {
        /// Download uid
        uid: String,
    },

    /// Pause every download
    PauseAll,

    /// Resume every download
    ResumeAll,

    /// Remove downloads in the selected categories
    ClearAll {
        /// Clear finished downloads
        #[arg(long)]
        finished: bool,
        /// Clear paused downloads
        #[arg(long)]
        paused: bool,
        /// Clear downloads that failed
        #[arg(long)]
        errors: bool,
    },

    /// Print the full error text of a failed download
    Error {
        /// Download uid
        uid: String,
    },
}
