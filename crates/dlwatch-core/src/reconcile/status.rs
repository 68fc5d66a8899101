//! Status flags derived from the canonical set.

use serde::Serialize;

use crate::domain::Download;

/// Flags that drive the pause-all / resume-all affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusFlags {
    /// Some download is paused and has not failed.
    pub paused_exists: bool,
    /// Some download is neither paused nor finished.
    pub running_exists: bool,
}

/// Scan downloads and derive [`StatusFlags`].
pub fn aggregate<'a>(downloads: impl IntoIterator<Item = &'a Download>) -> StatusFlags {
    downloads
        .into_iter()
        .fold(StatusFlags::default(), |flags, download| StatusFlags {
            paused_exists: flags.paused_exists || download.is_paused_cleanly(),
            running_exists: flags.running_exists || download.is_running(),
        })
}
