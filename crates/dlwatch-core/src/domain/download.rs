//! The download record reported by the backend.
//!
//! Pure data types with no I/O dependencies. The schema is open: fields the
//! backend sends that are not modelled here are kept in [`Download::extra`]
//! and survive reconciliation unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{self, is_truthy, truthy_number, truthy_text};

/// Backend-reported phase of a download's lifecycle.
///
/// Encoded on the wire as a small integer. Values outside the known range are
/// preserved as [`DownloadStep::Unknown`] so a newer backend does not make
/// whole snapshots undecodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum DownloadStep {
    /// The download record has been created.
    Creating,
    /// Metadata is being fetched for the URL.
    GettingInfo,
    /// File data is being transferred.
    Downloading,
    /// The download finished.
    Complete,
    /// A step this client does not know about.
    Unknown(u64),
}

impl DownloadStep {
    /// Human-readable label for display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Creating => "Creating download",
            Self::GettingInfo => "Getting info",
            Self::Downloading => "Downloading file",
            Self::Complete => "Complete",
            Self::Unknown(_) => "Unknown step",
        }
    }

    /// The first step is encoded as zero, which the backend treats as unset.
    const fn is_initial(self) -> bool {
        matches!(self, Self::Creating)
    }
}

impl From<u64> for DownloadStep {
    fn from(value: u64) -> Self {
        match value {
            0 => Self::Creating,
            1 => Self::GettingInfo,
            2 => Self::Downloading,
            3 => Self::Complete,
            other => Self::Unknown(other),
        }
    }
}

impl From<DownloadStep> for u64 {
    fn from(step: DownloadStep) -> Self {
        match step {
            DownloadStep::Creating => 0,
            DownloadStep::GettingInfo => 1,
            DownloadStep::Downloading => 2,
            DownloadStep::Complete => 3,
            DownloadStep::Unknown(other) => other,
        }
    }
}

impl fmt::Display for DownloadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The content a download produces: a single file or a playlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// File uid, for single-file downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Playlist id, for playlist downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Child file uids. Present only on playlists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uids: Option<Vec<String>>,
    /// Any other container fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Container {
    /// A container is a playlist when it carries a child-uid collection.
    pub const fn is_playlist(&self) -> bool {
        self.uids.is_some()
    }
}

/// What a player should open for a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTarget {
    /// Open a playlist by id.
    Playlist {
        /// Playlist id.
        playlist_id: String,
        /// File type of the playlist entries (`audio` / `video`).
        file_type: Option<String>,
    },
    /// Open a single file by uid.
    File {
        /// File uid.
        uid: String,
        /// File type (`audio` / `video`).
        file_type: Option<String>,
    },
}

/// A single in-progress or completed transfer as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Download {
    /// Stable identifier across polls. Primary key.
    pub uid: String,
    /// Start instant in milliseconds since the epoch. Used for ordering.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::number"
    )]
    pub timestamp_start: Option<f64>,
    /// Lifecycle phase. `None` reads as [`DownloadStep::Creating`].
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::step"
    )]
    pub step_index: Option<DownloadStep>,
    /// Progress in percent. `None` reads as zero.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::number"
    )]
    pub percent_complete: Option<f64>,
    /// Whether the download is paused.
    #[serde(
        default,
        skip_serializing_if = "lenient::is_false",
        deserialize_with = "lenient::flag"
    )]
    pub paused: bool,
    /// Whether the download has finished.
    #[serde(
        default,
        skip_serializing_if = "lenient::is_false",
        deserialize_with = "lenient::flag"
    )]
    pub finished: bool,
    /// Failure description. Presence means the download failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The content being downloaded. Non-object values read as absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::container"
    )]
    pub container: Option<Container>,
    /// Source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// File type (`audio` / `video`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Name of the subscription that queued the download, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_name: Option<String>,
    /// Every other field the backend sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Download {
    /// Create an empty record with only a uid.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            timestamp_start: None,
            step_index: None,
            percent_complete: None,
            paused: false,
            finished: false,
            error: None,
            container: None,
            url: None,
            title: None,
            file_type: None,
            sub_name: None,
            extra: Map::new(),
        }
    }

    /// Current lifecycle phase.
    pub fn step(&self) -> DownloadStep {
        self.step_index.unwrap_or(DownloadStep::Creating)
    }

    /// Progress in percent, zero when unreported.
    pub fn progress(&self) -> f64 {
        self.percent_complete.unwrap_or_default()
    }

    /// Whether the backend reported a failure.
    pub fn has_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Paused and not failed.
    pub fn is_paused_cleanly(&self) -> bool {
        self.paused && !self.has_error()
    }

    /// Neither paused nor finished.
    pub const fn is_running(&self) -> bool {
        !self.paused && !self.finished
    }

    /// Resolve what a player should open for this download.
    pub fn content_target(&self) -> Option<ContentTarget> {
        let container = self.container.as_ref()?;
        let file_type = self.file_type.clone();
        if container.is_playlist() {
            Some(ContentTarget::Playlist {
                playlist_id: container.id.clone()?,
                file_type,
            })
        } else {
            Some(ContentTarget::File {
                uid: container.uid.clone()?,
                file_type,
            })
        }
    }

    /// Copy of this record with falsy fields removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = Self::new(self.uid.clone());
        out.sync_from(self);
        out
    }

    /// Whether this record already mirrors `incoming` field for field.
    pub fn mirrors(&self, incoming: &Self) -> bool {
        self.uid == incoming.uid && *self == incoming.normalized()
    }

    /// Reconcile this record's fields against `incoming` in place.
    ///
    /// Every field takes the incoming value; fields that are absent or falsy
    /// on `incoming` end up removed here. Returns whether anything changed.
    pub(crate) fn sync_from(&mut self, incoming: &Self) -> bool {
        let mut changed = false;
        changed |= sync_field(&mut self.timestamp_start, truthy_number(incoming.timestamp_start));
        changed |= sync_field(
            &mut self.step_index,
            incoming.step_index.filter(|step| !step.is_initial()),
        );
        changed |= sync_field(
            &mut self.percent_complete,
            truthy_number(incoming.percent_complete),
        );
        changed |= sync_field(&mut self.paused, incoming.paused);
        changed |= sync_field(&mut self.finished, incoming.finished);
        changed |= sync_field(&mut self.error, truthy_text(incoming.error.as_ref()));
        changed |= sync_field(&mut self.container, incoming.container.clone());
        changed |= sync_field(&mut self.url, truthy_text(incoming.url.as_ref()));
        changed |= sync_field(&mut self.title, truthy_text(incoming.title.as_ref()));
        changed |= sync_field(&mut self.file_type, truthy_text(incoming.file_type.as_ref()));
        changed |= sync_field(&mut self.sub_name, truthy_text(incoming.sub_name.as_ref()));
        changed |= sync_extra(&mut self.extra, &incoming.extra);
        changed
    }
}

fn sync_field<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn sync_extra(current: &mut Map<String, Value>, incoming: &Map<String, Value>) -> bool {
    let before = current.len();
    current.retain(|key, _| incoming.get(key).is_some_and(is_truthy));
    let mut changed = current.len() != before;

    for (key, value) in incoming.iter().filter(|(_, value)| is_truthy(value)) {
        if current.get(key) != Some(value) {
            current.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}
