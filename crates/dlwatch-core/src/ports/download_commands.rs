//! Download command port definition.
//!
//! The write side of the backend: fire-and-forget commands that mutate remote
//! download state. Their effects are only observed through the next poll.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiResult;

/// Acknowledgement returned by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    /// Whether the backend accepted the command.
    #[serde(default)]
    pub success: bool,
    /// Uid of the download created by a restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_download_uid: Option<String>,
    /// Optional failure detail from the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandAck {
    /// A successful acknowledgement.
    pub const fn ok() -> Self {
        Self {
            success: true,
            new_download_uid: None,
            error: None,
        }
    }

    /// A rejected acknowledgement.
    pub const fn rejected() -> Self {
        Self {
            success: false,
            new_download_uid: None,
            error: None,
        }
    }

    /// Attach the uid of a newly created download.
    #[must_use]
    pub fn with_new_download_uid(mut self, uid: impl Into<String>) -> Self {
        self.new_download_uid = Some(uid.into());
        self
    }
}

/// Categories of downloads to clear in bulk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearSelection {
    /// Clear finished downloads.
    pub finished: bool,
    /// Clear paused downloads.
    pub paused: bool,
    /// Clear downloads that failed.
    pub errored: bool,
}

impl ClearSelection {
    /// Build a selection from the three category toggles.
    pub const fn new(finished: bool, paused: bool, errored: bool) -> Self {
        Self {
            finished,
            paused,
            errored,
        }
    }

    /// True when no category is selected.
    pub const fn is_empty(&self) -> bool {
        !self.finished && !self.paused && !self.errored
    }
}

/// Port for mutating remote download state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DownloadCommandPort: Send + Sync {
    /// Pause one download.
    async fn pause(&self, uid: &str) -> ApiResult<CommandAck>;

    /// Pause every download.
    async fn pause_all(&self) -> ApiResult<CommandAck>;

    /// Resume one download.
    async fn resume(&self, uid: &str) -> ApiResult<CommandAck>;

    /// Resume every download.
    async fn resume_all(&self) -> ApiResult<CommandAck>;

    /// Restart one download. The backend may answer with a new uid.
    async fn restart(&self, uid: &str) -> ApiResult<CommandAck>;

    /// Cancel one download.
    async fn cancel(&self, uid: &str) -> ApiResult<CommandAck>;

    /// Remove one download from the backend's list.
    async fn clear_one(&self, uid: &str) -> ApiResult<CommandAck>;

    /// Remove every download in the selected categories.
    async fn clear_by_category(&self, selection: ClearSelection) -> ApiResult<CommandAck>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_decodes_restart_response() {
        let ack: CommandAck =
            serde_json::from_value(json!({"success": true, "new_download_uid": "n1"})).unwrap();
        assert_eq!(ack, CommandAck::ok().with_new_download_uid("n1"));
    }

    #[test]
    fn test_ack_missing_success_is_rejection() {
        let ack: CommandAck = serde_json::from_value(json!({})).unwrap();
        assert!(!ack.success);
    }

    #[test]
    fn test_clear_selection_empty() {
        assert!(ClearSelection::default().is_empty());
        assert!(!ClearSelection::new(false, true, false).is_empty());
    }
}
