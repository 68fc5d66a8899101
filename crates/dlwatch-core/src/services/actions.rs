//! Action dispatcher: mutating commands against remote downloads.
//!
//! Commands never touch the canonical set. Their effects show up on the next
//! poll. Failures are reported to the notification sink and returned to the
//! caller as [`ActionError`].

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::ports::{
    ApiError, ApiResult, ClearSelection, CommandAck, DownloadCommandPort, Notice,
    NotificationSinkPort,
};

use super::scope::DownloadScope;

/// A command the dispatcher can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadAction {
    Pause,
    PauseAll,
    Resume,
    ResumeAll,
    Restart,
    Cancel,
    Clear,
    ClearByCategory,
}

impl DownloadAction {
    /// The notice shown to the user when this action fails.
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Pause => "Failed to pause download! See server logs for more info.",
            Self::PauseAll => "Failed to pause all downloads! See server logs for more info.",
            Self::Resume => "Failed to resume download! See server logs for more info.",
            Self::ResumeAll => "Failed to resume all downloads! See server logs for more info.",
            Self::Restart => "Failed to restart download! See server logs for more info.",
            Self::Cancel => "Failed to cancel download! See server logs for more info.",
            Self::Clear => "Failed to clear download! See server logs for more info.",
            Self::ClearByCategory => "Failed to clear finished downloads!",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::PauseAll => "pause all",
            Self::Resume => "resume",
            Self::ResumeAll => "resume all",
            Self::Restart => "restart",
            Self::Cancel => "cancel",
            Self::Clear => "clear",
            Self::ClearByCategory => "clear by category",
        }
    }
}

impl fmt::Display for DownloadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an action failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionFailure {
    /// The backend answered `success: false`.
    #[error("rejected by backend{}", detail(.message.as_deref()))]
    Rejected {
        /// Detail the backend attached, if any.
        message: Option<String>,
    },

    /// The command never got a usable answer.
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn detail(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// A failed action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{action} failed: {cause}")]
pub struct ActionError {
    /// The action that failed.
    pub action: DownloadAction,
    /// What went wrong.
    #[source]
    pub cause: ActionFailure,
}

/// Issues download commands and reports failures.
#[derive(Clone)]
pub struct DownloadActions {
    commands: Arc<dyn DownloadCommandPort>,
    notifier: Arc<dyn NotificationSinkPort>,
    scope: DownloadScope,
}

impl DownloadActions {
    /// Create a dispatcher.
    ///
    /// `scope` should be the same scope the poller reads, so restarted
    /// downloads are picked up.
    pub fn new(
        commands: Arc<dyn DownloadCommandPort>,
        notifier: Arc<dyn NotificationSinkPort>,
        scope: DownloadScope,
    ) -> Self {
        Self {
            commands,
            notifier,
            scope,
        }
    }

    /// Pause one download.
    pub async fn pause(&self, uid: &str) -> Result<(), ActionError> {
        self.dispatch(DownloadAction::Pause, Some(uid), self.commands.pause(uid))
            .await
            .map(drop)
    }

    /// Pause every download.
    pub async fn pause_all(&self) -> Result<(), ActionError> {
        self.dispatch(DownloadAction::PauseAll, None, self.commands.pause_all())
            .await
            .map(drop)
    }

    /// Resume one paused download.
    pub async fn resume(&self, uid: &str) -> Result<(), ActionError> {
        self.dispatch(DownloadAction::Resume, Some(uid), self.commands.resume(uid))
            .await
            .map(drop)
    }

    /// Resume every paused download.
    pub async fn resume_all(&self) -> Result<(), ActionError> {
        self.dispatch(DownloadAction::ResumeAll, None, self.commands.resume_all())
            .await
            .map(drop)
    }

    /// Restart a download.
    ///
    /// When the session tracks a subset of uids and the backend created a
    /// new download, its uid joins the subset. Returns the new uid, if any.
    pub async fn restart(&self, uid: &str) -> Result<Option<String>, ActionError> {
        let ack = self
            .dispatch(DownloadAction::Restart, Some(uid), self.commands.restart(uid))
            .await?;

        let new_uid = ack.new_download_uid.filter(|new_uid| !new_uid.is_empty());
        if let Some(new_uid) = &new_uid {
            if self.scope.track(new_uid.as_str()) {
                debug!(uid, new_uid = %new_uid, "Tracking restarted download");
            }
        }
        Ok(new_uid)
    }

    /// Cancel one download.
    pub async fn cancel(&self, uid: &str) -> Result<(), ActionError> {
        self.dispatch(DownloadAction::Cancel, Some(uid), self.commands.cancel(uid))
            .await
            .map(drop)
    }

    /// Remove one download from the backend's list.
    pub async fn clear(&self, uid: &str) -> Result<(), ActionError> {
        self.dispatch(DownloadAction::Clear, Some(uid), self.commands.clear_one(uid))
            .await
            .map(drop)
    }

    /// Remove every download in the selected categories.
    ///
    /// An empty selection succeeds without contacting the backend.
    pub async fn clear_by_category(&self, selection: ClearSelection) -> Result<(), ActionError> {
        if selection.is_empty() {
            debug!("Empty clear selection; nothing to do");
            return Ok(());
        }

        self.dispatch(
            DownloadAction::ClearByCategory,
            None,
            self.commands.clear_by_category(selection),
        )
        .await?;
        self.notifier.notify(Notice::info("Cleared downloads!"));
        Ok(())
    }

    async fn dispatch(
        &self,
        action: DownloadAction,
        uid: Option<&str>,
        command: impl Future<Output = ApiResult<CommandAck>> + Send,
    ) -> Result<CommandAck, ActionError> {
        debug!(%action, uid, "Dispatching download command");

        let cause = match command.await {
            Ok(ack) if ack.success => {
                debug!(%action, uid, "Download command accepted");
                return Ok(ack);
            }
            Ok(ack) => ActionFailure::Rejected { message: ack.error },
            Err(e) => ActionFailure::Api(e),
        };

        warn!(%action, uid, error = %cause, "Download command failed");
        self.notifier.notify(Notice::error(action.failure_message()));
        Err(ActionError { action, cause })
    }
}
