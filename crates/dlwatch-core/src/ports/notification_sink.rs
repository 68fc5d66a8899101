//! Notification sink port definition.
//!
//! A fire-and-forget channel for short user-facing messages. Used for
//! command failures and confirmations, never for fetch failures.

use std::fmt;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// A command failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Port for delivering notices to the user.
///
/// Implementations must not block.
pub trait NotificationSinkPort: Send + Sync {
    /// Deliver a notice.
    fn notify(&self, notice: Notice);
}

/// A sink that discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NotificationSinkPort for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}
