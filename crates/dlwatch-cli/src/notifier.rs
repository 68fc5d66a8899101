//! Notification sink that writes to the terminal.

use dlwatch_core::{Notice, NoticeLevel, NotificationSinkPort};

/// Prints notices to stderr so they never mix with table output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl NotificationSinkPort for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(&notice));
    }
}

fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => notice.message.clone(),
        NoticeLevel::Error => format!("error: {}", notice.message),
    }
}
