//! Handlers for commands that change remote download state.
//!
//! Failures are reported by the dispatcher's notifier; the returned error
//! only decides the exit code.

use anyhow::Result;
use dlwatch_core::{ClearSelection, DownloadActions, DownloadScope};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// A command from the command line, resolved to its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadCommand {
    Pause(String),
    Resume(String),
    Restart(String),
    Cancel(String),
    Clear(String),
    PauseAll,
    ResumeAll,
    ClearAll(ClearSelection),
}

/// Run one command and return the confirmation to print, if any.
pub async fn run(
    actions: &DownloadActions,
    command: DownloadCommand,
) -> Result<Option<String>, CliError> {
    let message = match command {
        DownloadCommand::Pause(uid) => {
            actions.pause(&uid).await?;
            format!("Pause requested for {uid}")
        }
        DownloadCommand::Resume(uid) => {
            actions.resume(&uid).await?;
            format!("Resume requested for {uid}")
        }
        DownloadCommand::Restart(uid) => match actions.restart(&uid).await? {
            Some(new_uid) => format!("Restarted {uid} as {new_uid}"),
            None => format!("Restart requested for {uid}"),
        },
        DownloadCommand::Cancel(uid) => {
            actions.cancel(&uid).await?;
            format!("Cancel requested for {uid}")
        }
        DownloadCommand::Clear(uid) => {
            actions.clear(&uid).await?;
            format!("Cleared {uid}")
        }
        DownloadCommand::PauseAll => {
            actions.pause_all().await?;
            "Pause requested for all downloads".to_string()
        }
        DownloadCommand::ResumeAll => {
            actions.resume_all().await?;
            "Resume requested for all downloads".to_string()
        }
        DownloadCommand::ClearAll(selection) if selection.is_empty() => {
            "Nothing selected; pass --finished, --paused and/or --errors".to_string()
        }
        DownloadCommand::ClearAll(selection) => {
            // The dispatcher confirms through the notifier
            actions.clear_by_category(selection).await?;
            return Ok(None);
        }
    };

    Ok(Some(message))
}

/// Execute a download command.
pub async fn execute(ctx: &CliContext, command: DownloadCommand) -> Result<()> {
    let actions = ctx.actions(DownloadScope::all());
    if let Some(message) = run(&actions, command).await? {
        println!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::FakeServer;
    use serde_json::json;

    #[tokio::test]
    async fn test_single_download_commands() {
        let (ctx, server) = FakeServer::with_downloads(json!([])).into_context();
        let actions = ctx.actions(DownloadScope::all());

        for command in [
            DownloadCommand::Pause("a".to_string()),
            DownloadCommand::Resume("a".to_string()),
            DownloadCommand::Cancel("a".to_string()),
            DownloadCommand::Clear("a".to_string()),
        ] {
            let message = tokio_test::assert_ok!(run(&actions, command).await);
            assert!(message.is_some());
        }

        assert_eq!(
            server.commands(),
            vec!["pause a", "resume a", "cancel a", "clear a"]
        );
    }

    #[tokio::test]
    async fn test_restart_reports_new_uid() {
        let (ctx, _) = FakeServer::with_downloads(json!([])).into_context();
        let actions = ctx.actions(DownloadScope::all());

        let message =
            tokio_test::assert_ok!(run(&actions, DownloadCommand::Restart("a".to_string())).await);
        assert_eq!(message.as_deref(), Some("Restarted a as a-2"));
    }

    #[tokio::test]
    async fn test_empty_clear_all_skips_server() {
        let (ctx, server) = FakeServer::with_downloads(json!([])).into_context();
        let actions = ctx.actions(DownloadScope::all());

        let message = run(&actions, DownloadCommand::ClearAll(ClearSelection::default()))
            .await
            .unwrap();
        assert!(message.is_some());
        assert!(server.commands().is_empty());

        let message = run(
            &actions,
            DownloadCommand::ClearAll(ClearSelection::new(false, true, false)),
        )
        .await
        .unwrap();
        assert!(message.is_none());
        assert_eq!(
            server.commands(),
            vec!["clear-all finished=false paused=true errors=false"]
        );
    }

    #[tokio::test]
    async fn test_rejected_command_is_general_error() {
        let mut server = FakeServer::with_downloads(json!([]));
        server.reject_commands = true;
        let (ctx, _) = server.into_context();
        let actions = ctx.actions(DownloadScope::all());

        let err = run(&actions, DownloadCommand::PauseAll).await.unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
