//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. The HTTP client is created here and handed to the
//! handlers through the core port traits.

use std::sync::Arc;
use std::time::Duration;

use dlwatch_client::{ApiClientConfig, DefaultApiClient};
use dlwatch_core::{
    BackendSettingsPort, DownloadActions, DownloadCommandPort, DownloadFeedPort, DownloadScope,
    NotificationSinkPort,
};
use tracing::debug;

use crate::error::CliError;
use crate::notifier::TerminalNotifier;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Server root URL.
    pub server: String,
    /// Optional API key.
    pub api_key: Option<String>,
    /// Optional session token.
    pub jwt: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CliConfig {
    /// Take connection settings from the parsed command line.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            server: cli.server.clone(),
            api_key: cli.api_key.clone().filter(|k| !k.is_empty()),
            jwt: cli.jwt.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(cli.timeout_secs.max(1)),
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// Read side of the backend.
    pub feed: Arc<dyn DownloadFeedPort>,
    /// Write side of the backend.
    pub commands: Arc<dyn DownloadCommandPort>,
    /// Backend configuration.
    pub settings: Arc<dyn BackendSettingsPort>,
    /// Where user-facing notices go.
    pub notifier: Arc<dyn NotificationSinkPort>,
}

impl CliContext {
    /// A dispatcher for download commands, tracking `scope`.
    pub fn actions(&self, scope: DownloadScope) -> DownloadActions {
        DownloadActions::new(
            Arc::clone(&self.commands),
            Arc::clone(&self.notifier),
            scope,
        )
    }
}

/// Bootstrap the CLI application.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let client_config = ApiClientConfig::new()
        .with_base_url(config.server.as_str())
        .with_optional_api_key(config.api_key.clone())
        .with_optional_jwt(config.jwt.clone())
        .with_timeout(config.timeout);
    let client = Arc::new(DefaultApiClient::new(&client_config)?);
    debug!(server = %config.server, "Backend client ready");

    Ok(CliContext {
        feed: client.clone(),
        commands: client.clone(),
        settings: client,
        notifier: Arc::new(TerminalNotifier),
    })
}
