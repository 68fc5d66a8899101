//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use dlwatch_client::DEFAULT_BASE_URL;

use crate::commands::Commands;

/// Command-line interface for watching and controlling backend downloads.
///
/// Connection options are global and can also be set through the
/// environment (or a `.env` file).
#[derive(Parser)]
#[command(name = "dlwatch")]
#[command(about = "Watch and control downloads on a media server")]
#[command(version)]
pub struct Cli {
    /// Server root URL
    #[arg(long, global = true, env = "DLWATCH_SERVER", default_value = DEFAULT_BASE_URL)]
    pub server: String,

    /// API key, sent as the `apiKey` query parameter
    #[arg(long, global = true, env = "DLWATCH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Session token, sent as the `jwt` query parameter
    #[arg(long, global = true, env = "DLWATCH_JWT", hide_env_values = true)]
    pub jwt: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "dlwatch",
            "--verbose",
            "--server",
            "http://media-box:8998",
            "--timeout-secs",
            "3",
            "list",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.server, "http://media-box:8998");
        assert_eq!(cli.timeout_secs, 3);
        assert!(matches!(cli.command, Some(Commands::List { .. })));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["dlwatch", "pause", "abc", "--api-key", "k"]);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(matches!(cli.command, Some(Commands::Pause { ref uid }) if uid == "abc"));
    }
}
