//! Services that drive the ports: settings loading, polling and commands.

pub mod actions;
pub mod poller;
pub mod scope;
pub mod settings_loader;

pub use actions::{ActionError, ActionFailure, DownloadAction, DownloadActions};
pub use poller::{
    DEFAULT_POLL_INTERVAL, DownloadPoller, DownloadsView, PollHandle, PollerConfig, PollerState,
    StartOutcome,
};
pub use scope::DownloadScope;
pub use settings_loader::load_backend_settings;
