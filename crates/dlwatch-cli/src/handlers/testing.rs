//! In-memory backend for handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dlwatch_core::{
    ApiError, ApiResult, BackendSettings, BackendSettingsPort, ClearSelection, CommandAck,
    Download, DownloadCommandPort, DownloadFeedPort, NoopNotifier,
};
use serde_json::Value;

use crate::bootstrap::CliContext;

/// Serves a fixed download list and records the commands it receives.
pub struct FakeServer {
    pub downloads: Option<Vec<Download>>,
    pub manager_enabled: bool,
    pub reject_commands: bool,
    pub unreachable: bool,
    pub fetches: AtomicUsize,
    pub commands: Mutex<Vec<String>>,
}

impl FakeServer {
    pub fn with_downloads(value: Value) -> Self {
        Self {
            downloads: serde_json::from_value(value).unwrap(),
            manager_enabled: true,
            reject_commands: false,
            unreachable: false,
            fetches: AtomicUsize::new(0),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn into_context(self) -> (CliContext, Arc<Self>) {
        let server = Arc::new(self);
        let ctx = CliContext {
            feed: server.clone(),
            commands: server.clone(),
            settings: server.clone(),
            notifier: Arc::new(NoopNotifier),
        };
        (ctx, server)
    }

    fn record(&self, command: String) -> ApiResult<CommandAck> {
        if self.unreachable {
            return Err(ApiError::network("connection refused"));
        }
        self.commands.lock().unwrap().push(command);
        Ok(if self.reject_commands {
            CommandAck::rejected()
        } else {
            CommandAck::ok()
        })
    }
}

#[async_trait]
impl DownloadFeedPort for FakeServer {
    async fn fetch_downloads(&self, uids: Option<&[String]>) -> ApiResult<Option<Vec<Download>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ApiError::network("connection refused"));
        }
        Ok(self.downloads.as_ref().map(|downloads| {
            downloads
                .iter()
                .filter(|d| uids.is_none_or(|uids| uids.contains(&d.uid)))
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl BackendSettingsPort for FakeServer {
    async fn fetch_settings(&self) -> ApiResult<BackendSettings> {
        if self.unreachable {
            return Err(ApiError::network("connection refused"));
        }
        Ok(BackendSettings {
            downloads_manager_enabled: self.manager_enabled,
        })
    }
}

#[async_trait]
impl DownloadCommandPort for FakeServer {
    async fn pause(&self, uid: &str) -> ApiResult<CommandAck> {
        self.record(format!("pause {uid}"))
    }

    async fn pause_all(&self) -> ApiResult<CommandAck> {
        self.record("pause-all".to_string())
    }

    async fn resume(&self, uid: &str) -> ApiResult<CommandAck> {
        self.record(format!("resume {uid}"))
    }

    async fn resume_all(&self) -> ApiResult<CommandAck> {
        self.record("resume-all".to_string())
    }

    async fn restart(&self, uid: &str) -> ApiResult<CommandAck> {
        self.record(format!("restart {uid}"))
            .map(|ack| if ack.success { ack.with_new_download_uid(format!("{uid}-2")) } else { ack })
    }

    async fn cancel(&self, uid: &str) -> ApiResult<CommandAck> {
        self.record(format!("cancel {uid}"))
    }

    async fn clear_one(&self, uid: &str) -> ApiResult<CommandAck> {
        self.record(format!("clear {uid}"))
    }

    async fn clear_by_category(&self, selection: ClearSelection) -> ApiResult<CommandAck> {
        self.record(format!(
            "clear-all finished={} paused={} errors={}",
            selection.finished, selection.paused, selection.errored
        ))
    }
}
