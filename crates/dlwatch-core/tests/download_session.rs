//! Integration tests for a full download session.
//!
//! An in-memory backend implements both the feed and the command port, so
//! commands issued through the dispatcher become visible through the poller
//! on the next cycle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dlwatch_core::{
    ApiResult, ClearSelection, CommandAck, Download, DownloadActions, DownloadCommandPort,
    DownloadFeedPort, DownloadPoller, DownloadScope, NoopNotifier, PollerConfig, StartOutcome,
    readiness_channel,
};
use serde_json::json;
use tokio_test::assert_ok;

#[derive(Default)]
struct InMemoryBackend {
    downloads: Mutex<Vec<Download>>,
}

impl InMemoryBackend {
    fn with(downloads: Vec<Download>) -> Self {
        Self {
            downloads: Mutex::new(downloads),
        }
    }

    fn update(&self, uid: &str, apply: impl FnOnce(&mut Download)) -> CommandAck {
        let mut downloads = self.downloads.lock().unwrap();
        match downloads.iter_mut().find(|d| d.uid == uid) {
            Some(download) => {
                apply(download);
                CommandAck::ok()
            }
            None => CommandAck::rejected(),
        }
    }
}

#[async_trait]
impl DownloadFeedPort for InMemoryBackend {
    async fn fetch_downloads(&self, uids: Option<&[String]>) -> ApiResult<Option<Vec<Download>>> {
        let downloads = self.downloads.lock().unwrap();
        Ok(Some(
            downloads
                .iter()
                .filter(|d| uids.is_none_or(|uids| uids.contains(&d.uid)))
                .cloned()
                .collect(),
        ))
    }
}

#[async_trait]
impl DownloadCommandPort for InMemoryBackend {
    async fn pause(&self, uid: &str) -> ApiResult<CommandAck> {
        Ok(self.update(uid, |d| d.paused = true))
    }

    async fn pause_all(&self) -> ApiResult<CommandAck> {
        for download in self.downloads.lock().unwrap().iter_mut() {
            download.paused = true;
        }
        Ok(CommandAck::ok())
    }

    async fn resume(&self, uid: &str) -> ApiResult<CommandAck> {
        Ok(self.update(uid, |d| d.paused = false))
    }

    async fn resume_all(&self) -> ApiResult<CommandAck> {
        for download in self.downloads.lock().unwrap().iter_mut() {
            download.paused = false;
        }
        Ok(CommandAck::ok())
    }

    async fn restart(&self, uid: &str) -> ApiResult<CommandAck> {
        let mut downloads = self.downloads.lock().unwrap();
        let Some(index) = downloads.iter().position(|d| d.uid == uid) else {
            return Ok(CommandAck::rejected());
        };
        let mut fresh = downloads.remove(index);
        fresh.uid = format!("{uid}-restarted");
        fresh.error = None;
        downloads.push(fresh.clone());
        Ok(CommandAck::ok().with_new_download_uid(fresh.uid))
    }

    async fn cancel(&self, uid: &str) -> ApiResult<CommandAck> {
        self.clear_one(uid).await
    }

    async fn clear_one(&self, uid: &str) -> ApiResult<CommandAck> {
        let mut downloads = self.downloads.lock().unwrap();
        let before = downloads.len();
        downloads.retain(|d| d.uid != uid);
        Ok(if downloads.len() < before {
            CommandAck::ok()
        } else {
            CommandAck::rejected()
        })
    }

    async fn clear_by_category(&self, selection: ClearSelection) -> ApiResult<CommandAck> {
        self.downloads.lock().unwrap().retain(|d| {
            !((selection.finished && d.finished)
                || (selection.paused && d.paused)
                || (selection.errored && d.has_error()))
        });
        Ok(CommandAck::ok())
    }
}

fn downloads(value: serde_json::Value) -> Vec<Download> {
    serde_json::from_value(value).unwrap()
}

fn start(backend: &Arc<InMemoryBackend>, scope: DownloadScope) -> (DownloadPoller, DownloadActions) {
    let feed: Arc<dyn DownloadFeedPort> = backend.clone();
    let commands: Arc<dyn DownloadCommandPort> = backend.clone();
    let poller = DownloadPoller::new(feed, scope.clone(), PollerConfig::new());
    let actions = DownloadActions::new(commands, Arc::new(NoopNotifier), scope);
    (poller, actions)
}

#[tokio::test(start_paused = true)]
async fn test_commands_show_up_on_next_poll() {
    let backend = Arc::new(InMemoryBackend::with(downloads(json!([
        {"uid": "a", "timestamp_start": 10, "step_index": 2, "percent_complete": 40},
        {"uid": "b", "timestamp_start": 20, "finished": true, "step_index": 3}
    ]))));
    let (poller, actions) = start(&backend, DownloadScope::all());

    let (notifier, signal) = readiness_channel();
    notifier.mark_initialized();
    let StartOutcome::Polling(handle) = poller.start_when_ready(signal, &true).await else {
        panic!("expected polling to start");
    };
    let mut views = handle.views();

    let view = views.wait_for(|v| v.retrieved).await.unwrap().clone();
    assert_eq!(view.downloads.len(), 2);
    assert_eq!(view.downloads[0].uid, "b");
    assert!(view.status.running_exists);
    assert!(!view.status.paused_exists);

    assert_ok!(actions.pause("a").await);
    // Nothing changes locally until the next poll.
    assert!(!handle.views().borrow().status.paused_exists);

    tokio::time::sleep(Duration::from_millis(1010)).await;
    let view = handle.views().borrow().clone();
    assert!(view.status.paused_exists);
    assert!(!view.status.running_exists);

    assert_ok!(actions.clear_by_category(ClearSelection::new(true, false, false)).await);
    tokio::time::sleep(Duration::from_millis(1010)).await;
    let remaining: Vec<_> = handle
        .views()
        .borrow()
        .downloads
        .iter()
        .map(|d| d.uid.clone())
        .collect();
    assert_eq!(remaining, vec!["a".to_string()]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_in_scoped_session_follows_new_download() {
    let backend = Arc::new(InMemoryBackend::with(downloads(json!([
        {"uid": "a", "timestamp_start": 10, "error": "HTTP 403"},
        {"uid": "other", "timestamp_start": 5}
    ]))));
    let scope = DownloadScope::subset(["a"]);
    let (poller, actions) = start(&backend, scope);
    let handle = poller.start();

    tokio::time::sleep(Duration::from_millis(10)).await;
    let view = handle.views().borrow().clone();
    assert_eq!(view.downloads.len(), 1);
    assert!(view.downloads[0].has_error());

    let new_uid = assert_ok!(actions.restart("a").await);
    assert_eq!(new_uid.as_deref(), Some("a-restarted"));

    tokio::time::sleep(Duration::from_millis(1000)).await;
    let view = handle.views().borrow().clone();
    let uids: Vec<_> = view.downloads.iter().map(|d| d.uid.as_str()).collect();
    assert_eq!(uids, vec!["a-restarted"]);
    assert!(!view.downloads[0].has_error());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_failed_command_leaves_backend_untouched() {
    let backend = Arc::new(InMemoryBackend::default());
    let (_, actions) = start(&backend, DownloadScope::all());

    let result = actions.cancel("missing").await;
    assert!(result.is_err());
    assert!(backend.downloads.lock().unwrap().is_empty());
}
