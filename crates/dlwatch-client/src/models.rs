//! Internal settings and wire types for the backend API.

use dlwatch_core::Download;
use dlwatch_core::domain::lenient::is_truthy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Resolved client settings.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub jwt: Option<String>,
}

#[cfg(test)]
impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(crate::config::DEFAULT_BASE_URL)
                .unwrap_or_else(|e| panic!("default base URL is invalid: {e}")),
            api_key: None,
            jwt: None,
        }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

/// Body of `POST /api/downloads`.
#[derive(Debug, Serialize)]
pub struct DownloadsRequest<'a> {
    pub uids: Option<&'a [String]>,
}

/// Body of every single-download command.
#[derive(Debug, Serialize)]
pub struct DownloadUidRequest<'a> {
    pub download_uid: &'a str,
}

/// Body of `POST /api/clearDownloads`.
#[derive(Debug, Serialize)]
pub struct ClearDownloadsRequest {
    pub clear_finished: bool,
    pub clear_paused: bool,
    pub clear_errors: bool,
}

// ============================================================================
// Responses
// ============================================================================

/// Response of `POST /api/downloads`.
#[derive(Debug, Deserialize)]
pub struct DownloadsResponse {
    #[serde(default)]
    pub downloads: Option<Vec<Download>>,
}

/// Response of `GET /api/config`, reduced to the part the client reads.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigResponse {
    #[serde(default)]
    config_file: Option<ConfigFile>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "YoutubeDLMaterial", default)]
    app: Option<AppSection>,
}

#[derive(Debug, Default, Deserialize)]
struct AppSection {
    #[serde(rename = "Extra", default)]
    extra: Option<ExtraSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtraSection {
    #[serde(default)]
    enable_downloads_manager: Option<Value>,
}

impl ConfigResponse {
    /// Whether the download manager is enabled. A missing flag means disabled.
    pub fn downloads_manager_enabled(&self) -> bool {
        self.config_file
            .as_ref()
            .and_then(|file| file.app.as_ref())
            .and_then(|app| app.extra.as_ref())
            .and_then(|extra| extra.enable_downloads_manager.as_ref())
            .is_some_and(is_truthy)
    }
}
