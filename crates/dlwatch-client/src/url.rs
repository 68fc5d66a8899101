//! URL construction helpers for the backend API.

use crate::error::ClientResult;
use crate::models::ApiSettings;
use url::Url;

/// Endpoint that lists downloads.
pub const DOWNLOADS: &str = "downloads";
/// Endpoint that returns the backend configuration.
pub const CONFIG: &str = "config";
/// Pause one download.
pub const PAUSE: &str = "pauseDownload";
/// Pause every download.
pub const PAUSE_ALL: &str = "pauseAllDownloads";
/// Resume one download.
pub const RESUME: &str = "resumeDownload";
/// Resume every download.
pub const RESUME_ALL: &str = "resumeAllDownloads";
/// Restart one download.
pub const RESTART: &str = "restartDownload";
/// Cancel one download.
pub const CANCEL: &str = "cancelDownload";
/// Clear one download.
pub const CLEAR: &str = "clearDownload";
/// Clear downloads by category.
pub const CLEAR_BY_CATEGORY: &str = "clearDownloads";

/// Build `<base>/api/<endpoint>` with credentials as query parameters.
pub fn build_api_url(settings: &ApiSettings, endpoint: &str) -> ClientResult<Url> {
    let base_path = settings.base_url.path().trim_end_matches('/');
    let mut url = settings
        .base_url
        .join(&format!("{base_path}/api/{endpoint}"))?;

    if settings.api_key.is_some() || settings.jwt.is_some() {
        let mut query = url.query_pairs_mut();
        if let Some(ref key) = settings.api_key {
            query.append_pair("apiKey", key);
        }
        if let Some(ref jwt) = settings.jwt {
            query.append_pair("jwt", jwt);
        }
    }

    Ok(url)
}
