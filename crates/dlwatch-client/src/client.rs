//! Backend client: one method per REST call.

use dlwatch_core::{ApiError, ApiResult, BackendSettings, ClearSelection, CommandAck, Download};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::ClientResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{
    ApiSettings, ClearDownloadsRequest, ConfigResponse, DownloadUidRequest, DownloadsRequest,
    DownloadsResponse,
};
use crate::url::{CLEAR_BY_CATEGORY, CONFIG, DOWNLOADS, build_api_url};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default backend client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the download backend's REST API.
///
/// Generic over an HTTP backend so tests can inject a fake. Use
/// [`DefaultApiClient`] in production code.
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) settings: ApiSettings,
}

impl DefaultApiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`ApiError::Configuration`] if the base URL does not parse
    /// or the HTTP client cannot be built.
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::Configuration {
            message: format!("invalid server URL '{}': {e}", config.base_url),
        })?;
        let backend = ReqwestBackend::new(config).map_err(|e| ApiError::Configuration {
            message: e.to_string(),
        })?;

        Ok(Self {
            backend,
            settings: ApiSettings {
                base_url,
                api_key: config.api_key.clone(),
                jwt: config.jwt.clone(),
            },
        })
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(settings: ApiSettings, backend: B) -> Self {
        Self { backend, settings }
    }

    /// Server root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    async fn post<T, R>(&self, endpoint: &str, body: &R) -> ClientResult<T>
    where
        T: DeserializeOwned + Send,
        R: Serialize + Sync,
    {
        let url = build_api_url(&self.settings, endpoint)?;
        let body = serde_json::to_value(body)?;
        self.backend.post_json(&url, &body).await
    }

    pub(crate) async fn downloads(
        &self,
        uids: Option<&[String]>,
    ) -> ClientResult<Option<Vec<Download>>> {
        let response: Option<DownloadsResponse> =
            self.post(DOWNLOADS, &DownloadsRequest { uids }).await?;
        let downloads = response.and_then(|r| r.downloads);
        debug!(
            count = downloads.as_ref().map(Vec::len),
            scoped = uids.is_some(),
            "Fetched downloads"
        );
        Ok(downloads)
    }

    /// Issue a command that targets one download.
    pub(crate) async fn download_command(
        &self,
        endpoint: &str,
        uid: &str,
    ) -> ClientResult<CommandAck> {
        let ack: Option<CommandAck> = self
            .post(endpoint, &DownloadUidRequest { download_uid: uid })
            .await?;
        Ok(ack.unwrap_or_default())
    }

    /// Issue a command with an empty body.
    pub(crate) async fn bulk_command(&self, endpoint: &str) -> ClientResult<CommandAck> {
        let ack: Option<CommandAck> = self.post(endpoint, &serde_json::json!({})).await?;
        Ok(ack.unwrap_or_default())
    }

    pub(crate) async fn clear_downloads(&self, selection: ClearSelection) -> ClientResult<CommandAck> {
        let body = ClearDownloadsRequest {
            clear_finished: selection.finished,
            clear_paused: selection.paused,
            clear_errors: selection.errored,
        };
        let ack: Option<CommandAck> = self.post(CLEAR_BY_CATEGORY, &body).await?;
        Ok(ack.unwrap_or_default())
    }

    pub(crate) async fn settings(&self) -> ClientResult<BackendSettings> {
        let url = build_api_url(&self.settings, CONFIG)?;
        let config: Option<ConfigResponse> = self.backend.get_json(&url).await?;
        Ok(BackendSettings {
            downloads_manager_enabled: config
                .as_ref()
                .is_some_and(ConfigResponse::downloads_manager_enabled),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    pub fn fake_client(backend: FakeBackend) -> ApiClient<FakeBackend> {
        ApiClient::with_backend(ApiSettings::default(), backend)
    }

    #[test]
    fn test_default_client_creation() {
        let client = DefaultApiClient::new(&ApiClientConfig::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:17442/");
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        let config = ApiClientConfig::new().with_base_url("not a url");
        let result = DefaultApiClient::new(&config);
        assert!(matches!(result, Err(ApiError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_null_body_means_no_downloads() {
        let backend = FakeBackend::new().with_response(DOWNLOADS, CannedResponse::ok(json!(null)));
        let client = fake_client(backend);

        assert_eq!(client.downloads(None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_command_body_is_rejection() {
        let backend = FakeBackend::new().with_default(CannedResponse::ok(json!(null)));
        let client = fake_client(backend);

        let ack = client.bulk_command(crate::url::PAUSE_ALL).await.unwrap();
        assert!(!ack.success);
    }
}
