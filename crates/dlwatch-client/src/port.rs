//! Port trait implementations for `ApiClient`.
//!
//! This module implements the core-owned ports for `ApiClient`, converting
//! internal client errors into [`ApiError`] at the boundary.

use async_trait::async_trait;
use dlwatch_core::{
    ApiError, ApiResult, BackendSettings, BackendSettingsPort, ClearSelection, CommandAck,
    Download, DownloadCommandPort, DownloadFeedPort,
};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::http::HttpBackend;
use crate::url::{CANCEL, CLEAR, PAUSE, PAUSE_ALL, RESTART, RESUME, RESUME_ALL};

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ClientError` to core `ApiError`.
fn map_error(err: ClientError) -> ApiError {
    match err {
        ClientError::RequestFailed { status, endpoint } => ApiError::Status { status, endpoint },
        ClientError::InvalidResponse { message } => ApiError::InvalidResponse { message },
        ClientError::Network(e) if e.is_decode() => ApiError::InvalidResponse {
            message: e.to_string(),
        },
        ClientError::Network(e) => ApiError::Network {
            message: e.to_string(),
        },
        ClientError::InvalidUrl(e) => ApiError::Configuration {
            message: e.to_string(),
        },
        ClientError::JsonParse(e) => ApiError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> DownloadFeedPort for ApiClient<B> {
    async fn fetch_downloads(&self, uids: Option<&[String]>) -> ApiResult<Option<Vec<Download>>> {
        self.downloads(uids).await.map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend> DownloadCommandPort for ApiClient<B> {
    async fn pause(&self, uid: &str) -> ApiResult<CommandAck> {
        self.download_command(PAUSE, uid)
            .await
            .map_err(map_error)
    }

    async fn pause_all(&self) -> ApiResult<CommandAck> {
        self.bulk_command(PAUSE_ALL).await.map_err(map_error)
    }

    async fn resume(&self, uid: &str) -> ApiResult<CommandAck> {
        self.download_command(RESUME, uid)
            .await
            .map_err(map_error)
    }

    async fn resume_all(&self) -> ApiResult<CommandAck> {
        self.bulk_command(RESUME_ALL).await.map_err(map_error)
    }

    async fn restart(&self, uid: &str) -> ApiResult<CommandAck> {
        self.download_command(RESTART, uid)
            .await
            .map_err(map_error)
    }

    async fn cancel(&self, uid: &str) -> ApiResult<CommandAck> {
        self.download_command(CANCEL, uid)
            .await
            .map_err(map_error)
    }

    async fn clear_one(&self, uid: &str) -> ApiResult<CommandAck> {
        self.download_command(CLEAR, uid)
            .await
            .map_err(map_error)
    }

    async fn clear_by_category(&self, selection: ClearSelection) -> ApiResult<CommandAck> {
        self.clear_downloads(selection).await.map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend> BackendSettingsPort for ApiClient<B> {
    async fn fetch_settings(&self) -> ApiResult<BackendSettings> {
        self.settings().await.map_err(map_error)
    }
}
