//! Backend settings and feature flags.
//!
//! The backend exposes its configuration; the only part the core cares
//! about is whether the download manager is enabled at all.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::ApiResult;

/// Feature flags that gate the download manager.
pub trait FeatureFlags: Send + Sync {
    /// Whether polling downloads is allowed.
    fn downloads_manager_enabled(&self) -> bool;
}

impl FeatureFlags for bool {
    fn downloads_manager_enabled(&self) -> bool {
        *self
    }
}

/// Settings the backend reports once it is initialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendSettings {
    /// Whether the backend's download manager is enabled.
    pub downloads_manager_enabled: bool,
}

impl FeatureFlags for BackendSettings {
    fn downloads_manager_enabled(&self) -> bool {
        self.downloads_manager_enabled
    }
}

/// Settings cell shared between the loader and the poller.
///
/// Starts with every feature disabled until settings are stored.
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<BackendSettings>,
}

impl SharedSettings {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store freshly loaded settings.
    pub fn store(&self, settings: BackendSettings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Current settings.
    pub fn current(&self) -> BackendSettings {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FeatureFlags for SharedSettings {
    fn downloads_manager_enabled(&self) -> bool {
        self.current().downloads_manager_enabled
    }
}

/// Port for loading backend settings.
#[async_trait]
pub trait BackendSettingsPort: Send + Sync {
    /// Fetch the backend's settings.
    async fn fetch_settings(&self) -> ApiResult<BackendSettings>;
}
