//! Backend initialization: load settings, then fire readiness.

use std::time::Duration;

use tracing::{debug, warn};

use crate::ports::{
    ApiError, ApiResult, BackendSettings, BackendSettingsPort, ReadinessNotifier, SharedSettings,
};

/// Load backend settings, store them and mark the service initialized.
///
/// Retries up to `attempts` times, sleeping `retry_delay` between attempts.
/// Readiness only fires after settings were stored, so anything gated on the
/// signal sees the real feature flags.
pub async fn load_backend_settings(
    port: &dyn BackendSettingsPort,
    settings: &SharedSettings,
    notifier: &ReadinessNotifier,
    attempts: u32,
    retry_delay: Duration,
) -> ApiResult<BackendSettings> {
    let attempts = attempts.max(1);
    let mut last_error: Option<ApiError> = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::time::sleep(retry_delay).await;
        }

        match port.fetch_settings().await {
            Ok(loaded) => {
                debug!(
                    attempt,
                    downloads_manager_enabled = loaded.downloads_manager_enabled,
                    "Backend settings loaded"
                );
                settings.store(loaded);
                notifier.mark_initialized();
                return Ok(loaded);
            }
            Err(e) => {
                warn!(attempt, attempts, error = %e, "Failed to load backend settings");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ApiError::network("backend settings unavailable")))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::ports::{FeatureFlags, readiness_channel};

    struct FlakySettings {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl BackendSettingsPort for FlakySettings {
        async fn fetch_settings(&self) -> ApiResult<BackendSettings> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(ApiError::network("connection refused"))
            } else {
                Ok(BackendSettings {
                    downloads_manager_enabled: true,
                })
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_then_marks_ready() {
        let port = FlakySettings {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        let settings = SharedSettings::new();
        let (notifier, signal) = readiness_channel();

        let loaded = load_backend_settings(
            &port,
            &settings,
            &notifier,
            5,
            Duration::from_millis(250),
        )
        .await
        .unwrap();

        assert!(loaded.downloads_manager_enabled);
        assert!(settings.downloads_manager_enabled());
        assert!(signal.is_initialized());
        assert_eq!(port.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_without_marking_ready() {
        let port = FlakySettings {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let settings = SharedSettings::new();
        let (notifier, signal) = readiness_channel();

        let result =
            load_backend_settings(&port, &settings, &notifier, 2, Duration::from_millis(10)).await;

        assert!(matches!(result, Err(ApiError::Network { .. })));
        assert!(!signal.is_initialized());
        assert_eq!(port.calls.load(Ordering::SeqCst), 2);
    }
}
