//! HTTP backend abstraction for the download API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with optional retry logic for transient errors.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::{ClientError, ClientResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that exchange JSON with the API.
///
/// This is an implementation detail - external code should use the core
/// port traits.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// `GET` a URL and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T>;

    /// `POST` a JSON body and deserialize the JSON response.
    async fn post_json<T: DeserializeOwned + Send>(&self, url: &Url, body: &Value)
    -> ClientResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// Retries server errors (5xx) and network errors with exponential backoff
/// when `max_retries` is non-zero.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: u64::try_from(config.retry_base_delay.as_millis())
                .unwrap_or(u64::MAX),
        })
    }

    /// Send a request with automatic retry for transient errors.
    async fn send_with_retry(
        &self,
        url: &Url,
        build: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> ClientResult<reqwest::Response> {
        let endpoint = url.path().to_string();
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms
                        .saturating_mul(2u64.saturating_pow(u32::from(attempt) - 1)),
                );
                warn!(%endpoint, attempt, delay_ms = delay.as_millis(), "Retrying backend request");
                tokio::time::sleep(delay).await;
            }

            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let error = ClientError::RequestFailed {
                        status: status.as_u16(),
                        endpoint: endpoint.clone(),
                    };

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(error);
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(error);
                }
                Err(e) => {
                    // Requests carry credentials in the query string
                    let error = ClientError::Network(e.without_url());
                    if attempt < self.max_retries {
                        last_error = Some(error);
                        continue;
                    }
                    return Err(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::InvalidResponse {
            message: "Unknown error during request".to_string(),
        }))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.without_url()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T> {
        debug!(endpoint = url.path(), "GET");
        let response = self
            .send_with_retry(url, || self.client.get(url.as_str()))
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &Value,
    ) -> ClientResult<T> {
        debug!(endpoint = url.path(), "POST");
        let response = self
            .send_with_retry(url, || self.client.post(url.as_str()).json(body))
            .await?;
        Self::decode(response).await
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub struct CannedResponse {
        pub status: u16,
        pub json: Value,
    }

    impl CannedResponse {
        /// A 200 response with a JSON body.
        pub const fn ok(json: Value) -> Self {
            Self { status: 200, json }
        }

        /// An error status with an empty body.
        pub const fn status(status: u16) -> Self {
            Self {
                status,
                json: Value::Null,
            }
        }
    }

    /// A request the fake backend received.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: Url,
        pub body: Option<Value>,
    }

    /// A fake HTTP backend that returns canned responses and records
    /// every request.
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        responses: Arc<Mutex<Vec<(String, CannedResponse)>>>,
        default_response: Option<CannedResponse>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer requests whose path ends with `endpoint`.
        pub fn with_response(self, endpoint: &str, response: CannedResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((format!("/api/{endpoint}"), response));
            self
        }

        /// Set a default response for URLs that don't match any endpoint.
        pub fn with_default(mut self, response: CannedResponse) -> Self {
            self.default_response = Some(response);
            self
        }

        /// Every request received so far.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn respond<T: DeserializeOwned>(
            &self,
            method: &'static str,
            url: &Url,
            body: Option<&Value>,
        ) -> ClientResult<T> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method,
                url: url.clone(),
                body: body.cloned(),
            });

            let response = {
                let responses = self.responses.lock().unwrap();
                responses
                    .iter()
                    .find(|(path, _)| url.path().ends_with(path.as_str()))
                    .map(|(_, response)| response.clone())
            }
            .or_else(|| self.default_response.clone())
            .unwrap_or_else(|| CannedResponse::status(404));

            if !(200..300).contains(&response.status) {
                return Err(ClientError::RequestFailed {
                    status: response.status,
                    endpoint: url.path().to_string(),
                });
            }
            serde_json::from_value(response.json).map_err(Into::into)
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T> {
            self.respond("GET", url, None)
        }

        async fn post_json<T: DeserializeOwned + Send>(
            &self,
            url: &Url,
            body: &Value,
        ) -> ClientResult<T> {
            self.respond("POST", url, Some(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_backend_creation() {
        let config = ApiClientConfig::default();
        let backend = ReqwestBackend::new(&config).unwrap();
        assert_eq!(backend.max_retries, 0);
        assert_eq!(backend.retry_base_delay_ms, 500);
    }

    #[test]
    fn test_reqwest_backend_with_retries() {
        let config = ApiClientConfig::new()
            .with_max_retries(3)
            .with_retry_delay(Duration::from_millis(50));
        let backend = ReqwestBackend::new(&config).unwrap();
        assert_eq!(backend.max_retries, 3);
        assert_eq!(backend.retry_base_delay_ms, 50);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is not expected to be listening
        let config = ApiClientConfig::new().with_timeout(Duration::from_secs(2));
        let backend = ReqwestBackend::new(&config).unwrap();
        let url = Url::parse("http://127.0.0.1:9/api/downloads").unwrap();

        let result: ClientResult<Value> = backend.get_json(&url).await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }

    mod fake_backend_tests {
        use super::super::testing::*;
        use super::*;
        use serde_json::json;

        #[tokio::test]
        async fn test_fake_backend_returns_canned_response() {
            let backend = FakeBackend::new()
                .with_response("downloads", CannedResponse::ok(json!({"downloads": []})));

            let url = Url::parse("http://localhost/api/downloads").unwrap();
            let result: Value = backend.post_json(&url, &json!({"uids": null})).await.unwrap();

            assert_eq!(result, json!({"downloads": []}));
            let requests = backend.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].method, "POST");
            assert_eq!(requests[0].body, Some(json!({"uids": null})));
        }

        #[tokio::test]
        async fn test_fake_backend_returns_404_for_unknown_url() {
            let backend = FakeBackend::new();
            let url = Url::parse("http://localhost/api/unknown").unwrap();

            let result: ClientResult<Value> = backend.get_json(&url).await;
            assert!(matches!(
                result,
                Err(ClientError::RequestFailed { status: 404, .. })
            ));
        }

        #[tokio::test]
        async fn test_fake_backend_default_response() {
            let backend = FakeBackend::new().with_default(CannedResponse::ok(json!({"success": true})));

            let url = Url::parse("http://localhost/api/anything").unwrap();
            let result: Value = backend.get_json(&url).await.unwrap();

            assert_eq!(result["success"], true);
        }
    }
}
