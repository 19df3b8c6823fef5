//! Transport abstraction over the Congress.gov v3 API.
//!
//! The rest of the pipeline only sees `GET(path) -> (json, status)`. The
//! trait exists so tests can script responses without a network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Base URL for the Congress.gov v3 API.
pub const API_BASE_URL: &str = "https://api.congress.gov/v3/";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("congress-ingest/", env!("CARGO_PKG_VERSION"));

/// A GET-only view of the API: path relative to the base URL in, JSON body
/// and status code out. Non-success statuses are returned, not raised; only
/// transport-level failures (connect, timeout, malformed body) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<(Value, u16)>;

    /// Base URL that absolute links in responses resolve against.
    fn base_url(&self) -> &str {
        API_BASE_URL
    }
}

/// Reqwest-backed client for api.congress.gov.
///
/// NOTE: Do NOT derive `Debug` on this struct — `api_key` would be exposed.
pub struct CongressClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CongressClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::Config("API key is empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl Transport for CongressClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<(Value, u16)> {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));

        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[("format", "json")])
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(%url, status, "GET");

        // Error bodies are JSON too; surface them with the status so the
        // caller decides whether the status is fatal.
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::InvalidJson {
                endpoint: path.to_string(),
                message: e.to_string(),
            })?;

        Ok((body, status))
    }
}

/// Test utilities for the transport.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Scripted response for one expected GET.
    pub enum MockResponse {
        Json(Value, u16),
        Error(String),
    }

    /// Mock transport replaying pre-configured responses in order.
    ///
    /// Records every requested path so tests can assert on traversal order.
    pub struct MockTransport {
        responses: Mutex<Vec<MockResponse>>,
        requests: Mutex<Vec<String>>,
        base_url: String,
    }

    impl MockTransport {
        pub fn new(responses: Vec<MockResponse>) -> Self {
            let mut responses = responses;
            // Reverse so we can pop from the end
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
                base_url: API_BASE_URL.to_string(),
            }
        }

        /// Point the mock at a different base URL, as deployments behind a
        /// proxy or staging host do with the real client.
        pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
            self.base_url = base_url.into();
            self
        }

        pub fn with_pages(pages: Vec<Value>) -> Self {
            Self::new(
                pages
                    .into_iter()
                    .map(|body| MockResponse::Json(body, 200))
                    .collect(),
            )
        }

        /// Paths requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        fn base_url(&self) -> &str {
            &self.base_url
        }

        async fn get(&self, path: &str) -> Result<(Value, u16)> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(path.to_string());
            }
            let next = self
                .responses
                .lock()
                .map_err(|e| ClientError::Config(format!("mock lock poisoned: {e}")))?
                .pop();
            match next {
                Some(MockResponse::Json(body, status)) => Ok((body, status)),
                Some(MockResponse::Error(message)) => Err(ClientError::Config(message)),
                None => Err(ClientError::Config("mock transport exhausted".into())),
            }
        }
    }
}
