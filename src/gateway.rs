//! Fetch gateway — best-effort JSON GETs that degrade to a fallback.
//!
//! DESIGN
//! ======
//! Every upstream call funnels through `Gateway`. A transport failure, a
//! non-success status, and a body that does not match the requested schema
//! all collapse into the caller's fallback after a single warning, so
//! consumers only ever see "data" or "no data". The transport sits behind
//! the `JsonSource` trait so tests can swap in canned responses.
//!
//! ERROR HANDLING
//! ==============
//! There is no retry here. The polling scheduler asks again on its next
//! tick, which is the only recovery the dashboard needs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::HttpTimeouts;
use crate::rate_limit::PacedLimiter;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while fetching upstream JSON. Never escapes [`Gateway`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status.
    #[error("non-success status {status}")]
    Status { status: u16 },

    /// The body was not JSON, or did not match the expected schema.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// JSON SOURCE TRAIT
// =============================================================================

/// Transport seam: GET a URL and return its JSON body. Enables mocking in tests.
#[async_trait::async_trait]
pub trait JsonSource: Send + Sync {
    /// Fetch and parse `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for transport failures, non-success statuses
    /// and bodies that are not JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// `reqwest`-backed [`JsonSource`].
pub struct HttpSource {
    http: reqwest::Client,
}

impl HttpSource {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .user_agent(concat!("undercut/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl JsonSource for HttpSource {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Shared entry point for every upstream request.
pub struct Gateway {
    source: Arc<dyn JsonSource>,
    limiter: Option<PacedLimiter>,
    failures: AtomicU64,
}

impl Gateway {
    #[must_use]
    pub fn new(source: Arc<dyn JsonSource>, limiter: Option<PacedLimiter>) -> Self {
        Self { source, limiter, failures: AtomicU64::new(0) }
    }

    /// Number of requests that degraded to their fallback so far.
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// GET `url` and decode it as `T`, or return `fallback` on any failure.
    pub async fn fetch_or<T>(&self, url: &str, fallback: T) -> T
    where
        T: DeserializeOwned,
    {
        match self.fetch(url).await {
            Ok(value) => value,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(url, error = %e, "API fetch failed; using fallback");
                fallback
            }
        }
    }

    /// GET `url` and decode it as `T`; `None` means "no data".
    pub async fn fetch_opt<T>(&self, url: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.fetch_or::<Option<T>>(url, None).await
    }

    async fn fetch<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }
        let value = self.source.get_json(url).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::sync::Mutex;

    /// Canned responses routed by URL substring, first match wins.
    /// Unrouted URLs answer 404.
    #[derive(Default)]
    pub struct MockSource {
        routes: Mutex<Vec<(String, Result<serde_json::Value, u16>)>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSource {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer URLs containing `pattern` with `body`.
        pub fn route(&self, pattern: &str, body: serde_json::Value) {
            self.routes.lock().unwrap().push((pattern.to_string(), Ok(body)));
        }

        /// Answer URLs containing `pattern` with an HTTP error status.
        pub fn fail(&self, pattern: &str, status: u16) {
            self.routes.lock().unwrap().push((pattern.to_string(), Err(status)));
        }

        /// Replace the response for an existing pattern.
        pub fn reroute(&self, pattern: &str, body: serde_json::Value) {
            let mut routes = self.routes.lock().unwrap();
            routes.retain(|(p, _)| p != pattern);
            routes.insert(0, (pattern.to_string(), Ok(body)));
        }

        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// How many requests hit a URL containing `pattern`.
        #[must_use]
        pub fn count(&self, pattern: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|url| url.contains(pattern))
                .count()
        }
    }

    #[async_trait::async_trait]
    impl JsonSource for MockSource {
        async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            let routes = self.routes.lock().unwrap();
            match routes.iter().find(|(pattern, _)| url.contains(pattern.as_str())) {
                Some((_, Ok(body))) => Ok(body.clone()),
                Some((_, Err(status))) => Err(FetchError::Status { status: *status }),
                None => Err(FetchError::Status { status: 404 }),
            }
        }
    }

    /// Transport that always fails before reaching a server.
    pub struct OfflineSource;

    #[async_trait::async_trait]
    impl JsonSource for OfflineSource {
        async fn get_json(&self, _url: &str) -> Result<serde_json::Value, FetchError> {
            Err(FetchError::Transport("connection refused".into()))
        }
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
