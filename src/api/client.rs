//! JSON fetchers for the explorer API

use super::RateLimiter;
use crate::config::Config;
use crate::error::{ApiError, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Something that turns a URL into a decoded JSON body.
///
/// The paginator only depends on this seam, so tests can stand in a stub API.
pub trait JsonFetch: Send + Sync {
    /// Issue one GET and decode the body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

impl<T: JsonFetch> JsonFetch for Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Value>> + Send {
        (**self).fetch(url)
    }
}

/// Plain reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher; no timeout unless one is configured
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Http)?;

        Ok(Self { client })
    }
}

impl JsonFetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ApiError::Http)?;

        let json: Value = response.json().await.map_err(ApiError::Http)?;
        Ok(json)
    }
}

/// Wraps a fetcher so every call first takes a slot from its limiter.
///
/// Workers share one instance by reference, so the limit is global to a run.
#[derive(Debug)]
pub struct RateLimitedFetcher<F> {
    inner: F,
    limiter: RateLimiter,
}

impl<F: JsonFetch> RateLimitedFetcher<F> {
    /// Wrap `inner` with a limiter built from the config
    pub fn new(inner: F, config: &Config) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(config.calls_per_window, config.rate_window),
        }
    }
}

impl<F: JsonFetch> JsonFetch for RateLimitedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Value> {
        self.limiter.acquire().await;
        self.inner.fetch(url).await
    }
}
