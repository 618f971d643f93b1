//! Run configuration
//!
//! Every value defaults to the constants in [`defaults`]. The token contract and
//! the date window are not configurable; the builder only exposes the knobs the
//! binary and the tests need.

pub mod defaults;

use crate::error::{ConfigError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a collection run
#[derive(Debug, Clone)]
pub struct Config {
    /// Transfer search endpoint
    pub api_url: String,
    /// Token contract whose transfers are kept
    pub contract: String,
    /// Window start (ms, inclusive)
    pub start_timestamp_ms: u64,
    /// Window end (ms, inclusive)
    pub end_timestamp_ms: u64,
    /// Rows per page
    pub page_size: u64,
    /// Addresses in flight at once
    pub pool_size: usize,
    /// Calls allowed per rate-limit window
    pub calls_per_window: usize,
    /// Rate-limit window length
    pub rate_window: Duration,
    /// Worker pause after a failed address
    pub failure_cooldown: Duration,
    /// Optional cap on pages per address (unbounded when `None`)
    pub max_pages: Option<u64>,
    /// Optional HTTP request timeout (none when `None`)
    pub request_timeout: Option<Duration>,
    /// Address list path
    pub input_path: PathBuf,
    /// Output CSV path
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: defaults::API_URL.to_string(),
            contract: defaults::CONTRACT_ADDRESS.to_string(),
            start_timestamp_ms: defaults::START_TIMESTAMP_MS,
            end_timestamp_ms: defaults::END_TIMESTAMP_MS,
            page_size: defaults::PAGE_SIZE,
            pool_size: defaults::POOL_SIZE,
            calls_per_window: defaults::CALLS_PER_WINDOW,
            rate_window: defaults::RATE_WINDOW,
            failure_cooldown: defaults::FAILURE_COOLDOWN,
            max_pages: None,
            request_timeout: None,
            input_path: PathBuf::from(defaults::INPUT_PATH),
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    pool_size: Option<usize>,
    rate_limit: Option<(usize, Duration)>,
    failure_cooldown: Option<Duration>,
    max_pages: Option<u64>,
    request_timeout: Option<Duration>,
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Set the number of addresses processed concurrently
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = Some(size);
        self
    }

    /// Set the rate limit as `calls` per rolling `window`
    pub fn rate_limit(mut self, calls: usize, window: Duration) -> Self {
        self.rate_limit = Some((calls, window));
        self
    }

    /// Set the pause after a failed address
    pub fn failure_cooldown(mut self, cooldown: Duration) -> Self {
        self.failure_cooldown = Some(cooldown);
        self
    }

    /// Cap the number of pages fetched per address
    pub fn max_pages(mut self, pages: u64) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Set an HTTP request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the address list path
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output CSV path
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Build the config
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(size) = self.pool_size {
            if size == 0 {
                return Err(invalid("pool_size", "must be at least 1"));
            }
            config.pool_size = size;
        }

        if let Some((calls, window)) = self.rate_limit {
            if calls == 0 {
                return Err(invalid("calls_per_window", "must be at least 1"));
            }
            if window.is_zero() {
                return Err(invalid("rate_window", "must be non-zero"));
            }
            config.calls_per_window = calls;
            config.rate_window = window;
        }

        if let Some(pages) = self.max_pages {
            if pages == 0 {
                return Err(invalid("max_pages", "must be at least 1"));
            }
            config.max_pages = Some(pages);
        }

        if let Some(cooldown) = self.failure_cooldown {
            config.failure_cooldown = cooldown;
        }
        config.request_timeout = self.request_timeout;

        if let Some(path) = self.input_path {
            config.input_path = path;
        }
        if let Some(path) = self.output_path {
            config.output_path = path;
        }

        Ok(config)
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
