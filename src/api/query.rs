//! Transfer search request parameters

use crate::config::Config;
use crate::error::{ApiError, Result};
use reqwest::Url;

/// One page request for an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferQuery<'a> {
    /// Address whose transfers are requested (either side)
    pub address: &'a str,
    /// Row offset
    pub offset: u64,
    /// Rows per page
    pub limit: u64,
    /// Window start (ms, inclusive)
    pub start_timestamp_ms: u64,
    /// Window end (ms, inclusive)
    pub end_timestamp_ms: u64,
}

impl<'a> TransferQuery<'a> {
    /// Query for page `page` (0-indexed) of `address`
    pub fn page(config: &Config, address: &'a str, page: u64) -> Self {
        Self {
            address,
            offset: page * config.page_size,
            limit: config.page_size,
            start_timestamp_ms: config.start_timestamp_ms,
            end_timestamp_ms: config.end_timestamp_ms,
        }
    }

    /// Build the request URL against `base`
    ///
    /// Results are sorted newest first and the server is asked for the total
    /// row count, which drives pagination.
    pub fn url(&self, base: &str) -> Result<String> {
        let limit = self.limit.to_string();
        let offset = self.offset.to_string();
        let start = self.start_timestamp_ms.to_string();
        let end = self.end_timestamp_ms.to_string();

        let url = Url::parse_with_params(
            base,
            &[
                ("limit", limit.as_str()),
                ("start", offset.as_str()),
                ("sort", "-timestamp"),
                ("count", "true"),
                ("filterTokenValue", "0"),
                ("relatedAddress", self.address),
                ("start_timestamp", start.as_str()),
                ("end_timestamp", end.as_str()),
            ],
        )
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))?;

        Ok(url.into())
    }
}
