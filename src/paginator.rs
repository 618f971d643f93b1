//! Per-address pagination over the transfer search

use crate::api::{JsonFetch, TransferQuery};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::transfer::{PageResponse, TransferRecord};

/// How one address ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressOutcome {
    /// Every page was fetched; records are in page order
    Completed {
        address: String,
        records: Vec<TransferRecord>,
    },
    /// A page failed; nothing was kept for this address
    Failed { address: String, reason: String },
}

impl AddressOutcome {
    /// The address this outcome belongs to
    pub fn address(&self) -> &str {
        match self {
            AddressOutcome::Completed { address, .. } => address,
            AddressOutcome::Failed { address, .. } => address,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AddressOutcome::Failed { .. })
    }
}

/// Collect every transfer of the configured token for `address` inside the
/// configured window.
///
/// Pages are requested one after another until `(page + 1) * page_size`
/// reaches the total the server reports. Any error abandons the address and
/// is returned as [`AddressOutcome::Failed`] instead of propagating.
pub async fn find_transactions_for_year<F: JsonFetch>(
    fetcher: &F,
    config: &Config,
    address: &str,
) -> AddressOutcome {
    match fetch_all_pages(fetcher, config, address).await {
        Ok(records) => {
            tracing::info!("{}: completed with {} txns", address, records.len());
            AddressOutcome::Completed {
                address: address.to_string(),
                records,
            }
        }
        Err(e) => {
            tracing::debug!("{}: abandoned: {}", address, e);
            AddressOutcome::Failed {
                address: address.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

async fn fetch_all_pages<F: JsonFetch>(
    fetcher: &F,
    config: &Config,
    address: &str,
) -> Result<Vec<TransferRecord>> {
    let mut results = Vec::new();
    let mut page = 0u64;
    let mut has_more = true;

    while has_more {
        if let Some(max) = config.max_pages {
            if page >= max {
                return Err(ApiError::PageLimitExceeded { pages: max }.into());
            }
        }

        tracing::debug!("{}: request page {}", address, page);
        let url = TransferQuery::page(config, address, page).url(&config.api_url)?;

        let body = fetcher.fetch(&url).await?;
        let response = PageResponse::from_value(body)?;
        tracing::debug!(
            "{}: received {} txns",
            address,
            response.token_transfers.len()
        );

        results.extend(response.matching_records(&config.contract, address)?);

        has_more = (page + 1).saturating_mul(config.page_size) < response.total;
        page += 1;
    }

    Ok(results)
}
