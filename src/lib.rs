//! trc20-history - one year of TRC20 transfers for a list of Tron addresses
//!
//! Pages through the Tronscan transfer search for every address, keeps the
//! USDT transfers made during 2023 (UTC) and writes them to a CSV file. All
//! workers share one rolling-window rate limiter; a single aggregator owns the
//! output, so rows of different addresses never interleave.
//!
//! # Example
//!
//! ```rust,no_run
//! use trc20_history::{Collector, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::builder()
//!         .input_path("addresses.csv")
//!         .output_path("transfers.csv")
//!         .build()?;
//!
//!     let report = Collector::from_config(config)?.run_from_files().await?;
//!
//!     println!("Wrote {} rows, {} addresses failed", report.rows_written, report.failed.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod paginator;
pub mod pool;
pub mod transfer;

// Re-exports for convenience
pub use api::{HttpFetcher, JsonFetch, RateLimitedFetcher, RateLimiter, TransferQuery};
pub use collector::{Collector, FailedAddress, ProgressCallback, RunProgress, RunReport};
pub use config::{Config, ConfigBuilder};
pub use error::{ApiError, ConfigError, Error, InputError, OutputError, Result};
pub use input::{read_addresses, read_addresses_from};
pub use output::{create_writer, CsvWriter, OutputWriter};
pub use paginator::{find_transactions_for_year, AddressOutcome};
pub use pool::run_pool;
pub use transfer::{PageResponse, RawTransfer, TransferRecord};
