//! Fixed parameters of a collection run

use std::time::Duration;

/// Tronscan TRC20 transfer search endpoint
pub const API_URL: &str = "https://apilist.tronscanapi.com/api/filter/trc20/transfers";

/// USDT (TRC20) contract; only transfers of this token are kept
pub const CONTRACT_ADDRESS: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// 2023-01-01T00:00:00Z in milliseconds
pub const START_TIMESTAMP_MS: u64 = 1_672_531_200_000;

/// 2023-12-31T23:59:59Z in milliseconds (inclusive)
pub const END_TIMESTAMP_MS: u64 = 1_704_067_199_000;

/// Rows requested per page
pub const PAGE_SIZE: u64 = 50;

/// Addresses processed concurrently
pub const POOL_SIZE: usize = 3;

/// Calls allowed per rate-limit window, across all workers
pub const CALLS_PER_WINDOW: usize = 3;

/// Length of the rolling rate-limit window
pub const RATE_WINDOW: Duration = Duration::from_secs(2);

/// Pause applied to a worker after its address failed
pub const FAILURE_COOLDOWN: Duration = Duration::from_secs(120);

/// Address list read at startup
pub const INPUT_PATH: &str = "new_random_addresses.csv";

/// Column of the address list holding the addresses
pub const ADDRESS_COLUMN: &str = "Address";

/// Destination of the collected rows
pub const OUTPUT_PATH: &str = "total_tx_2023.csv";

/// Header of the output file
pub const OUTPUT_HEADER: [&str; 7] = ["id", "address", "block", "timestamp", "from", "to", "quant"];

/// Scale between on-chain integer amounts and USDT
pub const QUANT_DECIMALS: u32 = 6;
