//! Explorer API access: request building, throttling, fetching

mod client;
mod limiter;
mod query;

pub use client::{HttpFetcher, JsonFetch, RateLimitedFetcher};
pub use limiter::RateLimiter;
pub use query::TransferQuery;
