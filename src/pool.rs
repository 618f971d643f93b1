//! Bounded worker pool over the address list

use crate::api::JsonFetch;
use crate::config::Config;
use crate::paginator::{find_transactions_for_year, AddressOutcome};
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

/// Run the paginator over `addresses` with at most `config.pool_size` in flight.
///
/// Each outcome is sent to `results` as soon as its address finishes. A slot
/// whose address failed sleeps for `config.failure_cooldown` before it takes
/// the next address. Once the receiver is gone no new address is started.
pub async fn run_pool<F: JsonFetch>(
    fetcher: &F,
    config: &Config,
    addresses: Vec<String>,
    results: mpsc::Sender<AddressOutcome>,
) {
    stream::iter(addresses)
        .for_each_concurrent(config.pool_size, |address| {
            let results = results.clone();

            async move {
                if results.is_closed() {
                    return;
                }

                let outcome = find_transactions_for_year(fetcher, config, &address).await;
                let failed = outcome.is_failed();

                if results.send(outcome).await.is_err() {
                    return;
                }

                if failed && !config.failure_cooldown.is_zero() {
                    tracing::debug!(
                        "{}: pausing worker for {:?}",
                        address,
                        config.failure_cooldown
                    );
                    tokio::time::sleep(config.failure_cooldown).await;
                }
            }
        })
        .await;
}
