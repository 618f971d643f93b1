//! Run driver: owns the output and the progress counter

use crate::api::{HttpFetcher, JsonFetch, RateLimitedFetcher};
use crate::config::Config;
use crate::error::Result;
use crate::input::read_addresses;
use crate::output::{create_writer, OutputWriter};
use crate::paginator::AddressOutcome;
use crate::pool::run_pool;
use tokio::sync::mpsc;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(RunProgress) + Send + Sync>;

/// Progress after an address finished
#[derive(Debug, Clone, PartialEq)]
pub struct RunProgress {
    /// Addresses completed successfully
    pub completed: usize,
    /// Addresses abandoned
    pub failed: usize,
    /// Addresses in the run
    pub total: usize,
    /// Rows written so far
    pub rows_written: u64,
    /// Share of addresses completed successfully
    pub percent: f64,
}

/// An address whose transfers were omitted from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAddress {
    pub address: String,
    pub reason: String,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Addresses in the run
    pub total: usize,
    /// Addresses completed successfully
    pub completed: usize,
    /// Rows written, header excluded
    pub rows_written: u64,
    /// Addresses that failed, in the order they finished
    pub failed: Vec<FailedAddress>,
}

impl RunReport {
    /// True when no address failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Collects transfer history for a list of addresses into one output
pub struct Collector<F> {
    /// Configuration
    config: Config,
    /// Page fetcher shared by all workers
    fetcher: F,
    /// Progress callback
    progress_callback: Option<ProgressCallback>,
}

impl Collector<RateLimitedFetcher<HttpFetcher>> {
    /// Collector talking to the live API through the shared rate limiter
    pub fn from_config(config: Config) -> Result<Self> {
        let http = HttpFetcher::new(&config)?;
        let fetcher = RateLimitedFetcher::new(http, &config);
        Ok(Self::new(config, fetcher))
    }
}

impl<F: JsonFetch> Collector<F> {
    /// Create a collector over any fetcher
    pub fn new(config: Config, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            progress_callback: None,
        }
    }

    /// Set progress callback
    pub fn with_progress<C>(mut self, callback: C) -> Self
    where
        C: Fn(RunProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Read the configured address list and write to the configured output
    pub async fn run_from_files(&self) -> Result<RunReport> {
        let addresses = read_addresses(&self.config.input_path)?;
        let writer = create_writer(&self.config.output_path)?;

        tracing::info!(
            "Collecting {} addresses into {}",
            addresses.len(),
            self.config.output_path.display()
        );

        self.run(addresses, writer).await
    }

    /// Process every address and write completed ones to `writer`.
    ///
    /// The writer and counters are owned by a single aggregator that receives
    /// finished addresses from the pool, so rows of one address are always
    /// contiguous. Failed addresses never abort the run; they are listed in
    /// the returned report. Only an output error ends the run early, and it
    /// does so at once, without waiting for workers still paging or cooling
    /// down.
    pub async fn run(
        &self,
        addresses: Vec<String>,
        writer: Box<dyn OutputWriter>,
    ) -> Result<RunReport> {
        let (tx, rx) = mpsc::channel(self.config.pool_size);

        let aggregator = Aggregator {
            writer,
            report: RunReport {
                total: addresses.len(),
                ..Default::default()
            },
            callback: self.progress_callback.as_ref(),
        };

        let pool = run_pool(&self.fetcher, &self.config, addresses, tx);
        let aggregate = aggregator.run(rx);
        tokio::pin!(pool, aggregate);

        // An output error drops the pool, cancelling in-flight pages and cooldowns
        let report = tokio::select! {
            report = &mut aggregate => report?,
            () = &mut pool => aggregate.await?,
        };
        tracing::info!(
            "Finished: {}/{} addresses, {} rows, {} failed",
            report.completed,
            report.total,
            report.rows_written,
            report.failed.len()
        );
        Ok(report)
    }
}

/// Sole owner of the writer and the counters
struct Aggregator<'a> {
    writer: Box<dyn OutputWriter>,
    report: RunReport,
    callback: Option<&'a ProgressCallback>,
}

impl Aggregator<'_> {
    async fn run(mut self, mut rx: mpsc::Receiver<AddressOutcome>) -> Result<RunReport> {
        while let Some(outcome) = rx.recv().await {
            self.handle(outcome)?;
        }

        self.writer.finalize()?;
        Ok(self.report)
    }

    fn handle(&mut self, outcome: AddressOutcome) -> Result<()> {
        match outcome {
            AddressOutcome::Completed { records, .. } => {
                self.writer.write_records(&records)?;
                self.report.rows_written += records.len() as u64;
                self.report.completed += 1;

                let progress = self.progress();
                tracing::info!(
                    "Progress {:.2}%  ({}/{})",
                    progress.percent,
                    progress.completed,
                    progress.total
                );
                if let Some(cb) = self.callback {
                    cb(progress);
                }
            }
            AddressOutcome::Failed { address, reason } => {
                tracing::error!("Error occurred in address {}: {}", address, reason);
                self.report.failed.push(FailedAddress { address, reason });

                if let Some(cb) = self.callback {
                    cb(self.progress());
                }
            }
        }

        Ok(())
    }

    fn progress(&self) -> RunProgress {
        let total = self.report.total;
        RunProgress {
            completed: self.report.completed,
            failed: self.report.failed.len(),
            total,
            rows_written: self.report.rows_written,
            percent: if total > 0 {
                self.report.completed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}
