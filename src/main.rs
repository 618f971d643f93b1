//! trc20-history CLI - collect 2023 USDT transfers for a list of addresses

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trc20_history::config::defaults;
use trc20_history::{Collector, Config, RunProgress};

#[derive(Parser)]
#[command(name = "trc20-history")]
#[command(
    version,
    about = "Collect 2023 USDT (TRC20) transfers for a list of Tron addresses"
)]
#[command(after_help = r#"EXAMPLES:
    # Read new_random_addresses.csv, write total_tx_2023.csv
    trc20-history

    # Other files, with a progress bar
    trc20-history -i wallets.csv -o wallets_2023.csv --progress

The input file needs an `Address` column. Failed addresses are logged and
left out of the output; re-run with just those addresses to fill the gaps.
"#)]
struct Cli {
    /// Address list (CSV with an `Address` column)
    #[arg(short, long, default_value = defaults::INPUT_PATH)]
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long, default_value = defaults::OUTPUT_PATH)]
    output: PathBuf,

    /// Show a progress bar instead of per-address progress lines
    #[arg(long)]
    progress: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match (cli.quiet || cli.progress, cli.verbose) {
        (_, 2..) => "trace",
        (_, 1) => "debug",
        (true, 0) => "warn",
        (false, 0) => "info",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = Config::builder()
        .input_path(&cli.input)
        .output_path(&cli.output)
        .build()?;

    let mut collector = Collector::from_config(config)?;

    // Set up progress bar
    let pb = if cli.progress && !cli.quiet {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    if let Some(pb) = pb.clone() {
        collector = collector.with_progress(move |progress: RunProgress| {
            pb.set_length(progress.total as u64);
            pb.set_position((progress.completed + progress.failed) as u64);
            pb.set_message(format!(
                "{:.2}% ok, {} failed, {} rows",
                progress.percent, progress.failed, progress.rows_written
            ));
        });
    }

    let start = Instant::now();
    let report = collector.run_from_files().await?;
    let elapsed = start.elapsed();

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    for failed in &report.failed {
        tracing::warn!("Omitted {}: {}", failed.address, failed.reason);
    }

    if !cli.quiet {
        eprintln!(
            "Collected {} rows from {}/{} addresses in {:.2}s",
            report.rows_written,
            report.completed,
            report.total,
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}
