//! End-to-end runs of the collector against an in-memory explorer API

use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use trc20_history::{
    Collector, Config, CsvWriter, Error, JsonFetch, RateLimitedFetcher, Result,
};

const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
const PAGE_SIZE: u64 = 50;

/// Explorer stand-in: every address owns a list of entries served in pages
#[derive(Default)]
struct StubApi {
    entries: HashMap<String, Vec<Value>>,
    /// Address -> 1-based request number that errors
    fail_on: HashMap<String, usize>,
    calls: Mutex<Vec<(String, u64, Instant)>>,
}

impl StubApi {
    fn with_entries(mut self, address: &str, entries: Vec<Value>) -> Self {
        self.entries.insert(address.to_string(), entries);
        self
    }

    fn failing(mut self, address: &str, request: usize) -> Self {
        self.fail_on.insert(address.to_string(), request);
        self
    }

    fn calls_for(&self, address: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _, _)| a == address)
            .count()
    }

    fn call_times(&self) -> Vec<Instant> {
        let mut times: Vec<_> = self.calls.lock().unwrap().iter().map(|c| c.2).collect();
        times.sort();
        times
    }
}

impl JsonFetch for StubApi {
    async fn fetch(&self, url: &str) -> Result<Value> {
        let parsed = reqwest::Url::parse(url).map_err(|e| Error::Other(e.to_string()))?;
        let param = |name: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default()
        };
        let address = param("relatedAddress");
        let start: u64 = param("start").parse().unwrap_or(0);

        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((address.clone(), start, Instant::now()));
            calls.iter().filter(|(a, _, _)| *a == address).count()
        };

        if self.fail_on.get(&address) == Some(&n) {
            return Err(Error::Other(format!("stub outage for {}", address)));
        }

        let entries = self.entries.get(&address).cloned().unwrap_or_default();
        let page: Vec<Value> = entries
            .iter()
            .skip(start as usize)
            .take(PAGE_SIZE as usize)
            .cloned()
            .collect();

        Ok(json!({ "token_transfers": page, "total": entries.len() }))
    }
}

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn transfer(id: &str, contract: &str) -> Value {
    json!({
        "transaction_id": id,
        "block": 50_000_000u64,
        "block_ts": 1_690_000_000_999u64,
        "from_address": "TFrom",
        "to_address": "TTo",
        "quant": "2500000",
        "contract_address": contract,
    })
}

fn transfers(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let contract = if i % 3 == 0 { "TOtherToken" } else { USDT };
            transfer(&format!("{}-{}", prefix, i), contract)
        })
        .collect()
}

fn config(pool_size: usize) -> Config {
    Config::builder()
        .pool_size(pool_size)
        .build()
        .unwrap()
}

fn read_rows(path: &Path) -> (String, Vec<String>) {
    let content = std::fs::read_to_string(path).unwrap();
    let mut lines = content.lines().map(String::from);
    let header = lines.next().unwrap();
    (header, lines.collect())
}

async fn run_to_file(
    api: Arc<StubApi>,
    config: Config,
    addresses: &[&str],
    path: &Path,
) -> trc20_history::RunReport {
    let fetcher = RateLimitedFetcher::new(api, &config);
    let collector = Collector::new(config, fetcher);
    let writer = CsvWriter::new(path).unwrap();
    let addresses = addresses.iter().map(|s| s.to_string()).collect();

    collector.run(addresses, Box::new(writer)).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_two_rows_for_a_none_for_b() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let api = Arc::new(
        StubApi::default()
            .with_entries("A", vec![transfer("a1", USDT), transfer("a2", USDT)])
            .with_entries("B", vec![]),
    );

    let report = run_to_file(api.clone(), config(3), &["A", "B"], &path).await;

    assert_eq!(report.completed, 2);
    assert!(report.is_complete());
    assert_eq!(report.rows_written, 2);

    let (header, rows) = read_rows(&path);
    assert_eq!(header, "id,address,block,timestamp,from,to,quant");
    assert_eq!(
        rows,
        vec![
            "a1,A,50000000,1690000000,TFrom,TTo,2.5",
            "a2,A,50000000,1690000000,TFrom,TTo,2.5",
        ]
    );
    assert_eq!(api.calls_for("A"), 1);
    assert_eq!(api.calls_for("B"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_on_second_page_omits_address_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let api = Arc::new(
        StubApi::default()
            .with_entries("C", transfers("c", 120))
            .failing("C", 2)
            .with_entries("D", transfers("d", 3)),
    );
    let logs = LogBuffer::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    let start = Instant::now();

    let report = run_to_file(api.clone(), config(1), &["C", "D"], &path).await;

    assert_eq!(report.completed, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].address, "C");
    assert!(report.failed[0].reason.contains("stub outage"));

    let logs = logs.contents();
    assert!(logs.contains("ERROR"));
    assert!(logs.contains("Error occurred in address C: stub outage for C"));

    // C stops at its failing page; D runs only after the cooldown
    assert_eq!(api.calls_for("C"), 2);
    assert_eq!(api.calls_for("D"), 1);
    assert!(start.elapsed() >= Duration::from_secs(120));

    let (_, rows) = read_rows(&path);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.contains(",D,")));
}

#[tokio::test(start_paused = true)]
async fn test_pagination_counts_and_filtering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    // 170 entries -> 4 pages; one in three belongs to another token
    let api = Arc::new(StubApi::default().with_entries("P", transfers("p", 170)));

    let report = run_to_file(api.clone(), config(3), &["P"], &path).await;

    assert_eq!(api.calls_for("P"), 4);
    let expected = (0..170).filter(|i| i % 3 != 0).count() as u64;
    assert_eq!(report.rows_written, expected);

    let offsets: Vec<u64> = api.calls.lock().unwrap().iter().map(|c| c.1).collect();
    assert_eq!(offsets, vec![0, 50, 100, 150]);
}

#[tokio::test(start_paused = true)]
async fn test_pool_size_does_not_change_row_set() {
    let names = ["W1", "W2", "W3", "W4", "W5", "W6", "W7"];
    let build = || {
        let mut api = StubApi::default();
        for (i, name) in names.iter().enumerate() {
            api = api.with_entries(name, transfers(name, i * 37));
        }
        Arc::new(api)
    };

    let dir = tempfile::tempdir().unwrap();
    let serial = dir.path().join("serial.csv");
    let parallel = dir.path().join("parallel.csv");

    run_to_file(build(), config(1), &names, &serial).await;
    run_to_file(build(), config(3), &names, &parallel).await;

    let (_, serial_rows) = read_rows(&serial);
    let (_, parallel_rows) = read_rows(&parallel);
    assert_eq!(serial_rows.len(), parallel_rows.len());

    let serial_set: HashSet<_> = serial_rows.into_iter().collect();
    let parallel_set: HashSet<_> = parallel_rows.into_iter().collect();
    assert_eq!(serial_set, parallel_set);
}

#[tokio::test(start_paused = true)]
async fn test_rows_of_an_address_are_contiguous() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let api = Arc::new(
        StubApi::default()
            .with_entries("X", transfers("x", 130))
            .with_entries("Y", transfers("y", 90))
            .with_entries("Z", transfers("z", 60)),
    );

    run_to_file(api, config(3), &["X", "Y", "Z"], &path).await;

    let (_, rows) = read_rows(&path);
    let owners: Vec<String> = rows
        .iter()
        .map(|r| r.split(',').nth(1).unwrap().to_string())
        .collect();

    let mut runs = owners.clone();
    runs.dedup();
    assert_eq!(runs.len(), 3, "rows interleaved: {:?}", runs);
}

#[tokio::test(start_paused = true)]
async fn test_calls_respect_rate_limit_across_workers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut api = StubApi::default();
    for name in ["R1", "R2", "R3", "R4", "R5"] {
        api = api.with_entries(name, transfers(name, 140));
    }
    let api = Arc::new(api);

    run_to_file(api.clone(), config(3), &["R1", "R2", "R3", "R4", "R5"], &path).await;

    let times = api.call_times();
    assert_eq!(times.len(), 15);
    for window in times.windows(4) {
        assert!(window[3].duration_since(window[0]) >= Duration::from_secs(2));
    }
}
