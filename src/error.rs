//! Error types for trc20-history

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Address list errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Output errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while talking to the explorer API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing field in response: {0}")]
    MissingField(String),

    #[error("Invalid transfer record: {0}")]
    InvalidRecord(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Page limit of {pages} reached before the reported total was exhausted")]
    PageLimitExceeded { pages: u64 },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised while reading the address list
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to open address file: {0}")]
    FileOpen(String),

    #[error("Address file has no `{0}` column")]
    MissingColumn(String),

    #[error("Failed to parse address file: {0}")]
    Parse(String),
}

/// Output-related errors
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output file: {0}")]
    FileCreate(String),

    #[error("Failed to write CSV: {0}")]
    CsvWrite(String),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
