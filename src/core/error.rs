//! Centralized error types for the ledger indexer

use thiserror::Error;

/// Main indexer error type
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Ledger source error: {0}")]
    Source(#[from] SourceError),

    #[error("Index sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Nothing to export within range [{start}, {end})")]
    EmptyRange { start: u32, end: u32 },

    #[error("Bulk submission failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Ledger gap detected: missing [{expected}, {received})")]
    LedgerGap { expected: u32, received: u32 },

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised by the raw ledger data layer
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed ledger record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Ledger source is empty")]
    Empty,
}

/// Errors raised while talking to the search backend
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Bulk request rejected with status {status}")]
    Rejected { status: u16 },

    #[error("Bulk response reported item errors")]
    ItemErrors,

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Anomalies found while decoding raw ledger data. These are recovered
/// locally by the decoders and only surface through logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Price {n}/{d} has a zero denominator")]
    ZeroDenominator { n: i32, d: i32 },
}

/// Result type alias for indexer operations
pub type IndexerResult<T> = Result<T, IndexerError>;

impl From<serde_json::Error> for IndexerError {
    fn from(err: serde_json::Error) -> Self {
        IndexerError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for IndexerError {
    fn from(err: std::io::Error) -> Self {
        IndexerError::Source(SourceError::Io(err.to_string()))
    }
}

/// Helper to convert reqwest errors
impl From<reqwest::Error> for IndexerError {
    fn from(err: reqwest::Error) -> Self {
        IndexerError::Sink(SinkError::Http(err.to_string()))
    }
}

impl From<tokio::task::JoinError> for IndexerError {
    fn from(err: tokio::task::JoinError) -> Self {
        IndexerError::Worker(err.to_string())
    }
}
