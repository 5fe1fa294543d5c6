//! Adapters layer - Infrastructure implementations
//!
//! Implementations of the core ports: a file-backed ledger source and the
//! search backend client.

pub mod ledger;
pub mod storage;

// Re-export commonly used adapters
pub use ledger::NdjsonLedgerSource;
pub use storage::ElasticClient;
