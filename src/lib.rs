//! Ledger Search Indexer Library
//!
//! Turns a ledger's consensus output into deterministically keyed search
//! documents and submits them to the search backend in bulk.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod services;

// Re-export commonly used types
pub use crate::config::IndexerConfig;
pub use crate::core::{IndexerError, IndexerResult, LedgerRecord};
pub use crate::domain::models::{BulkBuffer, LedgerDocument, PagingToken};
pub use crate::domain::{build_ledger, BulkMaker};
