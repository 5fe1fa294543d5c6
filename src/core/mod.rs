//! Core domain abstractions and types
//!
//! This module contains the raw ledger row types, the ports the pipelines
//! talk through, and error definitions. It is independent of any specific
//! infrastructure.

pub mod entries;
pub mod error;
pub mod operations;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use entries::{LedgerEntry, LedgerEntryChange, LedgerEntryData, LedgerKey};
pub use error::{DecodeError, IndexerError, IndexerResult, SinkError, SourceError};
pub use operations::{OperationBody, OperationKind, RawOperation};
pub use traits::{IndexCatalog, IndexSink, IndexStats, LedgerBounds, LedgerSource, LedgerStream};
pub use types::{
    LedgerHeaderRow, LedgerRecord, RawAsset, RawMemo, RawOperationResult, RawPrice,
    TransactionMeta, TxFeeHistoryRow, TxHistoryRow,
};
