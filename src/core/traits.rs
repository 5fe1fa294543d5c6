//! Core trait abstractions (Ports in Hexagonal Architecture)

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use super::error::IndexerResult;
use super::types::LedgerRecord;
use crate::domain::models::BulkBuffer;

/// Ledger record stream type
pub type LedgerStream = Pin<Box<dyn Stream<Item = IndexerResult<LedgerRecord>> + Send>>;

/// Ledger source port - supplies decoded ledger rows
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Stream ledgers for `[start, end)` in ascending sequence order.
    ///
    /// Implementations may yield records outside the range; callers filter.
    async fn stream_range(&self, start: u32, end: u32) -> IndexerResult<LedgerStream>;

    /// Unbounded stream of closed ledgers in ascending sequence order,
    /// beginning at `start` when given
    async fn subscribe(&self, start: Option<u32>) -> IndexerResult<LedgerStream>;

    /// First and last ledger known to the source
    async fn ledger_bounds(&self) -> IndexerResult<Option<LedgerBounds>>;
}

/// Index sink port - accepts bulk submissions
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Submit one bulk buffer. The call succeeds only if the whole buffer
    /// was accepted.
    async fn bulk_insert(&self, bulk: &BulkBuffer) -> IndexerResult<()>;
}

/// Index catalog port - administrative view of what is already indexed
#[async_trait]
pub trait IndexCatalog: Send + Sync {
    /// Create the document collections, deleting existing ones when `force`
    async fn create_indexes(&self, force: bool) -> IndexerResult<()>;

    /// Count and sequence range of indexed ledgers
    async fn ledger_stats(&self) -> IndexerResult<IndexStats>;

    /// Sorted sequence numbers of indexed ledgers within `[from, to]`
    async fn indexed_ledger_seqs(&self, from: u32, to: u32) -> IndexerResult<Vec<u32>>;
}

/// Inclusive sequence bounds of a ledger source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerBounds {
    pub first: u32,
    pub last: u32,
}

impl LedgerBounds {
    pub fn count(&self) -> u64 {
        u64::from(self.last.saturating_sub(self.first)) + 1
    }
}

/// Indexed ledger statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub count: u64,
    pub min_seq: Option<u32>,
    pub max_seq: Option<u32>,
}
