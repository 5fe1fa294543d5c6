//! Ingest pipeline: live ledgers, one submission each

use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::retry::RetryPolicy;
use crate::core::{IndexSink, IndexerError, IndexerResult, LedgerSource};
use crate::domain::build_ledger;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub ledgers: u64,
    pub documents: usize,
    pub last_seq: Option<u32>,
}

pub struct IngestPipeline {
    source: Arc<dyn LedgerSource>,
    sink: Arc<dyn IndexSink>,
    retry: RetryPolicy,
    start: Option<u32>,
}

impl IngestPipeline {
    pub fn new(source: Arc<dyn LedgerSource>, sink: Arc<dyn IndexSink>, retry: RetryPolicy) -> Self {
        Self {
            source,
            sink,
            retry,
            start: None,
        }
    }

    /// Skip records before `seq`; the first accepted record must be `seq`
    pub fn with_start(mut self, seq: u32) -> Self {
        self.start = Some(seq);
        self
    }

    /// Consume the subscription until it ends or a fatal error occurs.
    ///
    /// A sequence jump stops the pipeline with `LedgerGap`; the missing
    /// range is left to `fill-gaps`.
    #[instrument(skip(self), fields(start = ?self.start))]
    pub async fn run(&self) -> IndexerResult<IngestSummary> {
        let mut stream = self.source.subscribe(self.start).await?;
        let mut summary = IngestSummary::default();

        info!("Waiting for new ledgers");
        while let Some(item) = stream.next().await {
            let record = item?;
            let seq = record.seq();

            match (summary.last_seq, self.start) {
                (Some(last), _) if seq <= last => {
                    warn!(seq, last, "Ledger already processed, skipping");
                    continue;
                }
                (Some(last), _) if seq > last + 1 => {
                    return Err(IndexerError::LedgerGap {
                        expected: last + 1,
                        received: seq,
                    });
                }
                (None, Some(start)) if seq < start => {
                    debug!(seq, start, "Ledger before start position, skipping");
                    continue;
                }
                (None, Some(start)) if seq > start => {
                    return Err(IndexerError::LedgerGap {
                        expected: start,
                        received: seq,
                    });
                }
                _ => {}
            }

            let buffer = build_ledger(&record)?;
            self.retry
                .run("Bulk insert", |_| self.sink.bulk_insert(&buffer))
                .await?;

            summary.ledgers += 1;
            summary.documents += buffer.documents();
            summary.last_seq = Some(seq);
            info!(seq, documents = buffer.documents(), "Ledger ingested");
        }

        info!(ledgers = summary.ledgers, "Ledger subscription ended");
        Ok(summary)
    }
}
