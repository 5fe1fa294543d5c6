//! Export pipeline: a closed ledger range into chunked bulk submissions

use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::range::ExportRange;
use super::retry::RetryPolicy;
use crate::config::IndexerConfig;
use crate::core::{IndexSink, IndexerError, IndexerResult, LedgerSource};
use crate::domain::build_ledger;
use crate::domain::models::BulkBuffer;

/// Knobs of one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Ledgers built in parallel
    pub concurrency: usize,
    /// Ledgers per submission
    pub batch_size: u32,
    pub retry: RetryPolicy,
    /// Build and count, never submit
    pub dry_run: bool,
    /// Print every built buffer to stdout
    pub verbose: bool,
}

impl ExportConfig {
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self {
            concurrency: config.export.concurrency,
            batch_size: config.export.batch_size,
            retry: RetryPolicy::from_config(&config.retry),
            dry_run: false,
            verbose: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::from_config(&IndexerConfig::default())
    }
}

/// What an export run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub ledgers: u64,
    pub documents: usize,
    pub bytes: usize,
    pub chunks: usize,
    pub submissions: usize,
}

pub struct ExportPipeline {
    source: Arc<dyn LedgerSource>,
    sink: Arc<dyn IndexSink>,
    config: ExportConfig,
}

impl ExportPipeline {
    pub fn new(source: Arc<dyn LedgerSource>, sink: Arc<dyn IndexSink>, config: ExportConfig) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    /// Export `[start, start + count)`. A zero count fails before the
    /// source is touched.
    pub async fn export(&self, start: u32, count: u32) -> IndexerResult<ExportSummary> {
        let range = ExportRange::new(start, count)?;
        self.run(range).await
    }

    /// Export every ledger of `range`, one submission per chunk.
    ///
    /// Fails on the first chunk whose submission exhausts its retries;
    /// chunks already submitted stay indexed.
    #[instrument(skip(self), fields(range = %range))]
    pub async fn run(&self, range: ExportRange) -> IndexerResult<ExportSummary> {
        let chunks = range.chunks(self.config.batch_size);
        info!(
            "Exporting ledgers from {} to {}, total {} in {} chunks",
            range.start(),
            range.end(),
            range.count(),
            chunks.len()
        );

        let mut summary = ExportSummary::default();
        for chunk in chunks {
            let (buffer, ledgers) = self.build_chunk(chunk).await?;
            summary.chunks += 1;
            summary.ledgers += ledgers;
            summary.documents += buffer.documents();
            summary.bytes += buffer.len();

            if buffer.is_empty() {
                warn!(chunk = %chunk, "No ledgers found in chunk, nothing to submit");
                continue;
            }

            if self.config.verbose {
                println!("{}", buffer.as_str());
            }

            if self.config.dry_run {
                debug!(chunk = %chunk, documents = buffer.documents(), "Dry run, skipping submission");
                continue;
            }

            self.submit(&buffer).await?;
            summary.submissions += 1;
            info!(
                chunk = %chunk,
                ledgers,
                documents = buffer.documents(),
                "Chunk indexed"
            );
        }

        info!(
            ledgers = summary.ledgers,
            documents = summary.documents,
            bytes = summary.bytes,
            "Export done"
        );
        Ok(summary)
    }

    /// Build every ledger of `chunk` into one buffer, in ledger order
    async fn build_chunk(&self, chunk: ExportRange) -> IndexerResult<(BulkBuffer, u64)> {
        let stream = self.source.stream_range(chunk.start(), chunk.end()).await?;

        let mut builds = stream
            .map(move |item| async move {
                let record = item?;
                let seq = record.seq();
                if !chunk.contains(seq) {
                    warn!(seq, chunk = %chunk, "Discarding ledger outside of requested range");
                    return Ok(None);
                }

                let bulk = tokio::task::spawn_blocking(move || build_ledger(&record)).await??;
                Ok::<_, IndexerError>(Some((seq, bulk)))
            })
            .buffered(self.config.concurrency.max(1));

        let mut buffer = BulkBuffer::new();
        let mut ledgers = 0u64;
        while let Some(built) = builds.next().await {
            if let Some((seq, bulk)) = built? {
                debug!(seq, documents = bulk.documents(), "Ledger built");
                buffer.append(bulk);
                ledgers += 1;
            }
        }

        if ledgers < u64::from(chunk.count()) {
            warn!(
                chunk = %chunk,
                expected = chunk.count(),
                received = ledgers,
                "Source returned fewer ledgers than requested"
            );
        }

        Ok((buffer, ledgers))
    }

    async fn submit(&self, buffer: &BulkBuffer) -> IndexerResult<()> {
        self.config
            .retry
            .run("Bulk insert", |_| self.sink.bulk_insert(buffer))
            .await
    }
}
