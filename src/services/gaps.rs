//! Gap detection over the indexed ledger sequence

use std::sync::Arc;
use tracing::{info, instrument};

use super::export::ExportPipeline;
use super::range::ExportRange;
use crate::core::{IndexCatalog, IndexerResult};

/// Missing ranges between consecutive entries of a sorted sequence list
pub fn find_gaps(seqs: &[u32]) -> Vec<ExportRange> {
    seqs.windows(2)
        .filter(|pair| pair[1] > pair[0].saturating_add(1))
        .filter_map(|pair| ExportRange::new(pair[0] + 1, pair[1] - pair[0] - 1).ok())
        .collect()
}

pub struct GapFiller {
    catalog: Arc<dyn IndexCatalog>,
    pipeline: ExportPipeline,
}

impl GapFiller {
    pub fn new(catalog: Arc<dyn IndexCatalog>, pipeline: ExportPipeline) -> Self {
        Self { catalog, pipeline }
    }

    /// Ranges missing between the lowest and highest indexed ledger
    pub async fn missing(&self) -> IndexerResult<Vec<ExportRange>> {
        let stats = self.catalog.ledger_stats().await?;
        let (min, max) = match (stats.min_seq, stats.max_seq) {
            (Some(min), Some(max)) => (min, max),
            _ => return Ok(Vec::new()),
        };

        let seqs = self.catalog.indexed_ledger_seqs(min, max).await?;
        Ok(find_gaps(&seqs))
    }

    /// Export every missing range, or only report them when `dry_run`
    #[instrument(skip(self))]
    pub async fn run(&self, dry_run: bool) -> IndexerResult<Vec<ExportRange>> {
        let gaps = self.missing().await?;
        info!(gaps = gaps.len(), "Gap scan done");

        for gap in &gaps {
            if dry_run {
                println!("{} ({} ledgers)", gap, gap.count());
                continue;
            }

            info!(range = %gap, "Filling gap");
            self.pipeline.run(*gap).await?;
        }

        Ok(gaps)
    }
}
