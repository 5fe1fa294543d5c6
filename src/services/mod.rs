//! Application services: the pipelines that move ledgers into the index

pub mod export;
pub mod gaps;
pub mod ingest;
pub mod range;
pub mod retry;

pub use export::{ExportConfig, ExportPipeline, ExportSummary};
pub use gaps::{find_gaps, GapFiller};
pub use ingest::{IngestPipeline, IngestSummary};
pub use range::{ExportRange, StartPosition};
pub use retry::RetryPolicy;
