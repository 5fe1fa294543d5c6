//! Domain layer: the document model and the processors that build it

pub mod models;
pub mod processors;

pub use processors::{build_ledger, BulkMaker};
