//! Pure transformations from raw ledger rows to documents

pub mod balance;
pub mod bulk;
pub mod operation;

pub use balance::BalanceExtractor;
pub use bulk::{build_ledger, BulkMaker};
pub use operation::{append_result, decode_operation, decode_operations};
