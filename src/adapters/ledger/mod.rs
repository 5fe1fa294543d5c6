//! Raw ledger data adapters

pub mod ndjson;

pub use ndjson::NdjsonLedgerSource;
