//! Document model for the search index
//!
//! Each document type knows its identity and target collection. Documents
//! are built once per ledger and never mutated after serialization.

pub mod asset;
pub mod balance;
pub mod document;
pub mod ledger;
pub mod operation;
pub mod paging_token;
pub mod transaction;

// Re-export all models
pub use asset::*;
pub use balance::*;
pub use document::*;
pub use ledger::*;
pub use operation::*;
pub use paging_token::*;
pub use transaction::*;

use serde::Serialize;

/// Any document produced for a ledger, in emission order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum LedgerDocument {
    Ledger(LedgerHeader),
    Transaction(Transaction),
    Operation(Operation),
    Balance(Balance),
}

impl LedgerDocument {
    pub fn paging_token(&self) -> PagingToken {
        match self {
            LedgerDocument::Ledger(doc) => doc.paging_token,
            LedgerDocument::Transaction(doc) => doc.paging_token,
            LedgerDocument::Operation(doc) => doc.paging_token,
            LedgerDocument::Balance(doc) => doc.paging_token,
        }
    }
}

impl Document for LedgerDocument {
    fn doc_id(&self) -> String {
        match self {
            LedgerDocument::Ledger(doc) => doc.doc_id(),
            LedgerDocument::Transaction(doc) => doc.doc_id(),
            LedgerDocument::Operation(doc) => doc.doc_id(),
            LedgerDocument::Balance(doc) => doc.doc_id(),
        }
    }

    fn index_name(&self) -> &'static str {
        match self {
            LedgerDocument::Ledger(doc) => doc.index_name(),
            LedgerDocument::Transaction(doc) => doc.index_name(),
            LedgerDocument::Operation(doc) => doc.index_name(),
            LedgerDocument::Balance(doc) => doc.index_name(),
        }
    }
}
