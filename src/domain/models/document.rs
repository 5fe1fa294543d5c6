//! Document identity and the bulk-write buffer

use serde::Serialize;

use crate::core::IndexerResult;

pub const LEDGERS_INDEX: &str = "ledgers";
pub const TRANSACTIONS_INDEX: &str = "transactions";
pub const OPERATIONS_INDEX: &str = "operations";
pub const BALANCES_INDEX: &str = "balances";

/// Every collection the indexer writes to
pub const ALL_INDEXES: [&str; 4] = [
    LEDGERS_INDEX,
    TRANSACTIONS_INDEX,
    OPERATIONS_INDEX,
    BALANCES_INDEX,
];

/// A document that can be written to the index
pub trait Document: Serialize {
    /// Stable identifier; re-indexing the same ledger overwrites rather
    /// than duplicates
    fn doc_id(&self) -> String;

    /// Target collection, a pure function of the document type
    fn index_name(&self) -> &'static str;
}

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkActionMeta<'a>,
}

#[derive(Serialize)]
struct BulkActionMeta<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: &'a str,
}

/// Newline-delimited bulk body: one action line followed by one source
/// line per document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkBuffer {
    body: String,
    documents: usize,
}

impl BulkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document
    pub fn push<D: Document>(&mut self, doc: &D) -> IndexerResult<()> {
        let id = doc.doc_id();
        let action = BulkAction {
            index: BulkActionMeta {
                index: doc.index_name(),
                id: &id,
            },
        };

        // A failed serialization leaves the buffer untouched
        let action_line = serde_json::to_string(&action)?;
        let source_line = serde_json::to_string(doc)?;

        self.body.push_str(&action_line);
        self.body.push('\n');
        self.body.push_str(&source_line);
        self.body.push('\n');
        self.documents += 1;
        Ok(())
    }

    /// Move every document of `other` to the end of this buffer
    pub fn append(&mut self, other: BulkBuffer) {
        self.body.push_str(&other.body);
        self.documents += other.documents;
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn into_string(self) -> String {
        self.body
    }

    /// Size of the body in bytes
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents == 0
    }

    /// Number of documents in the buffer
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn clear(&mut self) {
        self.body.clear();
        self.documents = 0;
    }
}
