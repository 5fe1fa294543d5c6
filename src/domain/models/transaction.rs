//! Transaction document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{Document, TRANSACTIONS_INDEX};
use super::paging_token::PagingToken;
use crate::core::{RawMemo, TxHistoryRow};

/// Transaction result code for a successful transaction
pub const TX_SUCCESS: i32 = 0;

/// Transaction memo as indexed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Memo {
    #[serde(rename = "type")]
    pub memo_type: String,
    pub value: String,
}

impl Memo {
    /// `None` for transactions without a memo
    pub fn from_raw(memo: &RawMemo) -> Option<Self> {
        let (memo_type, value) = match memo {
            RawMemo::None => return None,
            RawMemo::Text(text) => ("text", text.clone()),
            RawMemo::Id(id) => ("id", id.to_string()),
            RawMemo::Hash(hash) => ("hash", hash.clone()),
            RawMemo::Return(hash) => ("return", hash.clone()),
        };

        Some(Self {
            memo_type: memo_type.to_string(),
            value,
        })
    }
}

/// Indexed transaction, identified by its order string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// 0-based position within the ledger
    pub idx: u32,
    pub seq: u32,
    /// `<ledger seq>:<idx>`
    pub order: String,
    pub close_time: DateTime<Utc>,
    pub successful: bool,
    pub result_code: i32,
    pub source_account_id: String,
    pub source_account_seq: i64,
    pub fee: u32,
    pub fee_charged: i64,
    pub operation_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<Memo>,
    pub paging_token: PagingToken,
}

impl Transaction {
    pub fn new(row: &TxHistoryRow, index: usize, ledger_seq: u32, close_time: DateTime<Utc>) -> Self {
        let idx = u32::try_from(index).unwrap_or(u32::MAX);

        Self {
            id: row.id.clone(),
            idx,
            seq: ledger_seq,
            order: format!("{}:{}", ledger_seq, idx),
            close_time,
            successful: row.result.code == TX_SUCCESS,
            result_code: row.result.code,
            source_account_id: row.envelope.source_account.clone(),
            source_account_seq: row.envelope.seq_num,
            fee: row.envelope.fee,
            fee_charged: row.result.fee_charged,
            operation_count: u32::try_from(row.envelope.operations.len()).unwrap_or(u32::MAX),
            memo: Memo::from_raw(&row.envelope.memo),
            paging_token: PagingToken::transaction(ledger_seq, index),
        }
    }

    /// 0-based position within the ledger
    pub fn index(&self) -> usize {
        self.idx as usize
    }
}

impl Document for Transaction {
    fn doc_id(&self) -> String {
        self.order.clone()
    }

    fn index_name(&self) -> &'static str {
        TRANSACTIONS_INDEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_variants() {
        assert_eq!(Memo::from_raw(&RawMemo::None), None);

        let text = Memo::from_raw(&RawMemo::Text("hello".into())).unwrap();
        assert_eq!(text.memo_type, "text");
        assert_eq!(text.value, "hello");

        let id = Memo::from_raw(&RawMemo::Id(42)).unwrap();
        assert_eq!(id.memo_type, "id");
        assert_eq!(id.value, "42");
    }
}
