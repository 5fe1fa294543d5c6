//! Ledger header document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{Document, LEDGERS_INDEX};
use super::paging_token::PagingToken;
use crate::core::{LedgerHeaderRow, TxHistoryRow};

/// Indexed ledger header, identified by its sequence number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerHeader {
    pub seq: u32,
    pub hash: String,
    pub prev_hash: String,
    pub close_time: DateTime<Utc>,
    pub version: u32,
    pub total_coins: i64,
    pub fee_pool: i64,
    pub inflation_seq: u32,
    pub id_pool: u64,
    pub base_fee: u32,
    pub base_reserve: u32,
    pub max_tx_set_size: u32,
    pub transaction_count: u32,
    pub operation_count: u32,
    pub paging_token: PagingToken,
}

impl LedgerHeader {
    pub fn new(row: &LedgerHeaderRow, transactions: &[TxHistoryRow]) -> Self {
        let operation_count: usize = transactions
            .iter()
            .map(|tx| tx.envelope.operations.len())
            .sum();

        Self {
            seq: row.ledger_seq,
            hash: row.hash.clone(),
            prev_hash: row.prev_hash.clone(),
            close_time: row.close_time,
            version: row.ledger_version,
            total_coins: row.total_coins,
            fee_pool: row.fee_pool,
            inflation_seq: row.inflation_seq,
            id_pool: row.id_pool,
            base_fee: row.base_fee,
            base_reserve: row.base_reserve,
            max_tx_set_size: row.max_tx_set_size,
            transaction_count: u32::try_from(transactions.len()).unwrap_or(u32::MAX),
            operation_count: u32::try_from(operation_count).unwrap_or(u32::MAX),
            paging_token: PagingToken::ledger(row.ledger_seq),
        }
    }
}

impl Document for LedgerHeader {
    fn doc_id(&self) -> String {
        self.seq.to_string()
    }

    fn index_name(&self) -> &'static str {
        LEDGERS_INDEX
    }
}
