//! Raw ledger rows as delivered by the ledger data layer
//!
//! These mirror the decoded wire format one-to-one. The domain layer turns
//! them into search documents; nothing here knows about the index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entries::LedgerEntryChange;
use super::operations::RawOperation;

/// One ledger's full raw record set: header, transactions and fee charges
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRecord {
    pub header: LedgerHeaderRow,
    #[serde(default)]
    pub transactions: Vec<TxHistoryRow>,
    #[serde(default)]
    pub fees: Vec<TxFeeHistoryRow>,
}

impl LedgerRecord {
    pub fn seq(&self) -> u32 {
        self.header.ledger_seq
    }
}

/// Ledger header row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerHeaderRow {
    pub ledger_seq: u32,
    pub hash: String,
    pub prev_hash: String,
    pub close_time: DateTime<Utc>,
    #[serde(default)]
    pub ledger_version: u32,
    #[serde(default)]
    pub total_coins: i64,
    #[serde(default)]
    pub fee_pool: i64,
    #[serde(default)]
    pub inflation_seq: u32,
    #[serde(default)]
    pub id_pool: u64,
    #[serde(default)]
    pub base_fee: u32,
    #[serde(default)]
    pub base_reserve: u32,
    #[serde(default)]
    pub max_tx_set_size: u32,
}

/// Transaction history row: envelope, result and execution metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxHistoryRow {
    /// Transaction hash
    pub id: String,
    pub envelope: TransactionEnvelope,
    pub result: TransactionResultRow,
    pub meta: TransactionMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionEnvelope {
    pub source_account: String,
    /// Maximum fee the source was willing to pay
    pub fee: u32,
    pub seq_num: i64,
    #[serde(default)]
    pub memo: RawMemo,
    #[serde(default)]
    pub operations: Vec<RawOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionResultRow {
    pub fee_charged: i64,
    /// Transaction-level result code, 0 means success
    pub code: i32,
    /// Per-operation results; absent when the transaction failed before
    /// operations were applied
    #[serde(default)]
    pub results: Option<Vec<RawOperationResult>>,
}

/// Per-operation result: the outer code is 0 when the operation ran, the
/// inner code is the kind-specific outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawOperationResult {
    pub code: i32,
    #[serde(default)]
    pub inner_code: Option<i32>,
}

/// Transaction execution metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "version", rename_all = "snake_case")]
pub enum TransactionMeta {
    V0 {
        #[serde(default)]
        operations: Vec<OperationMeta>,
    },
    V1 {
        #[serde(default)]
        tx_changes: Vec<LedgerEntryChange>,
        #[serde(default)]
        operations: Vec<OperationMeta>,
    },
}

impl TransactionMeta {
    /// Per-operation change sets, whichever meta version carries them
    pub fn operations(&self) -> &[OperationMeta] {
        match self {
            TransactionMeta::V0 { operations } => operations,
            TransactionMeta::V1 { operations, .. } => operations,
        }
    }
}

impl Default for TransactionMeta {
    fn default() -> Self {
        TransactionMeta::V1 {
            tx_changes: Vec::new(),
            operations: Vec::new(),
        }
    }
}

/// Ledger entry changes caused by one operation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationMeta {
    #[serde(default)]
    pub changes: Vec<LedgerEntryChange>,
}

/// Fee history row: ledger entry changes caused by charging one
/// transaction's fee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxFeeHistoryRow {
    pub tx_id: String,
    #[serde(default)]
    pub changes: Vec<LedgerEntryChange>,
}

/// Transaction memo as encoded on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawMemo {
    #[default]
    None,
    Text(String),
    Id(u64),
    Hash(String),
    Return(String),
}

/// Asset as encoded on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawAsset {
    Native,
    CreditAlphanum4 { code: String, issuer: String },
    CreditAlphanum12 { code: String, issuer: String },
}

impl RawAsset {
    pub fn credit(code: &str, issuer: &str) -> Self {
        if code.len() <= 4 {
            RawAsset::CreditAlphanum4 {
                code: code.to_string(),
                issuer: issuer.to_string(),
            }
        } else {
            RawAsset::CreditAlphanum12 {
                code: code.to_string(),
                issuer: issuer.to_string(),
            }
        }
    }
}

impl fmt::Display for RawAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAsset::Native => write!(f, "native"),
            RawAsset::CreditAlphanum4 { code, issuer }
            | RawAsset::CreditAlphanum12 { code, issuer } => write!(f, "{}-{}", code, issuer),
        }
    }
}

/// Rational price as encoded on the wire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPrice {
    pub n: i32,
    pub d: i32,
}
