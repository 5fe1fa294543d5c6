//! Operation document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::{AccountFlags, Asset, Price, Thresholds};
use super::document::{Document, OPERATIONS_INDEX};
use super::paging_token::PagingToken;
use super::transaction::{Memo, Transaction};
use crate::core::OperationKind;

/// Indexed operation, identified by its order string.
///
/// Kind-specific fields stay `None` unless the operation kind sets them,
/// and are left out of the serialized document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub tx_id: String,
    pub tx_idx: u32,
    /// 0-based position within the transaction
    pub idx: u32,
    pub seq: u32,
    /// `<transaction order>:<idx>`
    pub order: String,
    pub close_time: DateTime<Utc>,
    pub successful: bool,
    pub result_code: i32,
    pub tx_source_account_id: String,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub source_account_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_asset: Option<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_asset: Option<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_amount: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_price_n_d: Option<Price>,

    /// Intermediate assets of a path payment, in source order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Asset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_flags: Option<AccountFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_flags: Option<AccountFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_domain: Option<String>,
    #[serde(default, rename = "inflation_dest_id", skip_serializing_if = "Option::is_none")]
    pub inflation_dest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bump_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<Memo>,
    pub paging_token: PagingToken,
}

impl Operation {
    /// Operation carrying only the fields shared by every kind
    pub fn envelope(
        tx: &Transaction,
        kind: OperationKind,
        source_account: Option<&str>,
        index: usize,
    ) -> Self {
        let idx = u32::try_from(index).unwrap_or(u32::MAX);

        Self {
            tx_id: tx.id.clone(),
            tx_idx: tx.idx,
            idx,
            seq: tx.seq,
            order: format!("{}:{}", tx.order, idx),
            close_time: tx.close_time,
            successful: true,
            result_code: 0,
            tx_source_account_id: tx.source_account_id.clone(),
            kind,
            source_account_id: source_account
                .unwrap_or(&tx.source_account_id)
                .to_string(),
            destination_account_id: None,
            source_asset: None,
            source_amount: None,
            destination_asset: None,
            destination_amount: None,
            offer_id: None,
            offer_price: None,
            offer_price_n_d: None,
            path: None,
            thresholds: None,
            set_flags: None,
            clear_flags: None,
            home_domain: None,
            inflation_dest: None,
            trust_limit: None,
            authorize: None,
            bump_to: None,
            data_name: None,
            data_value: None,
            memo: tx.memo.clone(),
            paging_token: PagingToken::operation(tx.seq, tx.index(), index),
        }
    }
}

impl Document for Operation {
    fn doc_id(&self) -> String {
        self.order.clone()
    }

    fn index_name(&self) -> &'static str {
        OPERATIONS_INDEX
    }
}
