//! Balance documents synthesized from ledger entry changes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::asset::Asset;
use super::document::{Document, BALANCES_INDEX};
use super::paging_token::PagingToken;

/// Which record stream a balance was derived from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSource {
    /// Operation execution metadata
    Meta,
    /// Fee charge
    Fee,
}

impl fmt::Display for BalanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceSource::Meta => write!(f, "meta"),
            BalanceSource::Fee => write!(f, "fee"),
        }
    }
}

/// Balance of one account in one asset right after a change, identified by
/// its paging token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub account_id: String,
    pub balance: i64,
    /// Change against the prior state recorded in the same change set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<i64>,
    pub asset: Asset,
    pub source: BalanceSource,
    pub created_at: DateTime<Utc>,
    pub paging_token: PagingToken,
}

impl Document for Balance {
    fn doc_id(&self) -> String {
        self.paging_token.to_string()
    }

    fn index_name(&self) -> &'static str {
        BALANCES_INDEX
    }
}
