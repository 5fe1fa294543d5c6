//! Ledger entry change records

use serde::{Deserialize, Serialize};

use super::types::{RawAsset, RawPrice};

/// One change to a piece of persistent ledger state.
///
/// `State` records carry the entry as it was before the change that
/// follows them; the other variants carry the post-change state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEntryChange {
    Created { entry: LedgerEntry },
    Updated { entry: LedgerEntry },
    Removed { key: LedgerKey },
    State { entry: LedgerEntry },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    #[serde(default)]
    pub last_modified_ledger_seq: u32,
    pub data: LedgerEntryData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEntryData {
    Account(AccountEntry),
    Trustline(TrustLineEntry),
    Offer(OfferEntry),
    Data(DataEntry),
}

impl LedgerEntryData {
    /// Identity of the entry, independent of its contents
    pub fn key(&self) -> LedgerKey {
        match self {
            LedgerEntryData::Account(a) => LedgerKey::Account {
                account_id: a.account_id.clone(),
            },
            LedgerEntryData::Trustline(t) => LedgerKey::Trustline {
                account_id: t.account_id.clone(),
                asset: t.asset.clone(),
            },
            LedgerEntryData::Offer(o) => LedgerKey::Offer {
                seller_id: o.seller_id.clone(),
                offer_id: o.offer_id,
            },
            LedgerEntryData::Data(d) => LedgerKey::Data {
                account_id: d.account_id.clone(),
                data_name: d.data_name.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountEntry {
    pub account_id: String,
    pub balance: i64,
    #[serde(default)]
    pub seq_num: i64,
    #[serde(default)]
    pub num_sub_entries: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub home_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustLineEntry {
    pub account_id: String,
    pub asset: RawAsset,
    pub balance: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub flags: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferEntry {
    pub seller_id: String,
    pub offer_id: i64,
    pub selling: RawAsset,
    pub buying: RawAsset,
    pub amount: i64,
    pub price: RawPrice,
    #[serde(default)]
    pub flags: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataEntry {
    pub account_id: String,
    pub data_name: String,
    #[serde(default)]
    pub data_value: String,
}

/// Key of a ledger entry, as carried by `Removed` changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerKey {
    Account { account_id: String },
    Trustline { account_id: String, asset: RawAsset },
    Offer { seller_id: String, offer_id: i64 },
    Data { account_id: String, data_name: String },
}
