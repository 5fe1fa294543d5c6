//! Raw operations, tagged by kind

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{RawAsset, RawPrice};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawOperation {
    /// Overrides the transaction source account when set
    #[serde(default)]
    pub source_account: Option<String>,
    pub body: OperationBody,
}

/// Operation payload. Kinds introduced by later protocol versions decode
/// as `Unknown` instead of failing the whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    PathPayment(PathPaymentOp),
    ManageOffer(ManageOfferOp),
    CreatePassiveOffer(CreatePassiveOfferOp),
    SetOptions(SetOptionsOp),
    ChangeTrust(ChangeTrustOp),
    AllowTrust(AllowTrustOp),
    AccountMerge(AccountMergeOp),
    Inflation,
    ManageData(ManageDataOp),
    BumpSequence(BumpSequenceOp),
    #[serde(other)]
    Unknown,
}

impl OperationBody {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationBody::CreateAccount(_) => OperationKind::CreateAccount,
            OperationBody::Payment(_) => OperationKind::Payment,
            OperationBody::PathPayment(_) => OperationKind::PathPayment,
            OperationBody::ManageOffer(_) => OperationKind::ManageOffer,
            OperationBody::CreatePassiveOffer(_) => OperationKind::CreatePassiveOffer,
            OperationBody::SetOptions(_) => OperationKind::SetOptions,
            OperationBody::ChangeTrust(_) => OperationKind::ChangeTrust,
            OperationBody::AllowTrust(_) => OperationKind::AllowTrust,
            OperationBody::AccountMerge(_) => OperationKind::AccountMerge,
            OperationBody::Inflation => OperationKind::Inflation,
            OperationBody::ManageData(_) => OperationKind::ManageData,
            OperationBody::BumpSequence(_) => OperationKind::BumpSequence,
            OperationBody::Unknown => OperationKind::Unknown,
        }
    }
}

/// Operation kind tag as stored in the index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreateAccount,
    Payment,
    PathPayment,
    ManageOffer,
    CreatePassiveOffer,
    SetOptions,
    ChangeTrust,
    AllowTrust,
    AccountMerge,
    Inflation,
    ManageData,
    BumpSequence,
    Unknown,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CreateAccount => "create_account",
            OperationKind::Payment => "payment",
            OperationKind::PathPayment => "path_payment",
            OperationKind::ManageOffer => "manage_offer",
            OperationKind::CreatePassiveOffer => "create_passive_offer",
            OperationKind::SetOptions => "set_options",
            OperationKind::ChangeTrust => "change_trust",
            OperationKind::AllowTrust => "allow_trust",
            OperationKind::AccountMerge => "account_merge",
            OperationKind::Inflation => "inflation",
            OperationKind::ManageData => "manage_data",
            OperationKind::BumpSequence => "bump_sequence",
            OperationKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateAccountOp {
    pub destination: String,
    pub starting_balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentOp {
    pub destination: String,
    pub asset: RawAsset,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathPaymentOp {
    pub send_asset: RawAsset,
    pub send_max: i64,
    pub destination: String,
    pub dest_asset: RawAsset,
    pub dest_amount: i64,
    #[serde(default)]
    pub path: Vec<RawAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManageOfferOp {
    pub selling: RawAsset,
    pub buying: RawAsset,
    pub amount: i64,
    pub price: RawPrice,
    #[serde(default)]
    pub offer_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePassiveOfferOp {
    pub selling: RawAsset,
    pub buying: RawAsset,
    pub amount: i64,
    pub price: RawPrice,
}

/// Every field is optional: only the ones the submitter set are present
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SetOptionsOp {
    #[serde(default)]
    pub inflation_dest: Option<String>,
    #[serde(default)]
    pub clear_flags: Option<u32>,
    #[serde(default)]
    pub set_flags: Option<u32>,
    #[serde(default)]
    pub master_weight: Option<u32>,
    #[serde(default)]
    pub low_threshold: Option<u32>,
    #[serde(default)]
    pub med_threshold: Option<u32>,
    #[serde(default)]
    pub high_threshold: Option<u32>,
    #[serde(default)]
    pub home_domain: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeTrustOp {
    pub line: RawAsset,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllowTrustOp {
    pub trustor: String,
    pub asset_code: String,
    pub authorize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountMergeOp {
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManageDataOp {
    pub data_name: String,
    #[serde(default)]
    pub data_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BumpSequenceOp {
    pub bump_to: i64,
}
