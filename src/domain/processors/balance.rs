//! Balance extraction from ledger entry changes

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::core::{LedgerEntry, LedgerEntryChange, LedgerEntryData, LedgerKey};
use crate::domain::models::{Asset, Balance, BalanceSource, PagingToken};

/// Turns one change set into balance documents.
///
/// A change set is the ordered list of changes caused by a single operation
/// or a single fee charge. Each created or updated account/trustline entry
/// yields one balance; `state` snapshots only feed the diff of the update
/// that follows them.
pub struct BalanceExtractor<'a> {
    changes: &'a [LedgerEntryChange],
    close_time: DateTime<Utc>,
    source: BalanceSource,
    paging_token: PagingToken,
}

impl<'a> BalanceExtractor<'a> {
    pub fn new(
        changes: &'a [LedgerEntryChange],
        close_time: DateTime<Utc>,
        source: BalanceSource,
        paging_token: PagingToken,
    ) -> Self {
        Self {
            changes,
            close_time,
            source,
            paging_token,
        }
    }

    pub fn extract(&self) -> Vec<Balance> {
        let mut prior: HashMap<LedgerKey, i64> = HashMap::new();
        let mut balances = Vec::new();

        for (index, change) in self.changes.iter().enumerate() {
            let position = index + 1;

            match change {
                LedgerEntryChange::State { entry } => {
                    if let Some((_, _, value)) = balance_of(entry) {
                        prior.insert(entry.data.key(), value);
                    }
                }
                LedgerEntryChange::Created { entry } => {
                    if let Some((account_id, asset, value)) = balance_of(entry) {
                        balances.push(self.balance(account_id, asset, value, Some(value), position));
                    }
                }
                LedgerEntryChange::Updated { entry } => {
                    if let Some((account_id, asset, value)) = balance_of(entry) {
                        let diff = prior
                            .remove(&entry.data.key())
                            .and_then(|before| value.checked_sub(before));
                        balances.push(self.balance(account_id, asset, value, diff, position));
                    }
                }
                LedgerEntryChange::Removed { .. } => {}
            }
        }

        balances
    }

    fn balance(
        &self,
        account_id: &str,
        asset: Asset,
        balance: i64,
        diff: Option<i64>,
        position: usize,
    ) -> Balance {
        Balance {
            account_id: account_id.to_string(),
            balance,
            diff,
            asset,
            source: self.source,
            created_at: self.close_time,
            paging_token: self.paging_token.at_change(position),
        }
    }
}

fn balance_of(entry: &LedgerEntry) -> Option<(&str, Asset, i64)> {
    match &entry.data {
        LedgerEntryData::Account(account) => {
            Some((account.account_id.as_str(), Asset::native(), account.balance))
        }
        LedgerEntryData::Trustline(line) => Some((
            line.account_id.as_str(),
            Asset::from(&line.asset),
            line.balance,
        )),
        LedgerEntryData::Offer(_) | LedgerEntryData::Data(_) => None,
    }
}
