//! Bulk document builder
//!
//! Produces every document of one ledger in a fixed emission order:
//! header, then each transaction followed by its operations, then balances
//! from operation metadata, then balances from fee history.

use tracing::debug;

use super::balance::BalanceExtractor;
use super::operation::decode_operations;
use crate::core::{IndexerResult, LedgerRecord};
use crate::domain::models::{
    BalanceSource, BulkBuffer, LedgerDocument, LedgerHeader, PagingToken, Transaction,
};

pub struct BulkMaker<'a> {
    record: &'a LedgerRecord,
}

impl<'a> BulkMaker<'a> {
    pub fn new(record: &'a LedgerRecord) -> Self {
        Self { record }
    }

    /// All documents of the ledger in emission order
    pub fn documents(&self) -> Vec<LedgerDocument> {
        let header = &self.record.header;
        let seq = header.ledger_seq;
        let close_time = header.close_time;

        let mut docs = vec![LedgerDocument::Ledger(LedgerHeader::new(
            header,
            &self.record.transactions,
        ))];

        for (index, row) in self.record.transactions.iter().enumerate() {
            let tx = Transaction::new(row, index, seq, close_time);
            let operations = decode_operations(&tx, row);
            docs.push(LedgerDocument::Transaction(tx));
            docs.extend(operations.into_iter().map(LedgerDocument::Operation));
        }

        for (tx_index, row) in self.record.transactions.iter().enumerate() {
            for (op_index, meta) in row.meta.operations().iter().enumerate() {
                let token = PagingToken::balance_from_meta(seq, tx_index, op_index);
                let balances =
                    BalanceExtractor::new(&meta.changes, close_time, BalanceSource::Meta, token)
                        .extract();
                docs.extend(balances.into_iter().map(LedgerDocument::Balance));
            }
        }

        for (fee_index, row) in self.record.fees.iter().enumerate() {
            let token = PagingToken::balance_from_fee(seq, fee_index);
            let balances =
                BalanceExtractor::new(&row.changes, close_time, BalanceSource::Fee, token)
                    .extract();
            docs.extend(balances.into_iter().map(LedgerDocument::Balance));
        }

        docs
    }

    /// Serialize every document of the ledger into `buffer`
    pub fn make(&self, buffer: &mut BulkBuffer) -> IndexerResult<()> {
        let docs = self.documents();
        for doc in &docs {
            buffer.push(doc)?;
        }

        debug!(
            seq = self.record.seq(),
            documents = docs.len(),
            "Built ledger documents"
        );
        Ok(())
    }
}

/// Build a fresh buffer holding one ledger
pub fn build_ledger(record: &LedgerRecord) -> IndexerResult<BulkBuffer> {
    let mut buffer = BulkBuffer::new();
    BulkMaker::new(record).make(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entries::AccountEntry;
    use crate::core::types::{OperationMeta, TransactionEnvelope, TransactionResultRow};
    use crate::core::{
        LedgerEntry, LedgerEntryChange, LedgerEntryData, LedgerHeaderRow, OperationBody,
        RawMemo, RawOperation, TransactionMeta, TxFeeHistoryRow, TxHistoryRow,
    };
    use crate::domain::models::Document;
    use chrono::{TimeZone, Utc};

    fn account_change(id: &str, balance: i64) -> LedgerEntryChange {
        LedgerEntryChange::Updated {
            entry: LedgerEntry {
                last_modified_ledger_seq: 7,
                data: LedgerEntryData::Account(AccountEntry {
                    account_id: id.to_string(),
                    balance,
                    seq_num: 1,
                    num_sub_entries: 0,
                    flags: 0,
                    home_domain: String::new(),
                }),
            },
        }
    }

    fn record() -> LedgerRecord {
        let tx = TxHistoryRow {
            id: "tx0".to_string(),
            envelope: TransactionEnvelope {
                source_account: "GA".to_string(),
                fee: 100,
                seq_num: 2,
                memo: RawMemo::None,
                operations: vec![RawOperation {
                    source_account: None,
                    body: OperationBody::Inflation,
                }],
            },
            result: TransactionResultRow {
                fee_charged: 100,
                code: 0,
                results: None,
            },
            meta: TransactionMeta::V1 {
                tx_changes: Vec::new(),
                operations: vec![OperationMeta {
                    changes: vec![account_change("GA", 10), account_change("GB", 20)],
                }],
            },
        };

        LedgerRecord {
            header: LedgerHeaderRow {
                ledger_seq: 7,
                hash: "h7".to_string(),
                prev_hash: "h6".to_string(),
                close_time: Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap(),
                ledger_version: 10,
                total_coins: 0,
                fee_pool: 0,
                inflation_seq: 0,
                id_pool: 0,
                base_fee: 100,
                base_reserve: 5_000_000,
                max_tx_set_size: 50,
            },
            transactions: vec![tx],
            fees: vec![TxFeeHistoryRow {
                tx_id: "tx0".to_string(),
                changes: vec![account_change("GA", 9)],
            }],
        }
    }

    #[test]
    fn emission_order() {
        let docs = BulkMaker::new(&record()).documents();
        let indexes: Vec<&str> = docs.iter().map(|d| d.index_name()).collect();
        assert_eq!(
            indexes,
            vec!["ledgers", "transactions", "operations", "balances", "balances", "balances"]
        );

        let tokens: Vec<PagingToken> = docs.iter().map(|d| d.paging_token()).collect();
        assert!(tokens.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn fee_balance_uses_sentinel_token() {
        let docs = BulkMaker::new(&record()).documents();
        match docs.last() {
            Some(LedgerDocument::Balance(balance)) => {
                assert_eq!(balance.source, BalanceSource::Fee);
                assert_eq!(balance.paging_token.to_string(), "00000000070000125500200001");
            }
            other => panic!("expected fee balance, got {:?}", other),
        }
    }

    #[test]
    fn build_is_deterministic() {
        let first = build_ledger(&record()).unwrap();
        let second = build_ledger(&record()).unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(first.documents(), 6);
    }
}
