//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ledger_indexer::core::entries::{AccountEntry, TrustLineEntry};
use ledger_indexer::core::operations::{
    CreateAccountOp, ManageOfferOp, PaymentOp,
};
use ledger_indexer::core::types::{OperationMeta, TransactionEnvelope, TransactionResultRow};
use ledger_indexer::core::{
    IndexCatalog, IndexSink, IndexStats, IndexerResult, LedgerBounds, LedgerEntry,
    LedgerEntryChange, LedgerEntryData, LedgerHeaderRow, LedgerRecord, LedgerSource,
    LedgerStream, OperationBody, RawAsset, RawMemo, RawOperation, RawOperationResult, RawPrice,
    SinkError, TransactionMeta, TxFeeHistoryRow, TxHistoryRow,
};
use ledger_indexer::domain::models::BulkBuffer;

pub const ALICE: &str = "GALICE";
pub const BOB: &str = "GBOB";
pub const ISSUER: &str = "GISSUER";

pub fn close_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 6, 1, 12, 0, 0).unwrap()
}

pub fn header(seq: u32) -> LedgerHeaderRow {
    LedgerHeaderRow {
        ledger_seq: seq,
        hash: format!("hash-{}", seq),
        prev_hash: format!("hash-{}", seq.saturating_sub(1)),
        close_time: close_time(),
        ledger_version: 10,
        total_coins: 1_000_000_000,
        fee_pool: 1_000,
        inflation_seq: 1,
        id_pool: 42,
        base_fee: 100,
        base_reserve: 5_000_000,
        max_tx_set_size: 100,
    }
}

pub fn account_entry(account_id: &str, balance: i64) -> LedgerEntry {
    LedgerEntry {
        last_modified_ledger_seq: 1,
        data: LedgerEntryData::Account(AccountEntry {
            account_id: account_id.to_string(),
            balance,
            seq_num: 1,
            num_sub_entries: 0,
            flags: 0,
            home_domain: String::new(),
        }),
    }
}

pub fn trustline_entry(account_id: &str, code: &str, balance: i64) -> LedgerEntry {
    LedgerEntry {
        last_modified_ledger_seq: 1,
        data: LedgerEntryData::Trustline(TrustLineEntry {
            account_id: account_id.to_string(),
            asset: RawAsset::credit(code, ISSUER),
            balance,
            limit: i64::MAX,
            flags: 1,
        }),
    }
}

/// State snapshot followed by the updated entry
pub fn balance_change(before: LedgerEntry, after: LedgerEntry) -> Vec<LedgerEntryChange> {
    vec![
        LedgerEntryChange::State { entry: before },
        LedgerEntryChange::Updated { entry: after },
    ]
}

pub fn op(body: OperationBody) -> RawOperation {
    RawOperation {
        source_account: None,
        body,
    }
}

pub fn tx_row(
    id: &str,
    source: &str,
    operations: Vec<RawOperation>,
    op_changes: Vec<Vec<LedgerEntryChange>>,
) -> TxHistoryRow {
    let results = operations
        .iter()
        .map(|_| RawOperationResult {
            code: 0,
            inner_code: Some(0),
        })
        .collect();

    TxHistoryRow {
        id: id.to_string(),
        envelope: TransactionEnvelope {
            source_account: source.to_string(),
            fee: 200,
            seq_num: 100,
            memo: RawMemo::Text("thanks".to_string()),
            operations,
        },
        result: TransactionResultRow {
            fee_charged: 100,
            code: 0,
            results: Some(results),
        },
        meta: TransactionMeta::V1 {
            tx_changes: Vec::new(),
            operations: op_changes
                .into_iter()
                .map(|changes| OperationMeta { changes })
                .collect(),
        },
    }
}

pub fn fee_row(tx_id: &str, account_id: &str, before: i64, after: i64) -> TxFeeHistoryRow {
    TxFeeHistoryRow {
        tx_id: tx_id.to_string(),
        changes: balance_change(account_entry(account_id, before), account_entry(account_id, after)),
    }
}

/// Two transactions: a payment plus an account creation, then an offer
pub fn sample_ledger(seq: u32) -> LedgerRecord {
    let payment = op(OperationBody::Payment(PaymentOp {
        destination: BOB.to_string(),
        asset: RawAsset::credit("USD", ISSUER),
        amount: 500,
    }));
    let create = op(OperationBody::CreateAccount(CreateAccountOp {
        destination: "GCAROL".to_string(),
        starting_balance: 20_000_000,
    }));
    let offer = op(OperationBody::ManageOffer(ManageOfferOp {
        selling: RawAsset::Native,
        buying: RawAsset::credit("USD", ISSUER),
        amount: 1_000,
        price: RawPrice { n: 3, d: 2 },
        offer_id: 0,
    }));

    let first = tx_row(
        "tx-a",
        ALICE,
        vec![payment, create],
        vec![
            [
                balance_change(trustline_entry(ALICE, "USD", 1_000), trustline_entry(ALICE, "USD", 500)),
                balance_change(trustline_entry(BOB, "USD", 0), trustline_entry(BOB, "USD", 500)),
            ]
            .concat(),
            vec![
                LedgerEntryChange::Created {
                    entry: account_entry("GCAROL", 20_000_000),
                },
                LedgerEntryChange::State {
                    entry: account_entry(ALICE, 100_000_000),
                },
                LedgerEntryChange::Updated {
                    entry: account_entry(ALICE, 80_000_000),
                },
            ],
        ],
    );
    let second = tx_row("tx-b", BOB, vec![offer], vec![Vec::new()]);

    LedgerRecord {
        header: header(seq),
        transactions: vec![first, second],
        fees: vec![
            fee_row("tx-a", ALICE, 100_000_100, 100_000_000),
            fee_row("tx-b", BOB, 50_000_100, 50_000_000),
        ],
    }
}

pub fn empty_ledger(seq: u32) -> LedgerRecord {
    LedgerRecord {
        header: header(seq),
        transactions: Vec::new(),
        fees: Vec::new(),
    }
}

/// Sink recording every submitted body, optionally rejecting all of them
#[derive(Default)]
pub struct StubSink {
    pub submissions: Mutex<Vec<String>>,
    pub failing: bool,
}

impl StubSink {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<String> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexSink for StubSink {
    async fn bulk_insert(&self, bulk: &BulkBuffer) -> IndexerResult<()> {
        self.submissions.lock().unwrap().push(bulk.as_str().to_string());
        if self.failing {
            return Err(SinkError::Rejected { status: 503 }.into());
        }
        Ok(())
    }
}

/// Source serving a fixed list of records. `stream_range` ignores the
/// requested range, like a misaligned upstream.
pub struct VecSource {
    pub records: Vec<LedgerRecord>,
    pub range_calls: AtomicUsize,
}

impl VecSource {
    pub fn new(records: Vec<LedgerRecord>) -> Self {
        Self {
            records,
            range_calls: AtomicUsize::new(0),
        }
    }

    pub fn range_calls(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSource for VecSource {
    async fn stream_range(&self, _start: u32, _end: u32) -> IndexerResult<LedgerStream> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        let items: Vec<IndexerResult<LedgerRecord>> =
            self.records.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn subscribe(&self, _start: Option<u32>) -> IndexerResult<LedgerStream> {
        let items: Vec<IndexerResult<LedgerRecord>> =
            self.records.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn ledger_bounds(&self) -> IndexerResult<Option<LedgerBounds>> {
        let first = self.records.iter().map(LedgerRecord::seq).min();
        let last = self.records.iter().map(LedgerRecord::seq).max();
        Ok(first.zip(last).map(|(first, last)| LedgerBounds { first, last }))
    }
}

/// Catalog over a fixed set of indexed sequences
pub struct StubCatalog {
    pub seqs: Vec<u32>,
}

#[async_trait]
impl IndexCatalog for StubCatalog {
    async fn create_indexes(&self, _force: bool) -> IndexerResult<()> {
        Ok(())
    }

    async fn ledger_stats(&self) -> IndexerResult<IndexStats> {
        Ok(IndexStats {
            count: self.seqs.len() as u64,
            min_seq: self.seqs.iter().copied().min(),
            max_seq: self.seqs.iter().copied().max(),
        })
    }

    async fn indexed_ledger_seqs(&self, from: u32, to: u32) -> IndexerResult<Vec<u32>> {
        let mut seqs: Vec<u32> = self
            .seqs
            .iter()
            .copied()
            .filter(|seq| *seq >= from && *seq <= to)
            .collect();
        seqs.sort_unstable();
        Ok(seqs)
    }
}
