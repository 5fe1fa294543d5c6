//! Operation decoder
//!
//! Maps a raw operation onto the `Operation` document. Decoding is pure and
//! total: unknown kinds and malformed prices produce a partial document
//! instead of an error, so one odd operation never stops a ledger.

use tracing::{debug, warn};

use crate::core::operations::{
    AccountMergeOp, AllowTrustOp, BumpSequenceOp, ChangeTrustOp, CreateAccountOp,
    CreatePassiveOfferOp, ManageDataOp, ManageOfferOp, PathPaymentOp, PaymentOp, SetOptionsOp,
};
use crate::core::{OperationBody, RawOperation, RawOperationResult, RawPrice, TxHistoryRow};
use crate::domain::models::{AccountFlags, Asset, Operation, Price, Thresholds, Transaction};

/// Outer operation result code meaning the operation was applied
pub const OP_INNER: i32 = 0;

/// Build the document for operation `index` of `tx`
pub fn decode_operation(tx: &Transaction, raw: &RawOperation, index: usize) -> Operation {
    let mut op = Operation::envelope(tx, raw.body.kind(), raw.source_account.as_deref(), index);

    match &raw.body {
        OperationBody::CreateAccount(body) => create_account(body, &mut op),
        OperationBody::Payment(body) => payment(body, &mut op),
        OperationBody::PathPayment(body) => path_payment(body, &mut op),
        OperationBody::ManageOffer(body) => manage_offer(body, &mut op),
        OperationBody::CreatePassiveOffer(body) => create_passive_offer(body, &mut op),
        OperationBody::SetOptions(body) => set_options(body, &mut op),
        OperationBody::ChangeTrust(body) => change_trust(body, &mut op),
        OperationBody::AllowTrust(body) => allow_trust(body, &mut op),
        OperationBody::AccountMerge(body) => account_merge(body, &mut op),
        OperationBody::ManageData(body) => manage_data(body, &mut op),
        OperationBody::BumpSequence(body) => bump_sequence(body, &mut op),
        OperationBody::Inflation => {}
        OperationBody::Unknown => {
            warn!(order = %op.order, "Unknown operation kind, indexing envelope only");
        }
    }

    op
}

/// Merge an operation result into an already decoded operation
pub fn append_result(op: &mut Operation, result: &RawOperationResult) {
    op.result_code = result.inner_code.unwrap_or(result.code);
    op.successful = result.code == OP_INNER && result.inner_code.map_or(true, |code| code == 0);
}

/// Decode every operation of a transaction and merge its results.
///
/// Results are applied only to indices present in both the operation list
/// and the result list.
pub fn decode_operations(tx: &Transaction, row: &TxHistoryRow) -> Vec<Operation> {
    let operations = &row.envelope.operations;
    let mut decoded: Vec<Operation> = operations
        .iter()
        .enumerate()
        .map(|(index, raw)| decode_operation(tx, raw, index))
        .collect();

    if let Some(results) = &row.result.results {
        if results.len() != operations.len() {
            debug!(
                tx = %tx.order,
                operations = operations.len(),
                results = results.len(),
                "Operation/result count mismatch"
            );
        }

        for (op, result) in decoded.iter_mut().zip(results.iter()) {
            append_result(op, result);
        }
    }

    decoded
}

fn create_account(body: &CreateAccountOp, op: &mut Operation) {
    op.source_amount = Some(body.starting_balance);
    op.destination_account_id = Some(body.destination.clone());
}

fn payment(body: &PaymentOp, op: &mut Operation) {
    op.source_amount = Some(body.amount);
    op.source_asset = Some(Asset::from(&body.asset));
    op.destination_account_id = Some(body.destination.clone());
}

fn path_payment(body: &PathPaymentOp, op: &mut Operation) {
    op.destination_account_id = Some(body.destination.clone());
    op.destination_amount = Some(body.dest_amount);
    op.destination_asset = Some(Asset::from(&body.dest_asset));

    op.source_amount = Some(body.send_max);
    op.source_asset = Some(Asset::from(&body.send_asset));

    op.path = Some(body.path.iter().map(Asset::from).collect());
}

fn manage_offer(body: &ManageOfferOp, op: &mut Operation) {
    op.source_amount = Some(body.amount);
    op.source_asset = Some(Asset::from(&body.buying));
    op.destination_asset = Some(Asset::from(&body.selling));
    op.offer_id = Some(body.offer_id);
    offer_price(body.price, op);
}

fn create_passive_offer(body: &CreatePassiveOfferOp, op: &mut Operation) {
    op.source_amount = Some(body.amount);
    op.source_asset = Some(Asset::from(&body.buying));
    op.destination_asset = Some(Asset::from(&body.selling));
    offer_price(body.price, op);
}

fn offer_price(raw: RawPrice, op: &mut Operation) {
    let price = Price::from(raw);
    op.offer_price_n_d = Some(price);

    match price.approximate() {
        Ok(value) => op.offer_price = Some(value),
        Err(e) => warn!(order = %op.order, "Offer price not indexed: {}", e),
    }
}

fn set_options(body: &SetOptionsOp, op: &mut Operation) {
    op.inflation_dest = body.inflation_dest.clone();
    op.home_domain = body.home_domain.clone();

    let thresholds = Thresholds {
        low: body.low_threshold,
        medium: body.med_threshold,
        high: body.high_threshold,
        master: body.master_weight,
    };
    if !thresholds.is_empty() {
        op.thresholds = Some(thresholds);
    }

    op.set_flags = body.set_flags.map(AccountFlags::from_bits);
    op.clear_flags = body.clear_flags.map(AccountFlags::from_bits);
}

fn change_trust(body: &ChangeTrustOp, op: &mut Operation) {
    op.source_asset = Some(Asset::from(&body.line));
    op.trust_limit = Some(body.limit);
}

fn allow_trust(body: &AllowTrustOp, op: &mut Operation) {
    op.destination_account_id = Some(body.trustor.clone());
    op.source_asset = Some(Asset::credit(&body.asset_code, &op.source_account_id));
    op.authorize = Some(body.authorize);
}

fn account_merge(body: &AccountMergeOp, op: &mut Operation) {
    op.destination_account_id = Some(body.destination.clone());
}

fn manage_data(body: &ManageDataOp, op: &mut Operation) {
    op.data_name = Some(body.data_name.clone());
    op.data_value = body.data_value.clone();
}

fn bump_sequence(body: &BumpSequenceOp, op: &mut Operation) {
    op.bump_to = Some(body.bump_to);
}
