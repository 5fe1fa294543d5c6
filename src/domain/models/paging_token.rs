//! Paging tokens: one lexically sortable key per document

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation order for records not tied to a specific operation
pub const NO_OPERATION: u8 = 255;

/// Auxiliary order of ledger headers, transactions and operations
pub const STRUCTURAL_AUX_ORDER: u8 = 0;

/// Auxiliary order of balances derived from operation metadata
pub const BALANCE_FROM_META_AUX_ORDER: u8 = 1;

/// Auxiliary order of balances derived from fee history
pub const BALANCE_FROM_FEE_AUX_ORDER: u8 = 2;

const LEDGER_WIDTH: usize = 10;
const TRANSACTION_WIDTH: usize = 5;
const OPERATION_WIDTH: usize = 3;
const AUX1_WIDTH: usize = 3;
const AUX2_WIDTH: usize = 5;
const TOKEN_WIDTH: usize =
    LEDGER_WIDTH + TRANSACTION_WIDTH + OPERATION_WIDTH + AUX1_WIDTH + AUX2_WIDTH;

/// Composite ordering key.
///
/// Field order is significant: the derived `Ord` and the rendered string
/// both compare ledger first, then transaction, operation and the two
/// auxiliary orders. Every field is rendered zero-padded to a fixed width,
/// so byte-lexical order of the strings equals tuple order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PagingToken {
    pub ledger_seq: u32,
    /// 1-based transaction position, 0 for the ledger header
    pub transaction_order: u16,
    /// 1-based operation position, 0 for the transaction itself,
    /// `NO_OPERATION` for fee records
    pub operation_order: u8,
    /// Synthesis path
    pub aux_order1: u8,
    /// 1-based position inside a change set, 0 for structural documents
    pub aux_order2: u16,
}

impl PagingToken {
    pub fn ledger(ledger_seq: u32) -> Self {
        Self {
            ledger_seq,
            ..Self::default()
        }
    }

    pub fn transaction(ledger_seq: u32, tx_index: usize) -> Self {
        Self {
            ledger_seq,
            transaction_order: transaction_order(tx_index),
            ..Self::default()
        }
    }

    pub fn operation(ledger_seq: u32, tx_index: usize, op_index: usize) -> Self {
        Self {
            ledger_seq,
            transaction_order: transaction_order(tx_index),
            operation_order: operation_order(op_index),
            ..Self::default()
        }
    }

    /// Base token for balances produced by an operation's metadata
    pub fn balance_from_meta(ledger_seq: u32, tx_index: usize, op_index: usize) -> Self {
        Self {
            aux_order1: BALANCE_FROM_META_AUX_ORDER,
            ..Self::operation(ledger_seq, tx_index, op_index)
        }
    }

    /// Base token for balances produced by a fee charge
    pub fn balance_from_fee(ledger_seq: u32, fee_index: usize) -> Self {
        Self {
            ledger_seq,
            transaction_order: transaction_order(fee_index),
            operation_order: NO_OPERATION,
            aux_order1: BALANCE_FROM_FEE_AUX_ORDER,
            aux_order2: 0,
        }
    }

    /// Same token, positioned at the 1-based `position` within a change set
    pub fn at_change(self, position: usize) -> Self {
        Self {
            aux_order2: u16::try_from(position).unwrap_or(u16::MAX),
            ..self
        }
    }
}

fn transaction_order(index: usize) -> u16 {
    u16::try_from(index + 1).unwrap_or(u16::MAX)
}

// Saturates below the sentinel so a real operation never reads as a fee record
fn operation_order(index: usize) -> u8 {
    u8::try_from(index + 1)
        .unwrap_or(NO_OPERATION - 1)
        .min(NO_OPERATION - 1)
}

impl fmt::Display for PagingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0lw$}{:0tw$}{:0ow$}{:0a1w$}{:0a2w$}",
            self.ledger_seq,
            self.transaction_order,
            self.operation_order,
            self.aux_order1,
            self.aux_order2,
            lw = LEDGER_WIDTH,
            tw = TRANSACTION_WIDTH,
            ow = OPERATION_WIDTH,
            a1w = AUX1_WIDTH,
            a2w = AUX2_WIDTH,
        )
    }
}

/// Error returned when a string is not a well-formed paging token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid paging token: {0}")]
pub struct InvalidPagingToken(pub String);

impl FromStr for PagingToken {
    type Err = InvalidPagingToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != TOKEN_WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPagingToken(s.to_string()));
        }

        let tx_start = LEDGER_WIDTH;
        let op_start = tx_start + TRANSACTION_WIDTH;
        let aux1_start = op_start + OPERATION_WIDTH;
        let aux2_start = aux1_start + AUX1_WIDTH;

        Ok(Self {
            ledger_seq: field(s, 0, LEDGER_WIDTH)?,
            transaction_order: field(s, tx_start, TRANSACTION_WIDTH)?,
            operation_order: field(s, op_start, OPERATION_WIDTH)?,
            aux_order1: field(s, aux1_start, AUX1_WIDTH)?,
            aux_order2: field(s, aux2_start, AUX2_WIDTH)?,
        })
    }
}

fn field<T: FromStr>(s: &str, start: usize, width: usize) -> Result<T, InvalidPagingToken> {
    s[start..start + width]
        .parse()
        .map_err(|_| InvalidPagingToken(s.to_string()))
}

impl From<PagingToken> for String {
    fn from(token: PagingToken) -> Self {
        token.to_string()
    }
}

impl TryFrom<String> for PagingToken {
    type Error = InvalidPagingToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fixed_width_fields() {
        let token = PagingToken::balance_from_meta(123, 0, 1).at_change(7);
        assert_eq!(token.to_string(), "00000001230000100200100007");
        assert_eq!(token.to_string().len(), TOKEN_WIDTH);
    }

    #[test]
    fn lexical_order_matches_tuple_order() {
        let tokens = vec![
            PagingToken::ledger(10),
            PagingToken::transaction(10, 0),
            PagingToken::operation(10, 0, 0),
            PagingToken::balance_from_meta(10, 0, 0).at_change(1),
            PagingToken::balance_from_meta(10, 0, 0).at_change(2),
            PagingToken::operation(10, 0, 1),
            PagingToken::balance_from_fee(10, 0).at_change(1),
            PagingToken::transaction(10, 1),
            PagingToken::transaction(10, 9),
            PagingToken::transaction(10, 10),
            PagingToken::ledger(11),
            PagingToken::ledger(100),
        ];

        for pair in tokens.windows(2) {
            assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
            assert!(pair[0].to_string() < pair[1].to_string());
        }
    }

    #[test]
    fn fee_and_meta_tokens_never_collide() {
        let mut meta = PagingToken::balance_from_meta(5, 2, 0);
        meta.operation_order = NO_OPERATION;
        let fee = PagingToken::balance_from_fee(5, 2);

        assert_eq!(
            (meta.ledger_seq, meta.transaction_order, meta.operation_order),
            (fee.ledger_seq, fee.transaction_order, fee.operation_order)
        );
        assert_ne!(meta.at_change(1).to_string(), fee.at_change(1).to_string());
    }

    #[test]
    fn operation_order_stays_below_sentinel() {
        let token = PagingToken::operation(1, 0, 10_000);
        assert_eq!(token.operation_order, NO_OPERATION - 1);
    }

    #[test]
    fn parses_rendered_token() {
        let token = PagingToken::balance_from_fee(4_000_000, 41).at_change(3);
        let parsed: PagingToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
        assert!("12345".parse::<PagingToken>().is_err());
        assert!("0000000123000010020010000x".parse::<PagingToken>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let token = PagingToken::transaction(2, 0);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"00000000020000100000000000\"");
        let back: PagingToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
