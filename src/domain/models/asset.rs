//! Value types shared by several documents

use serde::{Deserialize, Serialize};

use crate::core::{DecodeError, RawAsset, RawPrice};

pub const AUTH_REQUIRED_FLAG: u32 = 0x1;
pub const AUTH_REVOCABLE_FLAG: u32 = 0x2;
pub const AUTH_IMMUTABLE_FLAG: u32 = 0x4;

/// Index-ready asset. `key` is the canonical identity: `native`, or
/// `<code>-<issuer>` for credit assets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Asset {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub key: String,
}

impl Asset {
    pub fn native() -> Self {
        Self {
            code: "native".to_string(),
            issuer: None,
            key: "native".to_string(),
        }
    }

    pub fn credit(code: &str, issuer: &str) -> Self {
        Self {
            code: code.to_string(),
            issuer: Some(issuer.to_string()),
            key: format!("{}-{}", code, issuer),
        }
    }

    pub fn is_native(&self) -> bool {
        self.issuer.is_none()
    }
}

impl From<&RawAsset> for Asset {
    fn from(asset: &RawAsset) -> Self {
        match asset {
            RawAsset::Native => Asset::native(),
            RawAsset::CreditAlphanum4 { code, issuer }
            | RawAsset::CreditAlphanum12 { code, issuer } => Asset::credit(code, issuer),
        }
    }
}

/// Rational price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl Price {
    /// Decimal approximation of `n / d`
    pub fn approximate(&self) -> Result<f64, DecodeError> {
        if self.d == 0 {
            return Err(DecodeError::ZeroDenominator {
                n: self.n,
                d: self.d,
            });
        }
        Ok(f64::from(self.n) / f64::from(self.d))
    }
}

impl From<RawPrice> for Price {
    fn from(price: RawPrice) -> Self {
        Self {
            n: price.n,
            d: price.d,
        }
    }
}

/// Account thresholds; a field is present only if the change set it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<u32>,
}

impl Thresholds {
    pub fn is_empty(&self) -> bool {
        self.low.is_none() && self.medium.is_none() && self.high.is_none() && self.master.is_none()
    }
}

/// Account authorization flags decoded from a bitmask
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountFlags {
    pub required: bool,
    pub revocable: bool,
    pub immutable: bool,
}

impl AccountFlags {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            required: bits & AUTH_REQUIRED_FLAG != 0,
            revocable: bits & AUTH_REVOCABLE_FLAG != 0,
            immutable: bits & AUTH_IMMUTABLE_FLAG != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_keys() {
        assert_eq!(Asset::from(&RawAsset::Native).key, "native");
        let usd = Asset::from(&RawAsset::credit("USD", "GISSUER"));
        assert_eq!(usd.key, "USD-GISSUER");
        assert_eq!(usd.issuer.as_deref(), Some("GISSUER"));
        let long = Asset::from(&RawAsset::credit("LONGCODE", "GISSUER"));
        assert_eq!(long.key, "LONGCODE-GISSUER");
    }

    #[test]
    fn native_asset_omits_issuer() {
        let json = serde_json::to_value(Asset::native()).unwrap();
        assert_eq!(json, serde_json::json!({"code": "native", "key": "native"}));
    }

    #[test]
    fn price_approximation() {
        assert_eq!(Price { n: 1, d: 4 }.approximate(), Ok(0.25));
        assert_eq!(
            Price { n: 3, d: 0 }.approximate(),
            Err(DecodeError::ZeroDenominator { n: 3, d: 0 })
        );
    }

    #[test]
    fn flags_from_bits() {
        assert_eq!(AccountFlags::from_bits(0), AccountFlags::default());
        let flags = AccountFlags::from_bits(AUTH_REQUIRED_FLAG | AUTH_IMMUTABLE_FLAG);
        assert!(flags.required);
        assert!(!flags.revocable);
        assert!(flags.immutable);
    }

    #[test]
    fn empty_thresholds_serialize_as_empty_object() {
        let only_master = Thresholds {
            master: Some(2),
            ..Thresholds::default()
        };
        assert_eq!(
            serde_json::to_value(&only_master).unwrap(),
            serde_json::json!({"master": 2})
        );
        assert!(Thresholds::default().is_empty());
    }
}
