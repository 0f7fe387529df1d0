//! Transaction records in `Key=Value` line form.
//!
//! ```text
//! TxHash=<hex> Gas=<int> FeePerGas=<float> Signature=<hex>
//! ```
//!
//! Records are ranked by total fee, `FeePerGas × Gas`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use mempool_collections::PriorityItem;

use crate::error::ParseError;

/// Key of the transaction hash field.
pub const KEY_HASH: &str = "TxHash";
/// Key of the gas amount field.
pub const KEY_GAS: &str = "Gas";
/// Key of the per-gas fee field.
pub const KEY_FEE: &str = "FeePerGas";
/// Key of the signature field.
pub const KEY_SIGNATURE: &str = "Signature";

/// A pending transaction.
///
/// `fee_per_gas` keeps the text exactly as it was read so that writing the
/// record back never changes its digits; the parsed value is cached
/// alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Transaction hash.
    pub hash: String,
    /// Gas amount.
    pub gas: i64,
    /// Per-gas fee, verbatim from the input.
    pub fee_per_gas: String,
    /// Signature.
    pub signature: String,

    fee_per_gas_value: f64,
    total_fee: f64,
}

impl Transaction {
    /// Builds a transaction, parsing `fee_per_gas` for ranking.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] if `fee_per_gas` is not a number.
    pub fn new(
        hash: impl Into<String>,
        gas: i64,
        fee_per_gas: impl Into<String>,
        signature: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let fee_per_gas = fee_per_gas.into();
        let fee_per_gas_value = parse_fee(&fee_per_gas)?;
        Ok(Self::with_fee_value(
            hash.into(),
            gas,
            fee_per_gas,
            fee_per_gas_value,
            signature.into(),
        ))
    }

    fn with_fee_value(
        hash: String,
        gas: i64,
        fee_per_gas: String,
        fee_per_gas_value: f64,
        signature: String,
    ) -> Self {
        Self {
            hash,
            gas,
            fee_per_gas,
            signature,
            fee_per_gas_value,
            total_fee: fee_per_gas_value * gas as f64,
        }
    }

    /// Parsed per-gas fee.
    #[inline]
    pub fn fee_per_gas_value(&self) -> f64 {
        self.fee_per_gas_value
    }

    /// Total fee, `FeePerGas × Gas`.
    #[inline]
    pub fn fee(&self) -> f64 {
        self.total_fee
    }
}

impl PriorityItem for Transaction {
    #[inline]
    fn priority(&self) -> f64 {
        self.total_fee
    }
}

impl FromStr for Transaction {
    type Err = ParseError;

    /// Parses one line of whitespace-separated `Key=Value` tokens.
    ///
    /// Token order does not matter, unknown keys are ignored and a repeated
    /// key keeps its last value.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = HashMap::new();
        for token in line.split_whitespace() {
            let mut parts = token.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => {
                    tokens.insert(key, value);
                }
                _ => return Err(ParseError::InvalidToken(token.to_owned())),
            }
        }

        let field = |key: &'static str| {
            tokens
                .get(key)
                .copied()
                .ok_or_else(|| ParseError::FieldNotFound {
                    field: key,
                    line: line.to_owned(),
                })
        };

        let hash = field(KEY_HASH)?;

        let gas = field(KEY_GAS)?;
        let gas = i64::from_str(gas).map_err(|_| ParseError::InvalidValue {
            field: KEY_GAS,
            value: gas.to_owned(),
        })?;

        let fee_per_gas = field(KEY_FEE)?;
        let fee_per_gas_value = parse_fee(fee_per_gas)?;

        let signature = field(KEY_SIGNATURE)?;

        Ok(Transaction::with_fee_value(
            hash.to_owned(),
            gas,
            fee_per_gas.to_owned(),
            fee_per_gas_value,
            signature.to_owned(),
        ))
    }
}

fn parse_fee(text: &str) -> Result<f64, ParseError> {
    f64::from_str(text).map_err(|_| ParseError::InvalidValue {
        field: KEY_FEE,
        value: text.to_owned(),
    })
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{KEY_HASH}={} {KEY_GAS}={} {KEY_FEE}={} {KEY_SIGNATURE}={}",
            self.hash, self.gas, self.fee_per_gas, self.signature
        )
    }
}
