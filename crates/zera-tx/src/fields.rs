//! Caller-input decoding with field names attached to every failure.

use crate::TxError;
use num_bigint::BigUint;
use prost_types::Timestamp;
use std::time::SystemTime;
use zera_types::amount::{self, Policy};
use zera_types::{base58, Decimal, Scale};

pub(crate) fn address(field: &str, text: &str) -> Result<Vec<u8>, TxError> {
    base58::decode_address(text).map_err(|e| TxError::invalid(field, e))
}

pub(crate) fn decimal(field: &str, text: &str) -> Result<Decimal, TxError> {
    Decimal::parse(text).map_err(|e| TxError::amount(field, e))
}

/// Decimal text in whole units to parts of `scale`.
pub(crate) fn parts(field: &str, text: &str, scale: &Scale, policy: Policy) -> Result<BigUint, TxError> {
    amount::parse_to_parts(text, scale, policy).map_err(|e| TxError::amount(field, e))
}

/// Percentage text (0-100) to its fixed-point form at `10^exp`.
pub(crate) fn percent(field: &str, text: &str, exp: u32, policy: Policy) -> Result<BigUint, TxError> {
    let value = decimal(field, text)?;
    amount::percent_to_scaled(&value, exp, policy).map_err(|e| TxError::amount(field, e))
}

pub(crate) fn percent_u32(field: &str, text: &str, exp: u32, policy: Policy) -> Result<u32, TxError> {
    let scaled = percent(field, text, exp, policy)?;
    amount::to_u32(&scaled).map_err(|e| TxError::amount(field, e))
}

/// Unbounded decimal (rates, currency equivalents) at `10^exp`.
pub(crate) fn scaled(field: &str, text: &str, exp: u32, policy: Policy) -> Result<BigUint, TxError> {
    parts(field, text, &Scale::pow10(exp), policy)
}

/// A non-negative integer written as decimal text.
pub(crate) fn integer(field: &str, text: &str) -> Result<BigUint, TxError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TxError::invalid(field, format!("{:?} is not a non-negative integer", text)));
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or_else(|| TxError::invalid(field, format!("{:?} is not a non-negative integer", text)))
}

pub(crate) fn hex_bytes(field: &str, text: &str) -> Result<Vec<u8>, TxError> {
    hex::decode(text).map_err(|e| TxError::invalid(field, e))
}

pub(crate) fn required<'a>(field: &str, text: &'a str) -> Result<&'a str, TxError> {
    if text.is_empty() {
        return Err(TxError::invalid(field, "is required"));
    }
    Ok(text)
}

/// Whole-second timestamp; negative values clamp to the epoch.
pub(crate) fn unix_timestamp(seconds: i64) -> Timestamp {
    Timestamp {
        seconds: seconds.max(0),
        nanos: 0,
    }
}

pub(crate) fn now() -> Timestamp {
    Timestamp::from(SystemTime::now())
}
