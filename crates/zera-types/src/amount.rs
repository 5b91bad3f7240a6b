//! Fixed-point conversion between human decimal amounts and integer parts.
//!
//! Every monetary, fee, percentage and supply field on the wire is an integer
//! count of parts. Callers supply decimal text; this module multiplies it by
//! a scale using exact big-integer arithmetic (never floating point) and
//! either truncates the sub-part remainder or rejects it, depending on the
//! [`Policy`].

use crate::constants::{MAX_PERCENT, NATIVE_PARTS};
use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid decimal amount {0:?}")]
    InvalidDecimal(String),

    #[error("negative amount {0:?} not allowed")]
    Negative(String),

    #[error("scale must be at least 1, got {0}")]
    InvalidScale(String),

    #[error("{value} has more precision than supported (max {max_precision} decimal places)")]
    PrecisionLoss { value: String, max_precision: usize },

    #[error("{value} is out of range (0-{max})")]
    OutOfRange { value: String, max: u32 },

    #[error("{value} does not fit in {target}")]
    Overflow { value: String, target: &'static str },
}

/// Conversion policy for the sub-part remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Fail with [`AmountError::PrecisionLoss`] when a remainder would be dropped.
    Exact,
    /// Silently truncate toward zero.
    Truncate,
}

// =============================================================================
// Decimal
// =============================================================================

/// Non-negative decimal value, stored as `mantissa / 10^frac_digits`.
///
/// Always normalized (no trailing fractional zeros), so structural equality
/// is numeric equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigUint,
    frac_digits: u32,
}

impl Decimal {
    pub fn zero() -> Self {
        Self {
            mantissa: BigUint::ZERO,
            frac_digits: 0,
        }
    }

    /// Build from a mantissa and number of fractional digits.
    pub fn new(mantissa: BigUint, frac_digits: u32) -> Self {
        let mut d = Self {
            mantissa,
            frac_digits,
        };
        d.normalize();
        d
    }

    /// Parse decimal text such as `"1.23456"`, `"42"` or `".5"`.
    ///
    /// Signs, exponents, whitespace and empty input are rejected.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        if text.starts_with('-') {
            return Err(AmountError::Negative(text.to_string()));
        }
        let invalid = || AmountError::InvalidDecimal(text.to_string());

        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{whole}{frac}");
        let mantissa = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let frac_digits = u32::try_from(frac.len()).map_err(|_| invalid())?;
        Ok(Self::new(mantissa, frac_digits))
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == BigUint::ZERO
    }

    /// Number of significant fractional digits.
    pub fn frac_digits(&self) -> u32 {
        self.frac_digits
    }

    fn normalize(&mut self) {
        let ten = BigUint::from(10u32);
        while self.frac_digits > 0 && (&self.mantissa % &ten) == BigUint::ZERO {
            self.mantissa /= &ten;
            self.frac_digits -= 1;
        }
        if self.mantissa == BigUint::ZERO {
            self.frac_digits = 0;
        }
    }

    /// True when the value is greater than `bound`.
    fn exceeds(&self, bound: u32) -> bool {
        self.mantissa > BigUint::from(bound) * pow10(self.frac_digits)
    }
}

impl FromStr for Decimal {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self::new(BigUint::from(value), 0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_str_radix(10);
        let frac = self.frac_digits as usize;
        if frac == 0 {
            return f.write_str(&digits);
        }
        let padded = if digits.len() <= frac {
            format!("{}{}", "0".repeat(frac - digits.len() + 1), digits)
        } else {
            digits
        };
        let (whole, fraction) = padded.split_at(padded.len() - frac);
        write!(f, "{whole}.{fraction}")
    }
}

// =============================================================================
// Scale
// =============================================================================

/// Parts per whole unit of an asset. Always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scale(BigUint);

impl Scale {
    pub fn new(parts: BigUint) -> Result<Self, AmountError> {
        if parts == BigUint::ZERO {
            return Err(AmountError::InvalidScale(parts.to_string()));
        }
        Ok(Self(parts))
    }

    /// Scale of the native coin.
    pub fn native() -> Self {
        Self(BigUint::from(NATIVE_PARTS))
    }

    /// Scale of `10^exp`, used by the universal percentage and rate fields.
    pub fn pow10(exp: u32) -> Self {
        Self(pow10(exp))
    }

    /// Parse a decimal integer such as `"1000000000"`.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let parts = BigUint::parse_bytes(text.trim().as_bytes(), 10)
            .ok_or_else(|| AmountError::InvalidScale(text.to_string()))?;
        Self::new(parts)
    }

    pub fn parts(&self) -> &BigUint {
        &self.0
    }

    /// Maximum number of decimal places this scale can represent.
    pub fn max_precision(&self) -> usize {
        self.0.to_str_radix(10).len() - 1
    }
}

impl TryFrom<u64> for Scale {
    type Error = AmountError;

    fn try_from(parts: u64) -> Result<Self, Self::Error> {
        Self::new(BigUint::from(parts))
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

// =============================================================================
// Conversion
// =============================================================================

/// Convert a decimal amount into parts: `amount * scale`, truncated toward zero.
///
/// Under [`Policy::Exact`] a non-zero remainder fails with
/// [`AmountError::PrecisionLoss`].
pub fn to_parts(amount: &Decimal, scale: &Scale, policy: Policy) -> Result<BigUint, AmountError> {
    if amount.is_zero() {
        return Ok(BigUint::ZERO);
    }
    let product = &amount.mantissa * scale.parts();
    let divisor = pow10(amount.frac_digits);
    let parts = &product / &divisor;

    if policy == Policy::Exact && (&product % &divisor) != BigUint::ZERO {
        return Err(AmountError::PrecisionLoss {
            value: amount.to_string(),
            max_precision: scale.max_precision(),
        });
    }
    Ok(parts)
}

/// Convert decimal text into parts.
pub fn parse_to_parts(text: &str, scale: &Scale, policy: Policy) -> Result<BigUint, AmountError> {
    to_parts(&Decimal::parse(text)?, scale, policy)
}

/// Convert a percentage (0-100) into its fixed-point form at `10^exp`.
pub fn percent_to_scaled(percent: &Decimal, exp: u32, policy: Policy) -> Result<BigUint, AmountError> {
    if percent.exceeds(MAX_PERCENT) {
        return Err(AmountError::OutOfRange {
            value: percent.to_string(),
            max: MAX_PERCENT,
        });
    }
    to_parts(percent, &Scale::pow10(exp), policy)
}

/// Convert parts back into a decimal amount.
///
/// Exact for power-of-ten scales; other scales are truncated at
/// `max_precision` digits.
pub fn from_parts(parts: &BigUint, scale: &Scale) -> Decimal {
    let digits = scale.max_precision() as u32;
    let mantissa = parts * pow10(digits) / scale.parts();
    Decimal::new(mantissa, digits)
}

/// Narrow a part count to `u32`.
pub fn to_u32(value: &BigUint) -> Result<u32, AmountError> {
    u32::try_from(value).map_err(|_| AmountError::Overflow {
        value: value.to_string(),
        target: "u32",
    })
}

/// Narrow a part count to `u64`.
pub fn to_u64(value: &BigUint) -> Result<u64, AmountError> {
    u64::try_from(value).map_err(|_| AmountError::Overflow {
        value: value.to_string(),
        target: "u64",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("1.23456").to_string(), "1.23456");
        assert_eq!(dec("42").to_string(), "42");
        assert_eq!(dec(".5").to_string(), "0.5");
        assert_eq!(dec("7.").to_string(), "7");
        assert_eq!(dec("0.000100").to_string(), "0.0001");
        assert_eq!(dec("1.50"), dec("1.5"));
        assert!(dec("0.000").is_zero());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", ".", "1.2.3", "1e9", "+1", " 1", "abc", "1,5"] {
            assert!(
                matches!(Decimal::parse(bad), Err(AmountError::InvalidDecimal(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            Decimal::parse("-1"),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn test_exact_at_native_scale() {
        let scale = Scale::pow10(9);
        let parts = to_parts(&dec("1.23456"), &scale, Policy::Exact).unwrap();
        assert_eq!(parts, BigUint::from(1_234_560_000u64));
    }

    #[test]
    fn test_exact_rejects_excess_precision() {
        let scale = Scale::pow10(3);
        let err = to_parts(&dec("1.23456"), &scale, Policy::Exact).unwrap_err();
        assert_eq!(
            err,
            AmountError::PrecisionLoss {
                value: "1.23456".into(),
                max_precision: 3
            }
        );
        let truncated = to_parts(&dec("1.23456"), &scale, Policy::Truncate).unwrap();
        assert_eq!(truncated, BigUint::from(1234u32));
    }

    #[test]
    fn test_zero_is_always_exact() {
        let parts = to_parts(&Decimal::zero(), &Scale::pow10(0), Policy::Exact).unwrap();
        assert_eq!(parts, BigUint::ZERO);
    }

    #[test]
    fn test_scale_validation() {
        assert!(matches!(
            Scale::new(BigUint::ZERO),
            Err(AmountError::InvalidScale(_))
        ));
        assert!(Scale::parse("abc").is_err());
        assert_eq!(Scale::parse("1000000000").unwrap().max_precision(), 9);
        assert_eq!(Scale::pow10(0).max_precision(), 0);
        assert!(matches!(Scale::try_from(0u64), Err(AmountError::InvalidScale(_))));
        assert_eq!(Scale::try_from(1_000_000_000u64).unwrap(), Scale::native());
    }

    #[test]
    fn test_percent_to_scaled() {
        let fee = percent_to_scaled(&dec("0.5"), 6, Policy::Exact).unwrap();
        assert_eq!(fee, BigUint::from(500_000u32));
        let full = percent_to_scaled(&dec("100"), 16, Policy::Truncate).unwrap();
        assert_eq!(full, BigUint::from(10u32).pow(18));
        assert!(matches!(
            percent_to_scaled(&dec("100.0001"), 4, Policy::Exact),
            Err(AmountError::OutOfRange { .. })
        ));
        assert!(matches!(
            percent_to_scaled(&dec("1.00005"), 4, Policy::Exact),
            Err(AmountError::PrecisionLoss { .. })
        ));
    }

    #[test]
    fn test_from_parts() {
        let scale = Scale::pow10(9);
        let d = from_parts(&BigUint::from(1_234_560_000u64), &scale);
        assert_eq!(d.to_string(), "1.23456");
        assert_eq!(from_parts(&BigUint::from(5u32), &Scale::pow10(0)).to_string(), "5");
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(to_u32(&BigUint::from(7u32)).unwrap(), 7);
        assert!(to_u32(&BigUint::from(u64::MAX)).is_err());
        assert_eq!(to_u64(&BigUint::from(u64::MAX)).unwrap(), u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_exact_iff_no_remainder(whole in 0u64..1_000_000, frac in "[0-9]{0,12}", exp in 0u32..12) {
            let text = if frac.is_empty() { whole.to_string() } else { format!("{whole}.{frac}") };
            let amount = dec(&text);
            let scale = Scale::pow10(exp);
            let fits = amount.frac_digits() <= exp;
            match to_parts(&amount, &scale, Policy::Exact) {
                Ok(parts) => {
                    prop_assert!(fits);
                    prop_assert_eq!(from_parts(&parts, &scale), amount);
                }
                Err(AmountError::PrecisionLoss { max_precision, .. }) => {
                    prop_assert!(!fits);
                    prop_assert_eq!(max_precision, exp as usize);
                }
                Err(e) => prop_assert!(false, "unexpected error {e}"),
            }
        }

        #[test]
        fn prop_truncate_never_exceeds_exact_product(mantissa in 0u64..u64::MAX, frac in 0u32..20, exp in 0u32..20) {
            let amount = Decimal::new(BigUint::from(mantissa), frac);
            let scale = Scale::pow10(exp);
            let parts = to_parts(&amount, &scale, Policy::Truncate).unwrap();
            let back = from_parts(&parts, &scale);
            let a = to_parts(&back, &Scale::pow10(20), Policy::Exact).unwrap();
            let b = to_parts(&amount, &Scale::pow10(20), Policy::Truncate).unwrap();
            prop_assert!(a <= b);
        }
    }
}
