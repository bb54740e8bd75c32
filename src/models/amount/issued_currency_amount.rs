//! Issued amounts: an arbitrary-precision decimal value tagged with its
//! currency and issuer.

use core::fmt;

use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use super::exceptions::{XRPLAmountException, XRPLAmountResult};
use crate::core::types::{AccountId, Currency, Issue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IssuedCurrencyAmount {
    pub currency: Currency,
    pub issuer: AccountId,
    #[serde(with = "crate::_serde::big_decimal")]
    pub value: BigDecimal,
}

impl IssuedCurrencyAmount {
    pub fn new(currency: Currency, issuer: AccountId, value: BigDecimal) -> Self {
        Self {
            currency,
            issuer,
            value: normalize(value).unwrap_or_else(|_| BigDecimal::zero()),
        }
    }

    /// Zero in the given issue.
    pub fn zero(issue: &Issue) -> Self {
        Self {
            currency: issue.currency,
            issuer: issue.issuer,
            value: BigDecimal::zero(),
        }
    }

    pub fn issue(&self) -> Issue {
        Issue::new(self.currency, self.issuer)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Whether this amount denominates the given issue. A zero value
    /// matches any issue of the same currency family: parsed zeros may
    /// carry neutral tags.
    pub fn eq_issue(&self, issue: &Issue) -> bool {
        if self.is_zero() {
            return true;
        }
        self.currency == issue.currency && self.issuer == issue.issuer
    }

    /// The same issue with a different (normalized) value.
    pub fn with_value(&self, value: BigDecimal) -> XRPLAmountResult<Self> {
        Ok(Self {
            currency: self.currency,
            issuer: self.issuer,
            value: normalize(value)?,
        })
    }

    pub fn negated(&self) -> Self {
        Self {
            currency: self.currency,
            issuer: self.issuer,
            value: -self.value.clone(),
        }
    }

    pub fn checked_add(&self, other: &IssuedCurrencyAmount) -> XRPLAmountResult<Self> {
        if !other.eq_issue(&self.issue()) && !self.eq_issue(&other.issue()) {
            return Err(XRPLAmountException::IssueMismatch);
        }
        let tags = if self.is_zero() { other } else { self };
        Ok(Self {
            currency: tags.currency,
            issuer: tags.issuer,
            value: normalize(&self.value + &other.value)?,
        })
    }

    pub fn checked_sub(&self, other: &IssuedCurrencyAmount) -> XRPLAmountResult<Self> {
        self.checked_add(&other.negated())
    }
}

impl fmt::Display for IssuedCurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.value, self.currency, self.issuer)
    }
}

/// Round to the canonical 16 significant digits and clamp to the
/// representable exponent range. The canonical mantissa carries 16 digits,
/// so the leading digit of a value sits at canonical exponent + 15: values
/// whose leading digit falls below that floor collapse to zero, values
/// above the ceiling are an overflow.
pub fn normalize(value: BigDecimal) -> XRPLAmountResult<BigDecimal> {
    if value.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let rounded = value
        .with_prec(crate::constants::IOU_MAX_DIGITS)
        .normalized();
    let (digits, scale) = rounded.as_bigint_and_exponent();
    let mut top_exponent = -scale;
    let mut probe = digits.magnitude().to_u128().unwrap_or(u128::MAX);
    while probe >= 10 {
        probe /= 10;
        top_exponent += 1;
    }
    if top_exponent < crate::constants::IOU_MIN_EXPONENT + 15 {
        return Ok(BigDecimal::zero());
    }
    if top_exponent > crate::constants::IOU_MAX_EXPONENT + 15 {
        return Err(XRPLAmountException::ValueOverflow);
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn usd(value: &str) -> IssuedCurrencyAmount {
        IssuedCurrencyAmount::new(
            Currency::standard("USD").unwrap(),
            AccountId::from_str("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn").unwrap(),
            BigDecimal::from_str(value).unwrap(),
        )
    }

    #[test]
    fn test_serde_shape() {
        let amount = usd("100");
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(
            json,
            r#"{"currency":"USD","issuer":"rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn","value":"100"}"#
        );
        let back: IssuedCurrencyAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_precision_rounds_to_sixteen_digits() {
        let amount = usd("1.00000000000000005");
        assert_eq!(amount.value, BigDecimal::from_str("1.000000000000000").unwrap());
    }

    #[test]
    fn test_tiny_collapses_to_zero() {
        let amount = usd("1e-100");
        assert!(amount.is_zero());
    }

    #[test]
    fn test_add_sub() {
        let total = usd("100").checked_add(&usd("0.5")).unwrap();
        assert_eq!(total.value, BigDecimal::from_str("100.5").unwrap());
        let diff = usd("100").checked_sub(&usd("100")).unwrap();
        assert!(diff.is_zero());
        assert!(usd("1").checked_sub(&usd("2")).unwrap().is_negative());
    }

    #[test]
    fn test_zero_adopts_counterparty_tags() {
        let zero = IssuedCurrencyAmount::default();
        let sum = zero.checked_add(&usd("5")).unwrap();
        assert_eq!(sum.currency, Currency::standard("USD").unwrap());
    }
}
