mod exceptions;
mod issued_currency_amount;
mod xrp_amount;

pub use exceptions::*;
pub use issued_currency_amount::*;
pub use xrp_amount::*;

use bigdecimal::{BigDecimal, Signed, ToPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::core::types::Issue;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Display)]
#[serde(untagged)]
pub enum Amount {
    IssuedCurrencyAmount(IssuedCurrencyAmount),
    XRPAmount(XRPAmount),
}

impl Default for Amount {
    fn default() -> Self {
        Self::XRPAmount(XRPAmount::ZERO)
    }
}

impl Amount {
    pub fn is_xrp(&self) -> bool {
        match self {
            Amount::IssuedCurrencyAmount(_) => false,
            Amount::XRPAmount(_) => true,
        }
    }

    pub fn is_issued_currency(&self) -> bool {
        !self.is_xrp()
    }

    /// Zero denominated in the given issue.
    pub fn zero(issue: &Issue) -> Amount {
        if issue.is_xrp() {
            Amount::XRPAmount(XRPAmount::ZERO)
        } else {
            Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::zero(issue))
        }
    }

    pub fn issue(&self) -> Issue {
        match self {
            Amount::IssuedCurrencyAmount(amount) => amount.issue(),
            Amount::XRPAmount(_) => Issue::XRP,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Amount::IssuedCurrencyAmount(amount) => amount.is_zero(),
            Amount::XRPAmount(amount) => amount.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Amount::IssuedCurrencyAmount(amount) => amount.is_negative(),
            Amount::XRPAmount(_) => false,
        }
    }

    /// The numeric value, losing the issue tags.
    pub fn as_big(&self) -> BigDecimal {
        match self {
            Amount::IssuedCurrencyAmount(amount) => amount.value.clone(),
            Amount::XRPAmount(amount) => amount.as_big(),
        }
    }

    /// Rebuild an amount of `issue` from a raw decimal. Drops round down;
    /// issued values normalize.
    pub fn from_big(issue: &Issue, value: BigDecimal) -> XRPLAmountResult<Amount> {
        if issue.is_xrp() {
            if value.is_negative() {
                return Err(XRPLAmountException::Negative);
            }
            let drops = value
                .with_scale_round(0, bigdecimal::RoundingMode::Floor)
                .to_u64()
                .ok_or(XRPLAmountException::DropsOverflow)?;
            Ok(Amount::XRPAmount(XRPAmount(drops)))
        } else {
            Ok(Amount::IssuedCurrencyAmount(IssuedCurrencyAmount {
                currency: issue.currency,
                issuer: issue.issuer,
                value: normalize(value)?,
            }))
        }
    }

    /// As `from_big`, but drops round up so that a required input is never
    /// understated.
    pub fn from_big_ceil(issue: &Issue, value: BigDecimal) -> XRPLAmountResult<Amount> {
        if issue.is_xrp() {
            if value.is_negative() {
                return Err(XRPLAmountException::Negative);
            }
            let drops = value
                .with_scale_round(0, bigdecimal::RoundingMode::Ceiling)
                .to_u64()
                .ok_or(XRPLAmountException::DropsOverflow)?;
            return Ok(Amount::XRPAmount(XRPAmount(drops)));
        }
        Amount::from_big(issue, value)
    }

    pub fn checked_add(&self, other: &Amount) -> XRPLAmountResult<Amount> {
        match (self, other) {
            (Amount::XRPAmount(a), Amount::XRPAmount(b)) => {
                Ok(Amount::XRPAmount(a.checked_add(*b)?))
            }
            (Amount::IssuedCurrencyAmount(a), Amount::IssuedCurrencyAmount(b)) => {
                Ok(Amount::IssuedCurrencyAmount(a.checked_add(b)?))
            }
            _ => Err(XRPLAmountException::KindMismatch),
        }
    }

    pub fn checked_sub(&self, other: &Amount) -> XRPLAmountResult<Amount> {
        match (self, other) {
            (Amount::XRPAmount(a), Amount::XRPAmount(b)) => {
                Ok(Amount::XRPAmount(a.checked_sub(*b)?))
            }
            (Amount::IssuedCurrencyAmount(a), Amount::IssuedCurrencyAmount(b)) => {
                Ok(Amount::IssuedCurrencyAmount(a.checked_sub(b)?))
            }
            _ => Err(XRPLAmountException::KindMismatch),
        }
    }

    /// Numeric comparison between amounts of the same kind.
    pub fn cmp_value(&self, other: &Amount) -> XRPLAmountResult<core::cmp::Ordering> {
        match (self, other) {
            (Amount::XRPAmount(a), Amount::XRPAmount(b)) => Ok(a.cmp(b)),
            (Amount::IssuedCurrencyAmount(a), Amount::IssuedCurrencyAmount(b)) => {
                Ok(a.value.cmp(&b.value))
            }
            _ => Err(XRPLAmountException::KindMismatch),
        }
    }

    /// The smaller of two same-issue amounts.
    pub fn min_value(&self, other: &Amount) -> XRPLAmountResult<Amount> {
        Ok(match self.cmp_value(other)? {
            core::cmp::Ordering::Greater => other.clone(),
            _ => self.clone(),
        })
    }
}

impl From<IssuedCurrencyAmount> for Amount {
    fn from(value: IssuedCurrencyAmount) -> Self {
        Self::IssuedCurrencyAmount(value)
    }
}

impl From<XRPAmount> for Amount {
    fn from(value: XRPAmount) -> Self {
        Self::XRPAmount(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AccountId, Currency};
    use core::str::FromStr;

    fn usd_issue() -> Issue {
        Issue::new(
            Currency::standard("USD").unwrap(),
            AccountId::from_str("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn").unwrap(),
        )
    }

    #[test]
    fn test_untagged_serde() {
        let xrp: Amount = serde_json::from_str(r#""1000000""#).unwrap();
        assert!(xrp.is_xrp());
        let iou: Amount = serde_json::from_str(
            r#"{"currency":"USD","issuer":"rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn","value":"10"}"#,
        )
        .unwrap();
        assert!(iou.is_issued_currency());
        assert_eq!(iou.issue(), usd_issue());
    }

    #[test]
    fn test_from_big_rounding() {
        let value = BigDecimal::from_str("10.7").unwrap();
        assert_eq!(
            Amount::from_big(&Issue::XRP, value.clone()).unwrap(),
            Amount::XRPAmount(XRPAmount(10))
        );
        assert_eq!(
            Amount::from_big_ceil(&Issue::XRP, value).unwrap(),
            Amount::XRPAmount(XRPAmount(11))
        );
    }

    #[test]
    fn test_kind_mismatch() {
        let xrp = Amount::XRPAmount(XRPAmount(1));
        let iou = Amount::zero(&usd_issue());
        assert!(xrp.checked_add(&iou).is_err());
    }
}
