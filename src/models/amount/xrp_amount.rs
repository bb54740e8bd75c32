//! Native amounts, counted in drops.

use core::fmt;
use core::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::exceptions::{XRPLAmountException, XRPLAmountResult};

/// An amount of the native currency. The wire form is a string of drops.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct XRPAmount(pub u64);

impl XRPAmount {
    pub const ZERO: XRPAmount = XRPAmount(0);

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: XRPAmount) -> XRPLAmountResult<XRPAmount> {
        self.0
            .checked_add(other.0)
            .map(XRPAmount)
            .ok_or(XRPLAmountException::DropsOverflow)
    }

    pub fn checked_sub(self, other: XRPAmount) -> XRPLAmountResult<XRPAmount> {
        self.0
            .checked_sub(other.0)
            .map(XRPAmount)
            .ok_or(XRPLAmountException::DropsOverflow)
    }

    pub fn saturating_sub(self, other: XRPAmount) -> XRPAmount {
        XRPAmount(self.0.saturating_sub(other.0))
    }

    pub fn min(self, other: XRPAmount) -> XRPAmount {
        XRPAmount(self.0.min(other.0))
    }

    pub fn as_big(&self) -> BigDecimal {
        BigDecimal::from(self.0)
    }
}

impl From<u64> for XRPAmount {
    fn from(drops: u64) -> Self {
        XRPAmount(drops)
    }
}

impl fmt::Display for XRPAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for XRPAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XRPAmount({})", self.0)
    }
}

impl FromStr for XRPAmount {
    type Err = XRPLAmountException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(XRPAmount)
            .map_err(|_| XRPLAmountException::DropsOverflow)
    }
}

impl Serialize for XRPAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for XRPAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = alloc::borrow::Cow::<str>::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_as_string() {
        let amount = XRPAmount(20_000_000);
        assert_eq!(
            serde_json::to_string(&amount).unwrap(),
            r#""20000000""#
        );
        let back: XRPAmount = serde_json::from_str(r#""20000000""#).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = XRPAmount(10);
        assert_eq!(a.checked_add(XRPAmount(5)).unwrap(), XRPAmount(15));
        assert_eq!(a.checked_sub(XRPAmount(10)).unwrap(), XRPAmount::ZERO);
        assert!(a.checked_sub(XRPAmount(11)).is_err());
        assert!(XRPAmount(u64::MAX).checked_add(XRPAmount(1)).is_err());
    }
}
