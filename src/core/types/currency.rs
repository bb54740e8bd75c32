//! A 20-byte currency code.

use core::fmt;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::CURRENCY_CODE_LENGTH;
use crate::core::exceptions::XRPLCoreException;

/// A raw currency code. The all-zero code is the native currency; a
/// standard code carries three ASCII characters at bytes 12..15; anything
/// else renders as 40 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Currency(pub [u8; CURRENCY_CODE_LENGTH]);

impl Currency {
    /// The native currency.
    pub const XRP: Currency = Currency([0; CURRENCY_CODE_LENGTH]);

    pub fn is_xrp(&self) -> bool {
        self.0 == [0; CURRENCY_CODE_LENGTH]
    }

    /// Build a standard three-character code.
    pub fn standard(code: &str) -> Result<Currency, XRPLCoreException> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(XRPLCoreException::InvalidCurrencyCode(
                alloc::string::ToString::to_string(code),
            ));
        }
        let mut raw = [0u8; CURRENCY_CODE_LENGTH];
        raw[12..15].copy_from_slice(bytes);
        Ok(Currency(raw))
    }

    fn standard_code(&self) -> Option<&str> {
        let (head, tail) = (&self.0[..12], &self.0[15..]);
        if head.iter().all(|b| *b == 0) && tail.iter().all(|b| *b == 0) {
            core::str::from_utf8(&self.0[12..15])
                .ok()
                .filter(|code| code.bytes().all(|b| b.is_ascii_alphanumeric()))
        } else {
            None
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_xrp() {
            f.write_str("XRP")
        } else if let Some(code) = self.standard_code() {
            f.write_str(code)
        } else {
            f.write_str(&hex::encode_upper(self.0))
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({self})")
    }
}

impl FromStr for Currency {
    type Err = XRPLCoreException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "XRP" {
            return Ok(Currency::XRP);
        }
        if s.len() == 3 {
            return Currency::standard(s);
        }
        if s.len() == 2 * CURRENCY_CODE_LENGTH {
            let decoded = hex::decode(s).map_err(|_| {
                XRPLCoreException::InvalidCurrencyCode(alloc::string::ToString::to_string(s))
            })?;
            let mut raw = [0u8; CURRENCY_CODE_LENGTH];
            raw.copy_from_slice(&decoded);
            return Ok(Currency(raw));
        }
        Err(XRPLCoreException::InvalidCurrencyCode(
            alloc::string::ToString::to_string(s),
        ))
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = alloc::borrow::Cow::<str>::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_standard_code() {
        let usd = Currency::standard("USD").unwrap();
        assert_eq!(usd.to_string(), "USD");
        assert_eq!("USD".parse::<Currency>().unwrap(), usd);
        assert!(!usd.is_xrp());
    }

    #[test]
    fn test_xrp() {
        assert_eq!("XRP".parse::<Currency>().unwrap(), Currency::XRP);
        assert_eq!(Currency::XRP.to_string(), "XRP");
    }

    #[test]
    fn test_nonstandard_roundtrip() {
        let raw = "0158415500000000C1F76FF6ECB0BAC600000000";
        let cur: Currency = raw.parse().unwrap();
        assert_eq!(cur.to_string(), raw);
    }
}
