//! A 20-byte account identifier with classic-address text form.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::ACCOUNT_ID_LENGTH;
use crate::core::addresscodec::{decode_classic_address, encode_account_id};
use crate::core::exceptions::XRPLCoreException;

/// A raw account id. Ordering is the canonical lexicographic byte order
/// used to pick the low and high side of a trust line.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId(pub [u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    /// The all-zero account: issuer tag of the native currency.
    pub const ZERO: AccountId = AccountId([0; ACCOUNT_ID_LENGTH]);

    /// The neutral account used as the issuer tag on trust-line balances.
    pub const ONE: AccountId = AccountId([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    ]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; ACCOUNT_ID_LENGTH]
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match encode_account_id(&self.0) {
            Ok(address) => f.write_str(&address),
            Err(_) => f.write_str(&hex::encode_upper(self.0)),
        }
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

impl FromStr for AccountId {
    type Err = XRPLCoreException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = decode_classic_address(s)?;
        let mut bytes = [0u8; ACCOUNT_ID_LENGTH];
        bytes.copy_from_slice(&decoded);
        Ok(AccountId(bytes))
    }
}

impl TryFrom<&[u8]> for AccountId {
    type Error = XRPLCoreException;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() != ACCOUNT_ID_LENGTH {
            return Err(XRPLCoreException::UnexpectedPayloadLength {
                expected: ACCOUNT_ID_LENGTH,
                found: value.len(),
            });
        }
        let mut bytes = [0u8; ACCOUNT_ID_LENGTH];
        bytes.copy_from_slice(value);
        Ok(AccountId(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = alloc::borrow::Cow::<str>::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        let id: AccountId = "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap();
        assert_eq!(
            alloc::string::ToString::to_string(&id),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn"
        );
    }

    #[test]
    fn test_neutral_accounts() {
        assert_eq!(
            alloc::string::ToString::to_string(&AccountId::ONE),
            "rrrrrrrrrrrrrrrrrrrrBZbvji"
        );
        assert!(AccountId::ZERO < AccountId::ONE);
    }
}
