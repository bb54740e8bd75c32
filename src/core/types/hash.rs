//! 256-bit hash keys.

use core::fmt;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::core::exceptions::XRPLCoreException;

/// A 256-bit value: ledger entry keys, transaction hashes, NFToken ids.
/// Rendered as 64 upper-hex digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0; 32]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    /// The low 64 bits, big-endian: the quality portion of a book page key.
    pub fn low_64(&self) -> u64 {
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        u64::from_be_bytes(tail)
    }

    /// Replace the low 64 bits, big-endian.
    pub fn with_low_64(mut self, value: u64) -> Hash256 {
        self.0[24..].copy_from_slice(&value.to_be_bytes());
        self
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl FromStr for Hash256 {
    type Err = XRPLCoreException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(s)
            .map_err(|_| XRPLCoreException::InvalidHash(alloc::string::ToString::to_string(s)))?;
        if decoded.len() != 32 {
            return Err(XRPLCoreException::InvalidHash(
                alloc::string::ToString::to_string(s),
            ));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Hash256(bytes))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
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
    fn test_roundtrip() {
        let raw = "E3FE6EA3D48F0C2B639448020EA4F03D4F4F8FFDB243A852A0F59177921B4879";
        let hash: Hash256 = raw.parse().unwrap();
        assert_eq!(hash.to_string(), raw);
    }

    #[test]
    fn test_low_64() {
        let hash: Hash256 = "00000000000000000000000000000000000000000000000000000000DEADBEEF"
            .parse()
            .unwrap();
        assert_eq!(hash.low_64(), 0xDEADBEEF);
        let swapped = hash.with_low_64(0x1122334455667788);
        assert_eq!(swapped.low_64(), 0x1122334455667788);
    }
}
