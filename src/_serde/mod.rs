//! Serde functionalities

/// IOU values travel as decimal strings on the wire.
pub mod big_decimal {
    use alloc::string::{String, ToString};
    use bigdecimal::BigDecimal;
    use core::str::FromStr;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigDecimal, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&value.normalized().to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        BigDecimal::from_str(&raw).map_err(D::Error::custom)
    }
}

/// Directory page hints (`OwnerNode`, `BookNode`, ...) are 64-bit values
/// rendered as 16-digit hex strings.
pub mod hex_u64 {
    use alloc::format;
    use alloc::string::String;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{value:016X}"))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        u64::from_str_radix(&raw, 16).map_err(D::Error::custom)
    }
}

/// Same rendering for optional page hints.
pub mod opt_hex_u64 {
    use alloc::format;
    use alloc::string::String;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => s.serialize_str(&format!("{v:016X}")),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            Some(raw) => u64::from_str_radix(&raw, 16)
                .map(Some)
                .map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
