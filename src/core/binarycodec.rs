//! The serialization contract for ledger entries.
//!
//! Entries travel as the upper-hex of their canonical serialization;
//! decoding dispatches on the embedded entry type tag. Byte-identical
//! historical encodings are not a goal; determinism and round-tripping
//! are.

use alloc::string::String;
use alloc::vec::Vec;

use crate::core::exceptions::{XRPLCoreException, XRPLCoreResult};
use crate::models::ledger::LedgerEntry;

/// Canonical bytes of one entry.
pub fn serialize(entry: &LedgerEntry) -> XRPLCoreResult<Vec<u8>> {
    serde_json::to_vec(entry)
        .map_err(|err| XRPLCoreException::InvalidHash(alloc::format!("encode failed: {err}")))
}

/// Upper-hex encoding of the canonical bytes.
pub fn encode(entry: &LedgerEntry) -> XRPLCoreResult<String> {
    Ok(hex::encode_upper(serialize(entry)?))
}

/// Decode an upper-hex blob back into a typed entry.
pub fn decode(blob: &str) -> XRPLCoreResult<LedgerEntry> {
    let bytes = hex::decode(blob)
        .map_err(|_| XRPLCoreException::InvalidHash(alloc::string::String::from("bad hex blob")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| XRPLCoreException::InvalidHash(alloc::format!("decode failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AccountId;
    use crate::models::amount::XRPAmount;
    use crate::models::ledger::objects::{AccountRoot, Ticket};

    #[test]
    fn test_roundtrip() {
        let entries = [
            LedgerEntry::AccountRoot(AccountRoot {
                account: AccountId([7; 20]),
                balance: XRPAmount(12_345),
                sequence: 9,
                owner_count: 2,
                ..Default::default()
            }),
            LedgerEntry::Ticket(Ticket {
                account: AccountId([8; 20]),
                ticket_sequence: 55,
                ..Default::default()
            }),
        ];
        for entry in entries {
            let blob = encode(&entry).unwrap();
            assert!(blob.bytes().all(|b| b.is_ascii_hexdigit()));
            assert_eq!(decode(&blob).unwrap(), entry);
        }
    }
}
