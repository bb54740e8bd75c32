//! Encodes and decodes classic account addresses.
//!
//! See base58 encodings:
//! `<https://xrpl.org/base58-encodings.html>`

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use bs58::Alphabet;

use crate::constants::ACCOUNT_ID_LENGTH;
use crate::core::exceptions::{XRPLCoreException, XRPLCoreResult};

/// XRP Ledger base58 dictionary, sourced from the [`bs58`] crate.
///
/// [`bs58`]: bs58::Alphabet
pub const XRPL_ALPHABET: Alphabet = *bs58::Alphabet::RIPPLE;

/// Account address (20 bytes), type prefix value 0.
const CLASSIC_ADDRESS_PREFIX: [u8; 1] = [0x00];

/// Returns the classic address encoding of a 20-byte account id.
pub fn encode_account_id(account_id: &[u8]) -> XRPLCoreResult<String> {
    if account_id.len() != ACCOUNT_ID_LENGTH {
        return Err(XRPLCoreException::UnexpectedPayloadLength {
            expected: ACCOUNT_ID_LENGTH,
            found: account_id.len(),
        });
    }

    let mut payload = vec![];
    payload.extend_from_slice(&CLASSIC_ADDRESS_PREFIX);
    payload.extend_from_slice(account_id);

    Ok(bs58::encode(payload)
        .with_alphabet(&XRPL_ALPHABET)
        .with_check()
        .into_string())
}

/// Returns the 20-byte account id encoded by a classic address.
pub fn decode_classic_address(address: &str) -> XRPLCoreResult<Vec<u8>> {
    let decoded = bs58::decode(address)
        .with_alphabet(&XRPL_ALPHABET)
        .with_check(None)
        .into_vec()
        .map_err(|_| XRPLCoreException::InvalidClassicAddress)?;

    if decoded.len() != ACCOUNT_ID_LENGTH + 1 || decoded[..1] != CLASSIC_ADDRESS_PREFIX {
        return Err(XRPLCoreException::InvalidClassicAddress);
    }

    Ok(decoded[1..].to_vec())
}

/// Whether a string parses as a classic address.
pub fn is_valid_classic_address(address: &str) -> bool {
    decode_classic_address(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn";

    #[test]
    fn test_roundtrip() {
        let decoded = decode_classic_address(ADDRESS).unwrap();
        assert_eq!(decoded.len(), ACCOUNT_ID_LENGTH);
        assert_eq!(encode_account_id(&decoded).unwrap(), ADDRESS);
    }

    #[test]
    fn test_invalid() {
        assert!(!is_valid_classic_address("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpm"));
        assert!(!is_valid_classic_address("not an address"));
    }
}
