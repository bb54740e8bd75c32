//! Assembling and parsing NFToken ids.
//!
//! A token id packs, in order: 16 bits of flags, a 16-bit transfer fee,
//! the 160-bit issuer, a 32-bit ciphered taxon, and the issuer's 32-bit
//! mint sequence. The taxon is mixed with a linear congruential
//! permutation of the sequence so one issuer's tokens spread across
//! pages instead of clustering by taxon.

use crate::constants::{NFTOKEN_TAXON_C1, NFTOKEN_TAXON_C2};
use crate::core::types::{AccountId, Hash256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NFTokenIdParts {
    pub flags: u16,
    pub transfer_fee: u16,
    pub issuer: AccountId,
    pub taxon: u32,
    pub sequence: u32,
}

/// Cipher (or decipher: the mix is an involution) a taxon against the
/// mint sequence.
pub fn cipher_taxon(taxon: u32, sequence: u32) -> u32 {
    taxon ^ (sequence ^ NFTOKEN_TAXON_C1).wrapping_mul(NFTOKEN_TAXON_C2)
}

pub fn assemble_nftoken_id(parts: &NFTokenIdParts) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes[0..2].copy_from_slice(&parts.flags.to_be_bytes());
    bytes[2..4].copy_from_slice(&parts.transfer_fee.to_be_bytes());
    bytes[4..24].copy_from_slice(&parts.issuer.0);
    bytes[24..28].copy_from_slice(&cipher_taxon(parts.taxon, parts.sequence).to_be_bytes());
    bytes[28..32].copy_from_slice(&parts.sequence.to_be_bytes());
    Hash256(bytes)
}

pub fn parse_nftoken_id(id: &Hash256) -> NFTokenIdParts {
    let mut flags = [0u8; 2];
    flags.copy_from_slice(&id.0[0..2]);
    let mut fee = [0u8; 2];
    fee.copy_from_slice(&id.0[2..4]);
    let mut issuer = [0u8; 20];
    issuer.copy_from_slice(&id.0[4..24]);
    let mut ciphered = [0u8; 4];
    ciphered.copy_from_slice(&id.0[24..28]);
    let mut sequence = [0u8; 4];
    sequence.copy_from_slice(&id.0[28..32]);
    let sequence = u32::from_be_bytes(sequence);
    NFTokenIdParts {
        flags: u16::from_be_bytes(flags),
        transfer_fee: u16::from_be_bytes(fee),
        issuer: AccountId(issuer),
        taxon: cipher_taxon(u32::from_be_bytes(ciphered), sequence),
        sequence,
    }
}

/// The low 96 bits of a token id: tokens sharing them must stay on the
/// same page.
pub fn token_group(id: &Hash256) -> [u8; 12] {
    let mut group = [0u8; 12];
    group.copy_from_slice(&id.0[20..32]);
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_is_involution() {
        let taxon = 1337;
        let sequence = 12;
        let ciphered = cipher_taxon(taxon, sequence);
        assert_ne!(ciphered, taxon);
        assert_eq!(cipher_taxon(ciphered, sequence), taxon);
    }

    #[test]
    fn test_assemble_parse_roundtrip() {
        let parts = NFTokenIdParts {
            flags: 0x000B,
            transfer_fee: 1337,
            issuer: AccountId([0x42; 20]),
            taxon: 0xDEAD,
            sequence: 12,
        };
        let id = assemble_nftoken_id(&parts);
        assert_eq!(parse_nftoken_id(&id), parts);
        assert_eq!(&id.0[4..24], &[0x42; 20]);
    }
}
