//! Deterministic derivation of ledger entry keys.
//!
//! Every entry key is the sha512-half of a two-byte namespace tag followed
//! by the entry's natural identity, except NFToken pages whose keys are
//! assembled structurally so that one owner's pages sort by token id.

use sha2::{Digest, Sha512};

use crate::core::types::{AccountId, Currency, Hash256, Issue, Quality};
use crate::models::ledger::objects::LedgerEntryType;

/// A derived entry key together with the entry type expected at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keylet {
    pub key: Hash256,
    pub entry_type: LedgerEntryType,
}

// Key namespaces, one ASCII tag per entry family.
const NS_ACCOUNT: u16 = b'a' as u16;
const NS_DIR_NODE: u16 = b'd' as u16;
const NS_TRUST_LINE: u16 = b'r' as u16;
const NS_OFFER: u16 = b'o' as u16;
const NS_OWNER_DIR: u16 = b'O' as u16;
const NS_BOOK_DIR: u16 = b'B' as u16;
const NS_SIGNER_LIST: u16 = b'S' as u16;
const NS_TICKET: u16 = b'T' as u16;
const NS_CHECK: u16 = b'C' as u16;
const NS_DEPOSIT_PREAUTH: u16 = b'p' as u16;
const NS_PAY_CHANNEL: u16 = b'x' as u16;
const NS_NFTOKEN_OFFER: u16 = b'q' as u16;
const NS_NFTOKEN_BUYS: u16 = b'h' as u16;
const NS_NFTOKEN_SELLS: u16 = b'i' as u16;

/// First half of the SHA-512 of the namespace tag and the given parts.
fn index_hash(space: u16, parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512::new();
    hasher.update(space.to_be_bytes());
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest[..32]);
    Hash256(key)
}

pub fn account(id: &AccountId) -> Keylet {
    Keylet {
        key: index_hash(NS_ACCOUNT, &[&id.0]),
        entry_type: LedgerEntryType::AccountRoot,
    }
}

/// Trust line between two accounts in one currency. The key is order
/// independent: the lexicographically smaller account hashes first.
pub fn line(a: &AccountId, b: &AccountId, currency: &Currency) -> Keylet {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    Keylet {
        key: index_hash(NS_TRUST_LINE, &[&low.0, &high.0, &currency.0]),
        entry_type: LedgerEntryType::RippleState,
    }
}

pub fn offer(owner: &AccountId, sequence: u32) -> Keylet {
    Keylet {
        key: index_hash(NS_OFFER, &[&owner.0, &sequence.to_be_bytes()]),
        entry_type: LedgerEntryType::Offer,
    }
}

pub fn owner_dir(id: &AccountId) -> Keylet {
    Keylet {
        key: index_hash(NS_OWNER_DIR, &[&id.0]),
        entry_type: LedgerEntryType::DirectoryNode,
    }
}

/// The base of an order book: quality bits zeroed.
pub fn book_base(pays: &Issue, gets: &Issue) -> Hash256 {
    index_hash(
        NS_BOOK_DIR,
        &[
            &pays.currency.0,
            &gets.currency.0,
            &pays.issuer.0,
            &gets.issuer.0,
        ],
    )
    .with_low_64(0)
}

/// A book page: the base with the encoded rate in the low 64 bits.
pub fn quality(base: Hash256, rate: Quality) -> Keylet {
    Keylet {
        key: base.with_low_64(rate.0),
        entry_type: LedgerEntryType::DirectoryNode,
    }
}

/// One past the last possible page of a book.
pub fn book_end(base: Hash256) -> Hash256 {
    base.with_low_64(u64::MAX)
}

/// Directory page `index` under `root`. Page zero is the root itself.
pub fn dir_page(root: Hash256, index: u64) -> Keylet {
    let key = if index == 0 {
        root
    } else {
        index_hash(NS_DIR_NODE, &[&root.0, &index.to_be_bytes()])
    };
    Keylet {
        key,
        entry_type: LedgerEntryType::DirectoryNode,
    }
}

pub fn signer_list(owner: &AccountId) -> Keylet {
    Keylet {
        key: index_hash(NS_SIGNER_LIST, &[&owner.0, &0u32.to_be_bytes()]),
        entry_type: LedgerEntryType::SignerList,
    }
}

pub fn ticket(owner: &AccountId, ticket_sequence: u32) -> Keylet {
    Keylet {
        key: index_hash(NS_TICKET, &[&owner.0, &ticket_sequence.to_be_bytes()]),
        entry_type: LedgerEntryType::Ticket,
    }
}

pub fn check(owner: &AccountId, sequence: u32) -> Keylet {
    Keylet {
        key: index_hash(NS_CHECK, &[&owner.0, &sequence.to_be_bytes()]),
        entry_type: LedgerEntryType::Check,
    }
}

pub fn deposit_preauth(owner: &AccountId, authorized: &AccountId) -> Keylet {
    Keylet {
        key: index_hash(NS_DEPOSIT_PREAUTH, &[&owner.0, &authorized.0]),
        entry_type: LedgerEntryType::DepositPreauth,
    }
}

pub fn pay_channel(owner: &AccountId, destination: &AccountId, sequence: u32) -> Keylet {
    Keylet {
        key: index_hash(
            NS_PAY_CHANNEL,
            &[&owner.0, &destination.0, &sequence.to_be_bytes()],
        ),
        entry_type: LedgerEntryType::PayChannel,
    }
}

pub fn nftoken_offer(owner: &AccountId, sequence: u32) -> Keylet {
    Keylet {
        key: index_hash(NS_NFTOKEN_OFFER, &[&owner.0, &sequence.to_be_bytes()]),
        entry_type: LedgerEntryType::NFTokenOffer,
    }
}

/// Directory of buy offers for one token.
pub fn nft_buys(token: &Hash256) -> Keylet {
    Keylet {
        key: index_hash(NS_NFTOKEN_BUYS, &[&token.0]),
        entry_type: LedgerEntryType::DirectoryNode,
    }
}

/// Directory of sell offers for one token.
pub fn nft_sells(token: &Hash256) -> Keylet {
    Keylet {
        key: index_hash(NS_NFTOKEN_SELLS, &[&token.0]),
        entry_type: LedgerEntryType::DirectoryNode,
    }
}

/// The page that would hold `token` for `owner`: the top 96 bits identify
/// the owner, the low 160 bits come from the token id, so one owner's
/// pages occupy a contiguous key range ordered by token.
pub fn nftoken_page(owner: &AccountId, token: &Hash256) -> Keylet {
    let mut key = [0u8; 32];
    key[..12].copy_from_slice(&owner.0[..12]);
    key[12..].copy_from_slice(&token.0[12..]);
    Keylet {
        key: Hash256(key),
        entry_type: LedgerEntryType::NFTokenPage,
    }
}

/// The lowest page key an owner can have.
pub fn nftoken_page_min(owner: &AccountId) -> Keylet {
    nftoken_page(owner, &Hash256::ZERO)
}

/// The fixed key of an owner's final page.
pub fn nftoken_page_max(owner: &AccountId) -> Keylet {
    nftoken_page(owner, &Hash256([0xFF; 32]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn alice() -> AccountId {
        AccountId::from_str("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn").unwrap()
    }

    fn bob() -> AccountId {
        AccountId::from_str("rrrrrrrrrrrrrrrrrrrrBZbvji").unwrap()
    }

    #[test]
    fn test_determinism() {
        assert_eq!(account(&alice()), account(&alice()));
        assert_ne!(account(&alice()).key, account(&bob()).key);
        assert_ne!(account(&alice()).key, owner_dir(&alice()).key);
    }

    #[test]
    fn test_line_is_order_independent() {
        let usd = Currency::standard("USD").unwrap();
        assert_eq!(line(&alice(), &bob(), &usd), line(&bob(), &alice(), &usd));
    }

    #[test]
    fn test_quality_overlays_low_bits() {
        let base = book_base(
            &Issue::new(Currency::standard("USD").unwrap(), alice()),
            &Issue::XRP,
        );
        assert_eq!(base.low_64(), 0);
        let page = quality(base, Quality::ONE);
        assert_eq!(page.key.low_64(), Quality::ONE.0);
        assert_eq!(page.key.with_low_64(0), base);
    }

    #[test]
    fn test_nftoken_page_range() {
        let token = Hash256([0x42; 32]);
        let page = nftoken_page(&alice(), &token);
        assert!(nftoken_page_min(&alice()).key < page.key);
        assert!(page.key < nftoken_page_max(&alice()).key);
        assert_eq!(&page.key.0[..12], &alice().0[..12]);
        assert_eq!(&page.key.0[12..], &token.0[12..]);
    }
}
