pub mod account_root;
pub mod check;
pub mod deposit_preauth;
pub mod directory_node;
pub mod nftoken_offer;
pub mod nftoken_page;
pub mod offer;
pub mod pay_channel;
pub mod ripple_state;
pub mod signer_list;
pub mod ticket;

pub use account_root::*;
pub use check::*;
pub use deposit_preauth::*;
pub use directory_node::*;
pub use nftoken_offer::*;
pub use nftoken_page::*;
pub use offer::*;
pub use pay_channel::*;
pub use ripple_state::*;
pub use signer_list::*;
pub use ticket::*;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::Hash256;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Display, AsRefStr, EnumIter, PartialEq, Eq,
)]
pub enum LedgerEntryType {
    AccountRoot,
    Check,
    DepositPreauth,
    DirectoryNode,
    NFTokenOffer,
    NFTokenPage,
    Offer,
    PayChannel,
    RippleState,
    SignerList,
    Ticket,
}

impl LedgerEntryType {
    /// The two-byte wire code of the entry type.
    pub fn type_code(&self) -> u16 {
        match self {
            LedgerEntryType::AccountRoot => 0x0061,
            LedgerEntryType::Check => 0x0043,
            LedgerEntryType::DepositPreauth => 0x0070,
            LedgerEntryType::DirectoryNode => 0x0064,
            LedgerEntryType::NFTokenOffer => 0x0037,
            LedgerEntryType::NFTokenPage => 0x0050,
            LedgerEntryType::Offer => 0x006F,
            LedgerEntryType::PayChannel => 0x0078,
            LedgerEntryType::RippleState => 0x0072,
            LedgerEntryType::SignerList => 0x0053,
            LedgerEntryType::Ticket => 0x0054,
        }
    }
}

/// One decoded ledger entry, tagged by its `LedgerEntryType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "LedgerEntryType")]
pub enum LedgerEntry {
    AccountRoot(AccountRoot),
    Check(Check),
    DepositPreauth(DepositPreauth),
    DirectoryNode(DirectoryNode),
    NFTokenOffer(NFTokenOffer),
    NFTokenPage(NFTokenPage),
    Offer(Offer),
    PayChannel(PayChannel),
    RippleState(RippleState),
    SignerList(SignerList),
    Ticket(Ticket),
}

macro_rules! entry_accessors {
    ($variant:ident, $ty:ty, $as_ref:ident, $as_mut:ident, $into:ident) => {
        pub fn $as_ref(&self) -> Option<&$ty> {
            match self {
                LedgerEntry::$variant(inner) => Some(inner),
                _ => None,
            }
        }

        pub fn $as_mut(&mut self) -> Option<&mut $ty> {
            match self {
                LedgerEntry::$variant(inner) => Some(inner),
                _ => None,
            }
        }

        pub fn $into(self) -> Option<$ty> {
            match self {
                LedgerEntry::$variant(inner) => Some(inner),
                _ => None,
            }
        }
    };
}

impl LedgerEntry {
    pub fn entry_type(&self) -> LedgerEntryType {
        match self {
            LedgerEntry::AccountRoot(_) => LedgerEntryType::AccountRoot,
            LedgerEntry::Check(_) => LedgerEntryType::Check,
            LedgerEntry::DepositPreauth(_) => LedgerEntryType::DepositPreauth,
            LedgerEntry::DirectoryNode(_) => LedgerEntryType::DirectoryNode,
            LedgerEntry::NFTokenOffer(_) => LedgerEntryType::NFTokenOffer,
            LedgerEntry::NFTokenPage(_) => LedgerEntryType::NFTokenPage,
            LedgerEntry::Offer(_) => LedgerEntryType::Offer,
            LedgerEntry::PayChannel(_) => LedgerEntryType::PayChannel,
            LedgerEntry::RippleState(_) => LedgerEntryType::RippleState,
            LedgerEntry::SignerList(_) => LedgerEntryType::SignerList,
            LedgerEntry::Ticket(_) => LedgerEntryType::Ticket,
        }
    }

    /// Rewrite the threading fields to the transaction being applied.
    /// Directory pages are not threaded.
    pub fn thread(&mut self, txn_id: Hash256, ledger_seq: u32) {
        macro_rules! thread {
            ($inner:expr) => {{
                $inner.previous_txn_id = txn_id;
                $inner.previous_txn_lgr_seq = ledger_seq;
            }};
        }
        match self {
            LedgerEntry::AccountRoot(inner) => thread!(inner),
            LedgerEntry::Check(inner) => thread!(inner),
            LedgerEntry::DepositPreauth(inner) => thread!(inner),
            LedgerEntry::DirectoryNode(_) => {}
            LedgerEntry::NFTokenOffer(inner) => thread!(inner),
            LedgerEntry::NFTokenPage(inner) => thread!(inner),
            LedgerEntry::Offer(inner) => thread!(inner),
            LedgerEntry::PayChannel(inner) => thread!(inner),
            LedgerEntry::RippleState(inner) => thread!(inner),
            LedgerEntry::SignerList(inner) => thread!(inner),
            LedgerEntry::Ticket(inner) => thread!(inner),
        }
    }

    /// The threading fields, for entries that carry them.
    pub fn threading(&self) -> Option<(Hash256, u32)> {
        match self {
            LedgerEntry::AccountRoot(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::Check(inner) => Some((inner.previous_txn_id, inner.previous_txn_lgr_seq)),
            LedgerEntry::DepositPreauth(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::DirectoryNode(_) => None,
            LedgerEntry::NFTokenOffer(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::NFTokenPage(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::Offer(inner) => Some((inner.previous_txn_id, inner.previous_txn_lgr_seq)),
            LedgerEntry::PayChannel(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::RippleState(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::SignerList(inner) => {
                Some((inner.previous_txn_id, inner.previous_txn_lgr_seq))
            }
            LedgerEntry::Ticket(inner) => Some((inner.previous_txn_id, inner.previous_txn_lgr_seq)),
        }
    }

    entry_accessors!(
        AccountRoot,
        AccountRoot,
        as_account_root,
        as_account_root_mut,
        into_account_root
    );
    entry_accessors!(Check, Check, as_check, as_check_mut, into_check);
    entry_accessors!(
        DepositPreauth,
        DepositPreauth,
        as_deposit_preauth,
        as_deposit_preauth_mut,
        into_deposit_preauth
    );
    entry_accessors!(
        DirectoryNode,
        DirectoryNode,
        as_directory_node,
        as_directory_node_mut,
        into_directory_node
    );
    entry_accessors!(
        NFTokenOffer,
        NFTokenOffer,
        as_nftoken_offer,
        as_nftoken_offer_mut,
        into_nftoken_offer
    );
    entry_accessors!(
        NFTokenPage,
        NFTokenPage,
        as_nftoken_page,
        as_nftoken_page_mut,
        into_nftoken_page
    );
    entry_accessors!(Offer, Offer, as_offer, as_offer_mut, into_offer);
    entry_accessors!(
        PayChannel,
        PayChannel,
        as_pay_channel,
        as_pay_channel_mut,
        into_pay_channel
    );
    entry_accessors!(
        RippleState,
        RippleState,
        as_ripple_state,
        as_ripple_state_mut,
        into_ripple_state
    );
    entry_accessors!(
        SignerList,
        SignerList,
        as_signer_list,
        as_signer_list_mut,
        into_signer_list
    );
    entry_accessors!(Ticket, Ticket, as_ticket, as_ticket_mut, into_ticket);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_roundtrip() {
        let entry = LedgerEntry::AccountRoot(AccountRoot::default());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["LedgerEntryType"], "AccountRoot");
        let back: LedgerEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_type_codes_are_distinct() {
        use strum::IntoEnumIterator;
        let mut codes: alloc::vec::Vec<u16> =
            LedgerEntryType::iter().map(|t| t.type_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 11);
    }
}
