use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Hash256, Quality};
use crate::models::amount::Amount;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum OfferFlag {
    /// The offer was placed passively and did not cross on placement.
    LsfPassive = 0x00010000,
    /// The offer was placed as a sell: keep the full TakerGets even if the
    /// rate turns out better than asked.
    LsfSell = 0x00020000,
}

/// An order on the decentralized exchange.
///
/// See Offer:
/// `<https://xrpl.org/offer.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Offer {
    pub account: AccountId,
    pub sequence: u32,
    /// What the offer owner stands to receive.
    pub taker_pays: Amount,
    /// What the offer owner stands to give.
    pub taker_gets: Amount,
    /// The book page holding this offer; the low 64 bits encode the rate.
    pub book_directory: Hash256,
    #[serde(with = "crate::_serde::hex_u64")]
    pub book_node: u64,
    #[serde(with = "crate::_serde::hex_u64")]
    pub owner_node: u64,
    pub expiration: Option<u32>,
    pub flags: u32,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl Offer {
    pub fn has_flag(&self, flag: OfferFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    /// The rate encoded into the book page key.
    pub fn quality(&self) -> Quality {
        Quality(self.book_directory.low_64())
    }

    pub fn is_expired(&self, parent_close_time: u32) -> bool {
        matches!(self.expiration, Some(expiration) if expiration <= parent_close_time)
    }
}
