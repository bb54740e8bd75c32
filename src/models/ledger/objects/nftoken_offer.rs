use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::Amount;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum NFTokenOfferFlag {
    /// The offer sells the token; without it the offer buys.
    LsfSellNFToken = 0x00000001,
}

/// An offer to buy or sell one NFToken.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenOffer {
    pub owner: AccountId,
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Hash256,
    pub amount: Amount,
    pub destination: Option<AccountId>,
    pub expiration: Option<u32>,
    #[serde(with = "crate::_serde::hex_u64")]
    pub owner_node: u64,
    /// Page hint in the token's buy or sell directory.
    #[serde(rename = "NFTokenOfferNode", with = "crate::_serde::hex_u64")]
    pub nftoken_offer_node: u64,
    pub flags: u32,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl NFTokenOffer {
    pub fn is_sell(&self) -> bool {
        self.flags & NFTokenOfferFlag::LsfSellNFToken as u32 != 0
    }

    pub fn is_expired(&self, parent_close_time: u32) -> bool {
        matches!(self.expiration, Some(expiration) if expiration <= parent_close_time)
    }
}
