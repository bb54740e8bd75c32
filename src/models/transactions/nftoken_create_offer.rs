use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::Amount;

use super::CommonFields;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum NFTokenCreateOfferFlag {
    /// The offer sells the named token; without it the offer bids to buy.
    TfSellNFToken = 0x00000001,
}

/// Places an offer to buy or sell one NFToken.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenCreateOffer {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Hash256,
    pub amount: Amount,
    /// Required on buy offers: who holds the token today.
    pub owner: Option<AccountId>,
    /// Restricts who may accept.
    pub destination: Option<AccountId>,
    pub expiration: Option<u32>,
}

impl NFTokenCreateOffer {
    pub fn has_flag(&self, flag: NFTokenCreateOfferFlag) -> bool {
        self.common_fields.has_flag_bits(flag as u32)
    }

    pub fn is_sell(&self) -> bool {
        self.has_flag(NFTokenCreateOfferFlag::TfSellNFToken)
    }
}
