use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::Hash256;
use crate::models::amount::Amount;

use super::CommonFields;

/// Accepts a buy or sell offer for an NFToken, or brokers a matched pair
/// of offers for a fee.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenAcceptOffer {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    #[serde(rename = "NFTokenSellOffer")]
    pub nftoken_sell_offer: Option<Hash256>,
    #[serde(rename = "NFTokenBuyOffer")]
    pub nftoken_buy_offer: Option<Hash256>,
    /// Broker mode only: the broker's cut, strictly less than the spread.
    #[serde(rename = "NFTokenBrokerFee")]
    pub nftoken_broker_fee: Option<Amount>,
}

impl NFTokenAcceptOffer {
    pub fn is_brokered(&self) -> bool {
        self.nftoken_sell_offer.is_some() && self.nftoken_buy_offer.is_some()
    }
}
