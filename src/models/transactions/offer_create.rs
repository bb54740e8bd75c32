use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::Hash256;
use crate::models::amount::Amount;

use super::CommonFields;

/// Transactions of the OfferCreate type support additional values in the
/// Flags field. This enum represents those options.
#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum OfferCreateFlag {
    /// Do not consume offers that exactly match this one; only cross
    /// offers at better rates.
    TfPassive = 0x00010000,
    /// Take whatever crosses immediately and place nothing on the books.
    TfImmediateOrCancel = 0x00020000,
    /// Cancel the whole trade unless the full TakerPays amount crosses.
    TfFillOrKill = 0x00040000,
    /// Exchange the full TakerGets even when the rate is better than
    /// asked.
    TfSell = 0x00080000,
}

/// Places an offer on the decentralized exchange.
///
/// See OfferCreate:
/// `<https://xrpl.org/offercreate.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCreate {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// The amount the offer creator is buying.
    pub taker_pays: Amount,
    /// The amount the offer creator is selling.
    pub taker_gets: Amount,
    pub expiration: Option<u32>,
    /// An existing offer of the sender to cancel first.
    pub offer_sequence: Option<u32>,
    /// Permissioned DEX domain, amendment gated.
    #[serde(rename = "DomainID")]
    pub domain_id: Option<Hash256>,
}

impl OfferCreate {
    pub fn has_flag(&self, flag: OfferCreateFlag) -> bool {
        self.common_fields.has_flag_bits(flag as u32)
    }
}
