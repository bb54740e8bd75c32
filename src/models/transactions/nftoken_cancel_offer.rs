use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::Hash256;

use super::CommonFields;

/// Cancels a batch of NFToken offers owned by the sender (or expired, or
/// destined to the sender).
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenCancelOffer {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    #[serde(rename = "NFTokenOffers")]
    pub nftoken_offers: Vec<Hash256>,
}
