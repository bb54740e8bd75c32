use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::CommonFields;

/// Removes a previously placed offer. Cancelling an offer that is already
/// gone succeeds without effect.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCancel {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// Sequence number of the offer to cancel.
    pub offer_sequence: u32,
}
