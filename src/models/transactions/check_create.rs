use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::Amount;

use super::CommonFields;

/// Creates a check the destination may later cash.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCreate {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub destination: AccountId,
    /// The most the check can deliver, fees included.
    pub send_max: Amount,
    pub destination_tag: Option<u32>,
    pub expiration: Option<u32>,
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Hash256>,
}
