use alloc::string::String;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::AccountId;
use crate::models::amount::XRPAmount;

use super::CommonFields;

/// Opens a payment channel and escrows XRP into it.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelCreate {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub amount: XRPAmount,
    pub destination: AccountId,
    /// Seconds the owner must wait after requesting close.
    pub settle_delay: u32,
    /// Key that signs claims against this channel.
    pub public_key: String,
    pub cancel_after: Option<u32>,
    pub destination_tag: Option<u32>,
}
