use alloc::string::String;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::Hash256;
use crate::models::amount::XRPAmount;

use super::CommonFields;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum PaymentChannelClaimFlag {
    /// Clear the channel's expiration.
    TfRenew = 0x00010000,
    /// Request the channel be closed once the claim settles.
    TfClose = 0x00020000,
}

/// Claims XRP from a channel, adjusts its state, or closes it.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelClaim {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub channel: Hash256,
    /// Cumulative drops delivered by this claim; never less than the
    /// channel's current balance.
    pub balance: Option<XRPAmount>,
    /// The amount authorized by the signature, when one is carried.
    pub amount: Option<XRPAmount>,
    pub signature: Option<String>,
    pub public_key: Option<String>,
}

impl PaymentChannelClaim {
    pub fn has_flag(&self, flag: PaymentChannelClaimFlag) -> bool {
        self.common_fields.has_flag_bits(flag as u32)
    }
}
