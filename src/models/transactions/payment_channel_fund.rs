use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::Hash256;
use crate::models::amount::XRPAmount;

use super::CommonFields;

/// Adds XRP to an open channel and optionally pushes out its expiration.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelFund {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub channel: Hash256,
    pub amount: XRPAmount,
    pub expiration: Option<u32>,
}
