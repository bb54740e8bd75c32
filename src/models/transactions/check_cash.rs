use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::Hash256;
use crate::models::amount::Amount;

use super::CommonFields;

/// Redeems a check. Exactly one of `Amount` (exact) or `DeliverMin`
/// (flexible) must be present.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCash {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    #[serde(rename = "CheckID")]
    pub check_id: Hash256,
    pub amount: Option<Amount>,
    pub deliver_min: Option<Amount>,
}
