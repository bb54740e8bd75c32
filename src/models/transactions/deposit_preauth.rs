use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::AccountId;

use super::CommonFields;

/// Grants or revokes preauthorization to deposit while deposit
/// authorization is enabled. Exactly one of the two fields must be set.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DepositPreauth {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub authorize: Option<AccountId>,
    pub unauthorize: Option<AccountId>,
}
