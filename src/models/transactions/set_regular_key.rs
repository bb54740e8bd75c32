use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::AccountId;

use super::CommonFields;

/// Assigns, changes, or removes the regular key pair of an account.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SetRegularKey {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// Omitted to remove the existing regular key.
    pub regular_key: Option<AccountId>,
}
