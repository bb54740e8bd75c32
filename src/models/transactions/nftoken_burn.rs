use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Hash256};

use super::CommonFields;

/// Destroys a token held by the sender, or by `Owner` when the sender is
/// the issuer of a burnable token.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenBurn {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Hash256,
    pub owner: Option<AccountId>,
}
