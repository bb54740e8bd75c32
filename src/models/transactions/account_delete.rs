use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::AccountId;

use super::CommonFields;

/// Deletes the sending account, moving its remaining XRP to a destination.
///
/// See AccountDelete:
/// `<https://xrpl.org/accountdelete.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AccountDelete {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub destination: AccountId,
    pub destination_tag: Option<u32>,
}
