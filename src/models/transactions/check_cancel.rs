use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::Hash256;

use super::CommonFields;

/// Removes an uncashed check. Until it expires only the parties may
/// cancel; afterwards anyone may.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCancel {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    #[serde(rename = "CheckID")]
    pub check_id: Hash256,
}
