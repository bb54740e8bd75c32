use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::AccountId;

use super::CommonFields;

/// One signer and its weight toward the quorum.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SignerEntry {
    pub account: AccountId,
    pub signer_weight: u16,
}

/// Creates, replaces, or removes the account's signer list.
///
/// See SignerListSet:
/// `<https://xrpl.org/signerlistset.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SignerListSet {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// Zero deletes the list.
    pub signer_quorum: u32,
    pub signer_entries: Option<Vec<SignerEntry>>,
}
