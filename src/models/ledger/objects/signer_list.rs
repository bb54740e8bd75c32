use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Hash256};
use crate::models::transactions::signer_list_set::SignerEntry;

/// A multi-signing quorum definition.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SignerList {
    pub flags: u32,
    #[serde(rename = "SignerListID")]
    pub signer_list_id: u32,
    pub signer_quorum: u32,
    pub signer_entries: Vec<SignerEntry>,
    #[serde(with = "crate::_serde::hex_u64")]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl SignerList {
    pub fn contains(&self, account: &AccountId) -> bool {
        self.signer_entries
            .iter()
            .any(|entry| entry.account == *account)
    }
}
