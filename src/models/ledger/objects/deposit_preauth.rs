use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Hash256};

/// A standing authorization for one sender to deposit while the account
/// has deposit authorization enabled.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DepositPreauth {
    pub account: AccountId,
    pub authorize: AccountId,
    #[serde(with = "crate::_serde::hex_u64")]
    pub owner_node: u64,
    pub flags: u32,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}
