use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::Amount;

/// A deferred payment the destination may cash for up to `SendMax`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Check {
    pub account: AccountId,
    pub destination: AccountId,
    pub send_max: Amount,
    pub sequence: u32,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    pub expiration: Option<u32>,
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Hash256>,
    #[serde(with = "crate::_serde::hex_u64")]
    pub owner_node: u64,
    #[serde(with = "crate::_serde::opt_hex_u64", default)]
    pub destination_node: Option<u64>,
    pub flags: u32,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl Check {
    pub fn is_expired(&self, parent_close_time: u32) -> bool {
        matches!(self.expiration, Some(expiration) if expiration <= parent_close_time)
    }
}
