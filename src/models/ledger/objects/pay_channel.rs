use alloc::string::String;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::XRPAmount;

/// XRP set aside for asynchronous, monotonically increasing claims by one
/// destination.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PayChannel {
    pub account: AccountId,
    pub destination: AccountId,
    /// Total drops escrowed into the channel.
    pub amount: XRPAmount,
    /// Drops already paid out; never decreases.
    pub balance: XRPAmount,
    pub settle_delay: u32,
    pub public_key: Option<String>,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    /// Mutable close time, pushed out by funding.
    pub expiration: Option<u32>,
    /// Immutable close time fixed at creation.
    pub cancel_after: Option<u32>,
    #[serde(with = "crate::_serde::hex_u64")]
    pub owner_node: u64,
    pub flags: u32,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl PayChannel {
    /// Drops still claimable from the channel.
    pub fn remaining(&self) -> XRPAmount {
        self.amount.saturating_sub(self.balance)
    }
}
