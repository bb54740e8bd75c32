use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::{AccountId, Currency, Hash256};

/// One page of a directory: a bounded list of entry keys with links to its
/// neighbors. Owner directories carry the owning account; book directories
/// carry the traded pair and the page's exchange rate.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryNode {
    pub flags: u32,
    pub root_index: Hash256,
    pub indexes: Vec<Hash256>,
    #[serde(with = "crate::_serde::opt_hex_u64", default)]
    pub index_next: Option<u64>,
    #[serde(with = "crate::_serde::opt_hex_u64", default)]
    pub index_previous: Option<u64>,
    /// Owner directories only.
    pub owner: Option<AccountId>,
    /// Book directories only.
    pub taker_pays_currency: Option<Currency>,
    pub taker_pays_issuer: Option<AccountId>,
    pub taker_gets_currency: Option<Currency>,
    pub taker_gets_issuer: Option<AccountId>,
    #[serde(with = "crate::_serde::opt_hex_u64", default)]
    pub exchange_rate: Option<u64>,
}

impl DirectoryNode {
    pub fn is_full(&self) -> bool {
        self.indexes.len() >= crate::constants::DIR_NODE_MAX
    }
}
