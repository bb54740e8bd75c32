use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::types::Hash256;

/// One minted token held on a page.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFToken {
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Hash256,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
}

/// A page of an owner's tokens, sorted by token id and linked to its
/// neighbors so the owner's collection reads in one global order.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenPage {
    pub flags: u32,
    #[serde(rename = "NFTokens")]
    pub nftokens: Vec<NFToken>,
    /// Key of the next page, holding strictly higher token ids.
    pub next_page_min: Option<Hash256>,
    /// Key of the previous page, holding strictly lower token ids.
    pub previous_page_min: Option<Hash256>,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl NFTokenPage {
    pub fn is_full(&self) -> bool {
        self.nftokens.len() >= crate::constants::NFTOKEN_PAGE_MAX
    }
}
