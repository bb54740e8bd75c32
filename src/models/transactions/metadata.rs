use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::Hash256;
use crate::models::amount::Amount;
use crate::ter::TransactionResult;

/// See Metadata:
/// `<https://xrpl.org/docs/references/protocol/transactions/metadata>`
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionMetadata {
    /// The transaction's position within the ledger that included it.
    pub transaction_index: u32,
    /// The transaction's result code.
    pub transaction_result: TransactionResult,
    /// Changes to ledger entries this transaction made, in document order.
    pub affected_nodes: Vec<AffectedNode>,
    /// The amount actually delivered to the destination, for payments
    /// where partial delivery is possible.
    #[serde(rename = "delivered_amount")]
    pub delivered_amount: Option<Amount>,
}

impl TransactionMetadata {
    pub fn minimal(result: TransactionResult) -> Self {
        TransactionMetadata {
            transaction_index: 0,
            transaction_result: result,
            affected_nodes: Vec::new(),
            delivered_amount: None,
        }
    }
}

/// One state-tree entry the transaction created, modified, or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AffectedNode {
    #[serde(rename = "CreatedNode")]
    Created(LedgerNode),
    #[serde(rename = "ModifiedNode")]
    Modified(LedgerNode),
    #[serde(rename = "DeletedNode")]
    Deleted(LedgerNode),
}

impl AffectedNode {
    pub fn node(&self) -> &LedgerNode {
        match self {
            AffectedNode::Created(node)
            | AffectedNode::Modified(node)
            | AffectedNode::Deleted(node) => node,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AffectedNode::Created(_))
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, AffectedNode::Modified(_))
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, AffectedNode::Deleted(_))
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct LedgerNode {
    /// The type of ledger entry this node describes.
    pub ledger_entry_type: alloc::string::String,
    /// The entry's key, upper hex.
    pub ledger_index: Hash256,
    /// The content fields after this transaction (modify and delete).
    pub final_fields: Option<Value>,
    /// The prior values of the fields that changed (modify).
    pub previous_fields: Option<Value>,
    /// The content fields of a newly created entry.
    pub new_fields: Option<Value>,
    /// The transaction that previously modified this entry.
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    #[serde(rename = "PreviousTxnLgrSeq")]
    pub previous_txn_lgr_seq: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_wire_shape() {
        let node = AffectedNode::Created(LedgerNode {
            ledger_entry_type: "AccountRoot".into(),
            ledger_index: Hash256([0xAB; 32]),
            new_fields: Some(serde_json::json!({"Balance": "1000000"})),
            ..Default::default()
        });
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("CreatedNode").is_some());
        assert_eq!(json["CreatedNode"]["LedgerEntryType"], "AccountRoot");
        assert!(json["CreatedNode"].get("FinalFields").is_none());
    }
}
