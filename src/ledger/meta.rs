//! Synthesizes `AffectedNode` metadata from a committed sandbox layer by
//! diffing each entry's pre-image against its final value.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::core::types::Hash256;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::metadata::{AffectedNode, LedgerNode};

use super::sandbox::SandboxLayer;

/// Serialize an entry into its flat field map, splitting off the entry
/// type tag and the threading fields (those are reported at node level).
fn entry_fields(entry: &LedgerEntry) -> (String, Map<String, Value>) {
    let value = serde_json::to_value(entry).unwrap_or(Value::Null);
    let mut map = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let entry_type = map
        .remove("LedgerEntryType")
        .and_then(|tag| tag.as_str().map(String::from))
        .unwrap_or_default();
    map.remove("PreviousTxnID");
    map.remove("PreviousTxnLgrSeq");
    (entry_type, map)
}

/// A field is default when it is zero, empty, or an all-zero hash; such
/// fields are left out of `NewFields`.
fn is_default_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(number) => number.as_u64() == Some(0) || number.as_i64() == Some(0),
        Value::String(text) => {
            text.is_empty()
                || text == "0"
                || (!text.is_empty() && text.len() % 16 == 0 && text.bytes().all(|b| b == b'0'))
        }
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(flag) => !flag,
    }
}

fn strip_defaults(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, value)| !is_default_value(value))
        .collect()
}

/// The prior values of every field that changed. An empty result means
/// the write was a no-op.
fn changed_fields(
    pre: &Map<String, Value>,
    fin: &Map<String, Value>,
) -> Map<String, Value> {
    pre.iter()
        .filter(|(key, value)| fin.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Build the affected-node stream for a layer about to be (or just)
/// committed. Entries whose final value equals their pre-image are
/// dropped.
pub fn build_affected_nodes(layer: &SandboxLayer) -> Vec<AffectedNode> {
    let mut nodes: BTreeMap<Hash256, AffectedNode> = BTreeMap::new();

    for (key, entry) in &layer.inserts {
        let (entry_type, fields) = entry_fields(entry);
        nodes.insert(
            *key,
            AffectedNode::Created(LedgerNode {
                ledger_entry_type: entry_type,
                ledger_index: *key,
                new_fields: Some(Value::Object(strip_defaults(fields))),
                ..Default::default()
            }),
        );
    }

    for key in &layer.deletes {
        let pre = match layer.pre_images.get(key) {
            Some(pre) => pre,
            None => continue,
        };
        let (entry_type, fields) = entry_fields(pre);
        nodes.insert(
            *key,
            AffectedNode::Deleted(LedgerNode {
                ledger_entry_type: entry_type,
                ledger_index: *key,
                final_fields: Some(Value::Object(fields)),
                ..Default::default()
            }),
        );
    }

    for (key, entry) in &layer.mods {
        let pre = match layer.pre_images.get(key) {
            Some(pre) => pre,
            None => continue,
        };
        if pre == entry {
            continue;
        }
        let (entry_type, final_fields) = entry_fields(entry);
        let (_, pre_fields) = entry_fields(pre);
        let previous = changed_fields(&pre_fields, &final_fields);
        let threading = pre.threading();
        nodes.insert(
            *key,
            AffectedNode::Modified(LedgerNode {
                ledger_entry_type: entry_type,
                ledger_index: *key,
                final_fields: Some(Value::Object(final_fields)),
                previous_fields: if previous.is_empty() {
                    None
                } else {
                    Some(Value::Object(previous))
                },
                previous_txn_id: threading.map(|(txn_id, _)| txn_id),
                previous_txn_lgr_seq: threading.map(|(_, seq)| seq),
                ..Default::default()
            }),
        );
    }

    nodes.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keylet;
    use crate::core::types::AccountId;
    use crate::ledger::sandbox::PaymentSandbox;
    use crate::ledger::view::{InMemoryLedger, LedgerView};
    use crate::models::amount::XRPAmount;
    use crate::models::ledger::objects::AccountRoot;

    #[test]
    fn test_modified_node_carries_previous_balance() {
        let account = AccountId([5; 20]);
        let key = keylet::account(&account).key;
        let mut ledger = InMemoryLedger::new();
        ledger
            .insert(
                key,
                LedgerEntry::AccountRoot(AccountRoot {
                    account,
                    balance: XRPAmount(1_000),
                    sequence: 4,
                    ..Default::default()
                }),
            )
            .unwrap();

        let mut sandbox = PaymentSandbox::root(&ledger, Hash256([9; 32]), 7);
        let mut root = sandbox.read(&key).unwrap().into_account_root().unwrap();
        root.balance = XRPAmount(900);
        root.sequence = 5;
        sandbox.update(key, LedgerEntry::AccountRoot(root)).unwrap();

        let mut layer = sandbox.into_layer();
        layer.thread_all(Hash256([9; 32]), 7);
        let nodes = build_affected_nodes(&layer);
        assert_eq!(nodes.len(), 1);
        let node = nodes[0].node();
        assert!(nodes[0].is_modified());
        assert_eq!(node.ledger_entry_type, "AccountRoot");
        let previous = node.previous_fields.as_ref().unwrap();
        assert_eq!(previous["Balance"], "1000");
        assert_eq!(previous["Sequence"], 4);
        let fin = node.final_fields.as_ref().unwrap();
        assert_eq!(fin["Balance"], "900");
    }

    #[test]
    fn test_created_node_strips_defaults() {
        let account = AccountId([5; 20]);
        let key = keylet::account(&account).key;
        let ledger = InMemoryLedger::new();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 7);
        sandbox
            .insert(
                key,
                LedgerEntry::AccountRoot(AccountRoot {
                    account,
                    balance: XRPAmount(20_000_000),
                    sequence: 7,
                    ..Default::default()
                }),
            )
            .unwrap();
        let nodes = build_affected_nodes(&sandbox.into_layer());
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_created());
        let new_fields = nodes[0].node().new_fields.as_ref().unwrap();
        assert_eq!(new_fields["Balance"], "20000000");
        // Zero-valued bookkeeping is omitted from NewFields.
        assert!(new_fields.get("OwnerCount").is_none());
        assert!(new_fields.get("Flags").is_none());
    }
}
