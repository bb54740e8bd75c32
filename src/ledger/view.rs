//! The polymorphic handle all appliers program against.

use alloc::collections::BTreeMap;
use alloc::string::String;
use thiserror_no_std::Error;

use crate::core::types::Hash256;
use crate::models::ledger::LedgerEntry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("entry not found")]
    NotFound,
    #[error("backing store failure: {0}")]
    Internal(String),
}

pub type ViewResult<T> = Result<T, ViewError>;

/// Read and write access to ledger entries keyed by 256-bit hashes. The
/// backing store is pluggable; the engine holds exclusive access for the
/// duration of one transaction.
pub trait LedgerView {
    /// The entry at `key`, or `NotFound`.
    fn read(&self, key: &Hash256) -> ViewResult<LedgerEntry>;

    fn exists(&self, key: &Hash256) -> bool;

    /// Add a new entry. The key must not already be present.
    fn insert(&mut self, key: Hash256, entry: LedgerEntry) -> ViewResult<()>;

    /// Replace an existing entry.
    fn update(&mut self, key: Hash256, entry: LedgerEntry) -> ViewResult<()>;

    /// Remove an existing entry.
    fn erase(&mut self, key: &Hash256) -> ViewResult<()>;

    fn for_each(&self, f: &mut dyn FnMut(&Hash256, &LedgerEntry));

    /// Record drops burned by fees or account deletion.
    fn adjust_drops_destroyed(&mut self, delta: u64);

    fn drops_destroyed(&self) -> u64;

    /// `read` flattened to an option; backing failures read as absent.
    fn peek(&self, key: &Hash256) -> Option<LedgerEntry> {
        self.read(key).ok()
    }

    /// The smallest key in the inclusive range `[start, last]`. Directory
    /// walks use this to step through book pages in quality order.
    fn succ(&self, start: &Hash256, last: &Hash256) -> Option<Hash256> {
        let mut best: Option<Hash256> = None;
        self.for_each(&mut |key, _| {
            if key >= start && key <= last && best.map_or(true, |found| *key < found) {
                best = Some(*key);
            }
        });
        best
    }
}

/// The reference backing store: a sorted map in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedger {
    entries: BTreeMap<Hash256, LedgerEntry>,
    drops_destroyed: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerView for InMemoryLedger {
    fn read(&self, key: &Hash256) -> ViewResult<LedgerEntry> {
        self.entries.get(key).cloned().ok_or(ViewError::NotFound)
    }

    fn exists(&self, key: &Hash256) -> bool {
        self.entries.contains_key(key)
    }

    fn insert(&mut self, key: Hash256, entry: LedgerEntry) -> ViewResult<()> {
        if self.entries.contains_key(&key) {
            return Err(ViewError::Internal(alloc::format!(
                "insert over existing entry {key}"
            )));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    fn update(&mut self, key: Hash256, entry: LedgerEntry) -> ViewResult<()> {
        match self.entries.get_mut(&key) {
            Some(slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(ViewError::NotFound),
        }
    }

    fn erase(&mut self, key: &Hash256) -> ViewResult<()> {
        self.entries.remove(key).map(|_| ()).ok_or(ViewError::NotFound)
    }

    fn for_each(&self, f: &mut dyn FnMut(&Hash256, &LedgerEntry)) {
        for (key, entry) in &self.entries {
            f(key, entry);
        }
    }

    fn adjust_drops_destroyed(&mut self, delta: u64) {
        self.drops_destroyed = self.drops_destroyed.saturating_add(delta);
    }

    fn drops_destroyed(&self) -> u64 {
        self.drops_destroyed
    }

    fn succ(&self, start: &Hash256, last: &Hash256) -> Option<Hash256> {
        self.entries
            .range(*start..=*last)
            .next()
            .map(|(key, _)| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ledger::objects::AccountRoot;

    fn key(byte: u8) -> Hash256 {
        Hash256([byte; 32])
    }

    fn entry() -> LedgerEntry {
        LedgerEntry::AccountRoot(AccountRoot::default())
    }

    #[test]
    fn test_crud() {
        let mut ledger = InMemoryLedger::new();
        assert_eq!(ledger.read(&key(1)), Err(ViewError::NotFound));
        ledger.insert(key(1), entry()).unwrap();
        assert!(ledger.exists(&key(1)));
        assert!(ledger.insert(key(1), entry()).is_err());
        ledger.update(key(1), entry()).unwrap();
        assert!(ledger.update(key(2), entry()).is_err());
        ledger.erase(&key(1)).unwrap();
        assert_eq!(ledger.erase(&key(1)), Err(ViewError::NotFound));
    }

    #[test]
    fn test_succ_walks_in_key_order() {
        let mut ledger = InMemoryLedger::new();
        ledger.insert(key(3), entry()).unwrap();
        ledger.insert(key(7), entry()).unwrap();
        assert_eq!(ledger.succ(&key(0), &key(9)), Some(key(3)));
        assert_eq!(ledger.succ(&key(4), &key(9)), Some(key(7)));
        assert_eq!(ledger.succ(&key(8), &key(9)), None);
    }
}
