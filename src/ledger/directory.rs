//! Paged doubly-linked directories.
//!
//! A directory is a root page plus zero or more continuation pages, each
//! holding up to 32 entry keys. Owner directories list everything an
//! account owns; book directories list the offers at one exchange rate.

use alloc::vec::Vec;

use crate::constants::DIR_NODE_MAX;
use crate::core::keylet;
use crate::core::types::{Hash256, Issue};
use crate::models::ledger::objects::DirectoryNode;
use crate::models::ledger::LedgerEntry;

use super::view::{LedgerView, ViewError, ViewResult};

/// The kind-specific fields stamped onto every page of a directory.
#[derive(Debug, Clone)]
pub enum DirectoryKind {
    Owner(crate::core::types::AccountId),
    Book { pays: Issue, gets: Issue, rate: u64 },
    /// NFToken offer directories carry no extra fields.
    Plain,
}

fn blank_page(root: Hash256, kind: &DirectoryKind) -> DirectoryNode {
    let mut page = DirectoryNode {
        root_index: root,
        ..Default::default()
    };
    match kind {
        DirectoryKind::Owner(owner) => page.owner = Some(*owner),
        DirectoryKind::Book { pays, gets, rate } => {
            page.taker_pays_currency = Some(pays.currency);
            page.taker_pays_issuer = Some(pays.issuer);
            page.taker_gets_currency = Some(gets.currency);
            page.taker_gets_issuer = Some(gets.issuer);
            page.exchange_rate = Some(*rate);
        }
        DirectoryKind::Plain => {}
    }
    page
}

fn read_page(view: &dyn LedgerView, root: Hash256, number: u64) -> ViewResult<DirectoryNode> {
    let entry = view.read(&keylet::dir_page(root, number).key)?;
    entry
        .into_directory_node()
        .ok_or_else(|| ViewError::Internal(alloc::format!("{root} page {number} is not a directory")))
}

/// Add `index` to the directory rooted at `root`, creating pages as
/// needed. Returns the page number holding the new entry, the hint the
/// entry stores as its `OwnerNode`/`BookNode`.
pub fn dir_insert(
    view: &mut dyn LedgerView,
    root: Hash256,
    kind: &DirectoryKind,
    index: Hash256,
) -> ViewResult<u64> {
    if !view.exists(&root) {
        let mut page = blank_page(root, kind);
        page.indexes.push(index);
        view.insert(root, LedgerEntry::DirectoryNode(page))?;
        return Ok(0);
    }

    // Walk to the last page.
    let mut number = 0u64;
    let mut page = read_page(view, root, 0)?;
    while let Some(next) = page.index_next {
        number = next;
        page = read_page(view, root, number)?;
    }

    if page.indexes.len() < DIR_NODE_MAX {
        page.indexes.push(index);
        view.update(keylet::dir_page(root, number).key, LedgerEntry::DirectoryNode(page))?;
        return Ok(number);
    }

    // Last page is full: append a fresh one.
    let fresh_number = number
        .checked_add(1)
        .ok_or_else(|| ViewError::Internal(alloc::string::String::from("directory page overflow")))?;
    page.index_next = Some(fresh_number);
    view.update(keylet::dir_page(root, number).key, LedgerEntry::DirectoryNode(page))?;

    let mut fresh = blank_page(root, kind);
    fresh.index_previous = Some(number);
    fresh.indexes.push(index);
    view.insert(
        keylet::dir_page(root, fresh_number).key,
        LedgerEntry::DirectoryNode(fresh),
    )?;
    Ok(fresh_number)
}

/// Remove `index` from the page hinted by `hint`, collapsing the page when
/// it empties. Returns true when the whole directory is gone afterwards.
/// `keep_root` leaves an empty root in place (owner directories persist
/// while the account exists elsewhere in this transaction).
pub fn dir_remove(
    view: &mut dyn LedgerView,
    root: Hash256,
    hint: u64,
    index: &Hash256,
    keep_root: bool,
) -> ViewResult<bool> {
    let mut page = read_page(view, root, hint)?;
    let position = page
        .indexes
        .iter()
        .position(|held| held == index)
        .ok_or_else(|| {
            ViewError::Internal(alloc::format!("{index} not in directory {root} page {hint}"))
        })?;
    page.indexes.remove(position);

    let page_key = keylet::dir_page(root, hint).key;

    if !page.indexes.is_empty() {
        view.update(page_key, LedgerEntry::DirectoryNode(page))?;
        return Ok(false);
    }

    if hint == 0 {
        // The root page emptied. It can only go away once no continuation
        // pages remain.
        if page.index_next.is_none() {
            if keep_root {
                view.update(page_key, LedgerEntry::DirectoryNode(page))?;
                return Ok(false);
            }
            view.erase(&page_key)?;
            return Ok(true);
        }
        view.update(page_key, LedgerEntry::DirectoryNode(page))?;
        return Ok(false);
    }

    // Unlink an interior or tail page.
    let previous = page.index_previous;
    let next = page.index_next;
    if let Some(previous_number) = previous {
        let mut previous_page = read_page(view, root, previous_number)?;
        previous_page.index_next = next;
        view.update(
            keylet::dir_page(root, previous_number).key,
            LedgerEntry::DirectoryNode(previous_page),
        )?;
    }
    if let Some(next_number) = next {
        let mut next_page = read_page(view, root, next_number)?;
        next_page.index_previous = previous;
        view.update(
            keylet::dir_page(root, next_number).key,
            LedgerEntry::DirectoryNode(next_page),
        )?;
    }
    view.erase(&page_key)?;

    // Report emptiness from the root's point of view.
    let root_page = read_page(view, root, 0)?;
    let empty = root_page.indexes.is_empty() && root_page.index_next.is_none();
    if empty && !keep_root {
        view.erase(&root)?;
        return Ok(true);
    }
    Ok(false)
}

/// Every index held by the directory, in page link order then page order.
pub fn dir_indexes(view: &dyn LedgerView, root: Hash256) -> ViewResult<Vec<Hash256>> {
    let mut indexes = Vec::new();
    if !view.exists(&root) {
        return Ok(indexes);
    }
    let mut number = 0u64;
    loop {
        let page = read_page(view, root, number)?;
        indexes.extend_from_slice(&page.indexes);
        match page.index_next {
            Some(next) => number = next,
            None => break,
        }
    }
    Ok(indexes)
}

pub fn dir_is_empty(view: &dyn LedgerView, root: Hash256) -> bool {
    match view.peek(&root) {
        None => true,
        Some(entry) => entry
            .as_directory_node()
            .map(|page| page.indexes.is_empty() && page.index_next.is_none())
            .unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AccountId;
    use crate::ledger::view::InMemoryLedger;

    fn index(byte: u8) -> Hash256 {
        Hash256([byte; 32])
    }

    fn owner_kind() -> DirectoryKind {
        DirectoryKind::Owner(AccountId([7; 20]))
    }

    #[test]
    fn test_insert_creates_root() {
        let mut ledger = InMemoryLedger::new();
        let root = index(0xAA);
        let hint = dir_insert(&mut ledger, root, &owner_kind(), index(1)).unwrap();
        assert_eq!(hint, 0);
        assert_eq!(dir_indexes(&ledger, root).unwrap(), alloc::vec![index(1)]);
    }

    #[test]
    fn test_pages_spill_and_link() {
        let mut ledger = InMemoryLedger::new();
        let root = index(0xAA);
        for i in 0..DIR_NODE_MAX as u8 {
            assert_eq!(
                dir_insert(&mut ledger, root, &owner_kind(), index(i)).unwrap(),
                0
            );
        }
        let hint = dir_insert(&mut ledger, root, &owner_kind(), index(200)).unwrap();
        assert_eq!(hint, 1);
        let all = dir_indexes(&ledger, root).unwrap();
        assert_eq!(all.len(), DIR_NODE_MAX + 1);
        assert_eq!(*all.last().unwrap(), index(200));
    }

    #[test]
    fn test_remove_collapses_tail_page() {
        let mut ledger = InMemoryLedger::new();
        let root = index(0xAA);
        for i in 0..DIR_NODE_MAX as u8 {
            dir_insert(&mut ledger, root, &owner_kind(), index(i)).unwrap();
        }
        let hint = dir_insert(&mut ledger, root, &owner_kind(), index(200)).unwrap();
        assert!(!dir_remove(&mut ledger, root, hint, &index(200), false).unwrap());
        let page = ledger
            .read(&root)
            .unwrap()
            .into_directory_node()
            .unwrap();
        assert_eq!(page.index_next, None);
    }

    #[test]
    fn test_remove_last_entry_erases_directory() {
        let mut ledger = InMemoryLedger::new();
        let root = index(0xAA);
        dir_insert(&mut ledger, root, &owner_kind(), index(1)).unwrap();
        assert!(dir_remove(&mut ledger, root, 0, &index(1), false).unwrap());
        assert!(!ledger.exists(&root));
        assert!(dir_is_empty(&ledger, root));
    }
}
