//! The NFToken page allocator: up to 32 tokens per page, sorted by id,
//! pages linked so one owner's collection reads in order. An owner's
//! highest page always sits at the fixed maximum key; splits peel lower
//! pages off below it.

use crate::constants::NFTOKEN_PAGE_MAX;
use crate::core::keylet;
use crate::core::types::{AccountId, Hash256};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::adjust_owner_count;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::{NFToken, NFTokenPage};
use crate::models::ledger::LedgerEntry;
use crate::ter::TransactionResult;
use crate::utils::nftoken_id::token_group;

fn read_page(
    sandbox: &PaymentSandbox<'_>,
    key: &Hash256,
) -> Result<NFTokenPage, TransactionResult> {
    sandbox
        .peek(key)
        .and_then(LedgerEntry::into_nftoken_page)
        .ok_or(TransactionResult::TefInternal)
}

/// The page that holds (or would hold) `token` for `owner`.
fn locate_page(
    sandbox: &PaymentSandbox<'_>,
    owner: &AccountId,
    token: &Hash256,
) -> Option<Hash256> {
    let start = keylet::nftoken_page(owner, token).key;
    let end = keylet::nftoken_page_max(owner).key;
    sandbox.succ(&start, &end)
}

pub fn find_token(
    sandbox: &PaymentSandbox<'_>,
    owner: &AccountId,
    token_id: &Hash256,
) -> Option<NFToken> {
    let page_key = locate_page(sandbox, owner, token_id)?;
    let page = sandbox
        .peek(&page_key)
        .and_then(LedgerEntry::into_nftoken_page)?;
    page.nftokens
        .into_iter()
        .find(|held| held.nftoken_id == *token_id)
}

/// Split a full page: the lower half moves to a new page keyed by its
/// last token. The split point stays near the midpoint but never divides
/// tokens that share a low-96-bit group; a page of one uniform group
/// cannot split at all.
fn split_point(tokens: &[NFToken]) -> Result<usize, TransactionResult> {
    let midpoint = tokens.len() / 2;
    let boundary_at = |index: usize| {
        token_group(&tokens[index - 1].nftoken_id) != token_group(&tokens[index].nftoken_id)
    };
    // Ranging through the midpoint itself reaches both ends of the list,
    // so a single boundary at the last position still splits.
    for offset in 0..=midpoint {
        if midpoint + offset < tokens.len() && boundary_at(midpoint + offset) {
            return Ok(midpoint + offset);
        }
        if midpoint >= offset + 1 && boundary_at(midpoint - offset) {
            return Ok(midpoint - offset);
        }
    }
    Err(TransactionResult::TecNoSuitableNFTokenPage)
}

/// Insert one token into the owner's pages, creating or splitting pages
/// as needed. Each page counts toward the owner's reserve.
pub fn insert_token(
    sandbox: &mut PaymentSandbox<'_>,
    owner: &AccountId,
    token: NFToken,
) -> Result<(), TransactionResult> {
    let max_key = keylet::nftoken_page_max(owner).key;
    let page_key = match locate_page(sandbox, owner, &token.nftoken_id) {
        Some(key) => key,
        None => {
            // First page for this owner.
            let page = NFTokenPage {
                nftokens: alloc::vec![token],
                ..Default::default()
            };
            sandbox
                .insert(max_key, LedgerEntry::NFTokenPage(page))
                .map_err(|_| TransactionResult::TefInternal)?;
            adjust_owner_count(sandbox, owner, 1)
                .map_err(|_| TransactionResult::TefInternal)?;
            return Ok(());
        }
    };

    let mut page = read_page(sandbox, &page_key)?;
    let position = page
        .nftokens
        .binary_search_by(|held| held.nftoken_id.cmp(&token.nftoken_id))
        .err()
        .ok_or(TransactionResult::TefInternal)?;

    if page.nftokens.len() < NFTOKEN_PAGE_MAX {
        page.nftokens.insert(position, token);
        sandbox
            .update(page_key, LedgerEntry::NFTokenPage(page))
            .map_err(|_| TransactionResult::TefInternal)?;
        return Ok(());
    }

    // Full page: split around the midpoint.
    let mut combined = page.nftokens.clone();
    combined.insert(position, token);
    let at = split_point(&combined)?;
    let upper = combined.split_off(at);
    let lower = combined;

    let lower_key = keylet::nftoken_page(
        owner,
        &lower
            .last()
            .ok_or(TransactionResult::TefInternal)?
            .nftoken_id,
    )
    .key;

    let lower_page = NFTokenPage {
        nftokens: lower,
        next_page_min: Some(page_key),
        previous_page_min: page.previous_page_min,
        ..Default::default()
    };
    if let Some(previous_key) = page.previous_page_min {
        let mut previous = read_page(sandbox, &previous_key)?;
        previous.next_page_min = Some(lower_key);
        sandbox
            .update(previous_key, LedgerEntry::NFTokenPage(previous))
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    page.nftokens = upper;
    page.previous_page_min = Some(lower_key);
    sandbox
        .update(page_key, LedgerEntry::NFTokenPage(page))
        .map_err(|_| TransactionResult::TefInternal)?;
    sandbox
        .insert(lower_key, LedgerEntry::NFTokenPage(lower_page))
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(sandbox, owner, 1).map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}

/// Remove one token, collapsing its page when it empties.
pub fn remove_token(
    sandbox: &mut PaymentSandbox<'_>,
    owner: &AccountId,
    token_id: &Hash256,
) -> Result<NFToken, TransactionResult> {
    let page_key =
        locate_page(sandbox, owner, token_id).ok_or(TransactionResult::TecNoEntry)?;
    let mut page = read_page(sandbox, &page_key)?;
    let position = page
        .nftokens
        .iter()
        .position(|held| held.nftoken_id == *token_id)
        .ok_or(TransactionResult::TecNoEntry)?;
    let removed = page.nftokens.remove(position);

    if !page.nftokens.is_empty() {
        sandbox
            .update(page_key, LedgerEntry::NFTokenPage(page))
            .map_err(|_| TransactionResult::TefInternal)?;
        return Ok(removed);
    }

    // Unlink the empty page.
    if let Some(previous_key) = page.previous_page_min {
        let mut previous = read_page(sandbox, &previous_key)?;
        previous.next_page_min = page.next_page_min;
        sandbox
            .update(previous_key, LedgerEntry::NFTokenPage(previous))
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    if let Some(next_key) = page.next_page_min {
        let mut next = read_page(sandbox, &next_key)?;
        next.previous_page_min = page.previous_page_min;
        sandbox
            .update(next_key, LedgerEntry::NFTokenPage(next))
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    sandbox
        .erase(&page_key)
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(sandbox, owner, -1).map_err(|_| TransactionResult::TefInternal)?;
    Ok(removed)
}
