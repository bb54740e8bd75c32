//! The SignerListSet applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::constants::SIGNER_LIST_MAX;
use crate::core::keylet;
use crate::ledger::directory::{dir_insert, dir_remove, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::adjust_owner_count;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::SignerList;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::SignerListSet;
use crate::ter::TransactionResult;

pub fn preflight(tx: &SignerListSet, _rules: &Rules) -> TxResult {
    let entries = tx.signer_entries.as_deref().unwrap_or(&[]);
    if tx.signer_quorum == 0 {
        // Deletion form carries no entries.
        if !entries.is_empty() {
            return Err(TransactionResult::TemMalformed);
        }
        return Ok(());
    }
    if entries.is_empty() || entries.len() > SIGNER_LIST_MAX {
        return Err(TransactionResult::TemMalformed);
    }
    let mut total_weight: u64 = 0;
    for (index, entry) in entries.iter().enumerate() {
        if entry.signer_weight == 0 {
            return Err(TransactionResult::TemBadWeight);
        }
        if entry.account == tx.common_fields.account {
            return Err(TransactionResult::TemBadSigner);
        }
        if entries[..index].iter().any(|held| held.account == entry.account) {
            return Err(TransactionResult::TemBadSigner);
        }
        total_weight += entry.signer_weight as u64;
    }
    if total_weight < tx.signer_quorum as u64 {
        return Err(TransactionResult::TemBadQuorum);
    }
    Ok(())
}

pub fn preclaim(_tx: &SignerListSet, _view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    Ok(())
}

pub fn apply(tx: &SignerListSet, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let keylet = keylet::signer_list(&ctx.account);
    let existing = ctx
        .view
        .peek(&keylet.key)
        .and_then(LedgerEntry::into_signer_list);

    if tx.signer_quorum == 0 {
        let held = existing.ok_or(TransactionResult::TecNoEntry)?;
        dir_remove(
            ctx.view,
            keylet::owner_dir(&ctx.account).key,
            held.owner_node,
            &keylet.key,
            false,
        )
        .map_err(|_| TransactionResult::TefInternal)?;
        ctx.view
            .erase(&keylet.key)
            .map_err(|_| TransactionResult::TefInternal)?;
        adjust_owner_count(ctx.view, &ctx.account, -1)
            .map_err(|_| TransactionResult::TefInternal)?;
        return Ok(());
    }

    let mut entries = tx.signer_entries.clone().unwrap_or_default();
    entries.sort_by(|a, b| a.account.cmp(&b.account));

    match existing {
        Some(mut held) => {
            held.signer_quorum = tx.signer_quorum;
            held.signer_entries = entries;
            ctx.view
                .update(keylet.key, LedgerEntry::SignerList(held))
                .map_err(|_| TransactionResult::TefInternal)?;
        }
        None => {
            ctx.can_afford_new_object(TransactionResult::TecInsufficientReserve)?;
            let mut fresh = SignerList {
                signer_quorum: tx.signer_quorum,
                signer_entries: entries,
                ..Default::default()
            };
            fresh.owner_node = dir_insert(
                ctx.view,
                keylet::owner_dir(&ctx.account).key,
                &DirectoryKind::Owner(ctx.account),
                keylet.key,
            )
            .map_err(|_| TransactionResult::TefInternal)?;
            ctx.view
                .insert(keylet.key, LedgerEntry::SignerList(fresh))
                .map_err(|_| TransactionResult::TefInternal)?;
            adjust_owner_count(ctx.view, &ctx.account, 1)
                .map_err(|_| TransactionResult::TefInternal)?;
        }
    }
    Ok(())
}
