//! The DepositPreauth applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::{dir_insert, dir_remove, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::adjust_owner_count;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::DepositPreauth as DepositPreauthEntry;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::DepositPreauth;
use crate::ter::TransactionResult;

pub fn preflight(tx: &DepositPreauth, _rules: &Rules) -> TxResult {
    match (&tx.authorize, &tx.unauthorize) {
        (Some(_), Some(_)) | (None, None) => return Err(TransactionResult::TemMalformed),
        _ => {}
    }
    if tx.authorize == Some(tx.common_fields.account) {
        return Err(TransactionResult::TemCannotPreauthSelf);
    }
    Ok(())
}

pub fn preclaim(tx: &DepositPreauth, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    if let Some(authorized) = &tx.authorize {
        if !view.exists(&keylet::account(authorized).key) {
            return Err(TransactionResult::TecNoTarget);
        }
    }
    Ok(())
}

pub fn apply(tx: &DepositPreauth, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    if let Some(authorized) = &tx.authorize {
        let keylet = keylet::deposit_preauth(&ctx.account, authorized);
        if ctx.view.exists(&keylet.key) {
            return Err(TransactionResult::TecDuplicate);
        }
        ctx.can_afford_new_object(TransactionResult::TecInsufficientReserve)?;
        let mut entry = DepositPreauthEntry {
            account: ctx.account,
            authorize: *authorized,
            ..Default::default()
        };
        entry.owner_node = dir_insert(
            ctx.view,
            keylet::owner_dir(&ctx.account).key,
            &DirectoryKind::Owner(ctx.account),
            keylet.key,
        )
        .map_err(|_| TransactionResult::TefInternal)?;
        ctx.view
            .insert(keylet.key, LedgerEntry::DepositPreauth(entry))
            .map_err(|_| TransactionResult::TefInternal)?;
        adjust_owner_count(ctx.view, &ctx.account, 1)
            .map_err(|_| TransactionResult::TefInternal)?;
    } else if let Some(revoked) = &tx.unauthorize {
        let keylet = keylet::deposit_preauth(&ctx.account, revoked);
        let entry = ctx
            .view
            .peek(&keylet.key)
            .and_then(LedgerEntry::into_deposit_preauth)
            .ok_or(TransactionResult::TecNoEntry)?;
        dir_remove(
            ctx.view,
            keylet::owner_dir(&ctx.account).key,
            entry.owner_node,
            &keylet.key,
            false,
        )
        .map_err(|_| TransactionResult::TefInternal)?;
        ctx.view
            .erase(&keylet.key)
            .map_err(|_| TransactionResult::TefInternal)?;
        adjust_owner_count(ctx.view, &ctx.account, -1)
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    Ok(())
}
