//! The CheckCancel applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::dir_remove;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::adjust_owner_count;
use crate::ledger::view::LedgerView;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::CheckCancel;
use crate::ter::TransactionResult;

pub fn preflight(_tx: &CheckCancel, _rules: &Rules) -> TxResult {
    Ok(())
}

pub fn preclaim(tx: &CheckCancel, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let check = view
        .peek(&tx.check_id)
        .and_then(LedgerEntry::into_check)
        .ok_or(TransactionResult::TecNoEntry)?;
    let sender = tx.common_fields.account;
    // Until expiry only the parties may cancel; afterwards anyone.
    if !check.is_expired(config.parent_close_time)
        && sender != check.account
        && sender != check.destination
    {
        return Err(TransactionResult::TecNoPermission);
    }
    Ok(())
}

pub fn apply(tx: &CheckCancel, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let check = ctx
        .view
        .peek(&tx.check_id)
        .and_then(LedgerEntry::into_check)
        .ok_or(TransactionResult::TecNoEntry)?;
    dir_remove(
        ctx.view,
        keylet::owner_dir(&check.account).key,
        check.owner_node,
        &tx.check_id,
        false,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    if let Some(destination_node) = check.destination_node {
        dir_remove(
            ctx.view,
            keylet::owner_dir(&check.destination).key,
            destination_node,
            &tx.check_id,
            false,
        )
        .map_err(|_| TransactionResult::TefInternal)?;
    }
    ctx.view
        .erase(&tx.check_id)
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &check.account, -1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
