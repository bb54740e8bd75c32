//! The AccountDelete applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::constants::ACCOUNT_DELETE_SEQUENCE_GAP;
use crate::core::keylet;
use crate::ledger::directory::dir_is_empty;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::account_root;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::AccountRootFlag;
use crate::models::transactions::AccountDelete;
use crate::ter::TransactionResult;

pub fn preflight(tx: &AccountDelete, _rules: &Rules) -> TxResult {
    if tx.destination == tx.common_fields.account {
        return Err(TransactionResult::TemDstIsSrc);
    }
    Ok(())
}

pub fn preclaim(tx: &AccountDelete, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let source = account_root(view, &tx.common_fields.account)
        .map_err(|_| TransactionResult::TefInternal)?;
    if !config.standalone {
        let sequence = tx.common_fields.sequence.unwrap_or(source.sequence);
        if sequence.saturating_add(ACCOUNT_DELETE_SEQUENCE_GAP) > config.ledger_sequence {
            return Err(TransactionResult::TecTooSoon);
        }
    }
    if source.owner_count != 0
        || !dir_is_empty(view, keylet::owner_dir(&tx.common_fields.account).key)
    {
        return Err(TransactionResult::TecHasObligations);
    }

    let destination = account_root(view, &tx.destination)
        .map_err(|_| TransactionResult::TecNoDst)?;
    if destination.has_flag(AccountRootFlag::LsfRequireDestTag) && tx.destination_tag.is_none() {
        return Err(TransactionResult::TecDstTagNeeded);
    }
    if destination.has_flag(AccountRootFlag::LsfDepositAuth)
        && !view.exists(
            &keylet::deposit_preauth(&tx.destination, &tx.common_fields.account).key,
        )
    {
        return Err(TransactionResult::TecNoPermission);
    }
    Ok(())
}

pub fn apply(tx: &AccountDelete, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let source = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;
    let mut destination = account_root(ctx.view, &tx.destination)
        .map_err(|_| TransactionResult::TecNoDst)?;

    destination.balance = destination
        .balance
        .checked_add(source.balance)
        .map_err(|_| TransactionResult::TefInternal)?;
    let destination_key = keylet::account(&tx.destination).key;
    ctx.view
        .update(
            destination_key,
            crate::models::ledger::LedgerEntry::AccountRoot(destination),
        )
        .map_err(|_| TransactionResult::TefInternal)?;

    // Any empty owner directory left behind goes too.
    let owner_dir = keylet::owner_dir(&ctx.account).key;
    if ctx.view.exists(&owner_dir) {
        ctx.view
            .erase(&owner_dir)
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    ctx.view
        .erase(&keylet::account(&ctx.account).key)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
