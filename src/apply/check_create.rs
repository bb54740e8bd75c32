//! The CheckCreate applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::{dir_insert, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, adjust_owner_count, is_frozen};
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::{AccountRootFlag, Check};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::CheckCreate;
use crate::ter::TransactionResult;

pub fn preflight(tx: &CheckCreate, _rules: &Rules) -> TxResult {
    if tx.send_max.is_zero() || tx.send_max.is_negative() {
        return Err(TransactionResult::TemBadAmount);
    }
    if tx.destination == tx.common_fields.account {
        return Err(TransactionResult::TemRedundant);
    }
    if tx.expiration == Some(0) {
        return Err(TransactionResult::TemBadExpiration);
    }
    Ok(())
}

pub fn preclaim(tx: &CheckCreate, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let destination =
        account_root(view, &tx.destination).map_err(|_| TransactionResult::TecNoDst)?;
    if destination.has_flag(AccountRootFlag::LsfRequireDestTag) && tx.destination_tag.is_none() {
        return Err(TransactionResult::TecDstTagNeeded);
    }
    if is_frozen(view, &tx.common_fields.account, &tx.send_max.issue()) {
        return Err(TransactionResult::TecFrozen);
    }
    if let Some(expiration) = tx.expiration {
        if expiration <= config.parent_close_time {
            return Err(TransactionResult::TecExpired);
        }
    }
    Ok(())
}

pub fn apply(tx: &CheckCreate, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    ctx.can_afford_new_object(TransactionResult::TecInsufficientReserve)?;

    let keylet = keylet::check(&ctx.account, ctx.seq_consumed);
    let mut check = Check {
        account: ctx.account,
        destination: tx.destination,
        send_max: tx.send_max.clone(),
        sequence: ctx.seq_consumed,
        source_tag: tx.common_fields.source_tag,
        destination_tag: tx.destination_tag,
        expiration: tx.expiration,
        invoice_id: tx.invoice_id,
        ..Default::default()
    };
    check.owner_node = dir_insert(
        ctx.view,
        keylet::owner_dir(&ctx.account).key,
        &DirectoryKind::Owner(ctx.account),
        keylet.key,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    check.destination_node = Some(
        dir_insert(
            ctx.view,
            keylet::owner_dir(&tx.destination).key,
            &DirectoryKind::Owner(tx.destination),
            keylet.key,
        )
        .map_err(|_| TransactionResult::TefInternal)?,
    );
    ctx.view
        .insert(keylet.key, LedgerEntry::Check(check))
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &ctx.account, 1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
