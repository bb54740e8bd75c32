//! The PaymentChannelCreate applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::{dir_insert, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::view::LedgerView;
use crate::ledger::transfer::{
    account_root, adjust_owner_count, update_account_root, xrp_liquid,
};
use crate::models::ledger::objects::{AccountRootFlag, PayChannel};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::PaymentChannelCreate;
use crate::ter::TransactionResult;

pub fn preflight(tx: &PaymentChannelCreate, _rules: &Rules) -> TxResult {
    if tx.amount.is_zero() {
        return Err(TransactionResult::TemBadAmount);
    }
    if tx.destination == tx.common_fields.account {
        return Err(TransactionResult::TemDstIsSrc);
    }
    if tx.public_key.is_empty() {
        return Err(TransactionResult::TemMalformed);
    }
    Ok(())
}

pub fn preclaim(tx: &PaymentChannelCreate, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    let destination =
        account_root(view, &tx.destination).map_err(|_| TransactionResult::TecNoDst)?;
    if destination.has_flag(AccountRootFlag::LsfRequireDestTag) && tx.destination_tag.is_none() {
        return Err(TransactionResult::TecDstTagNeeded);
    }
    if destination.has_flag(AccountRootFlag::LsfDisallowXRP) {
        return Err(TransactionResult::TecNoTarget);
    }
    Ok(())
}

pub fn apply(tx: &PaymentChannelCreate, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    ctx.can_afford_new_object(TransactionResult::TecInsufficientReserve)?;

    let liquid = xrp_liquid(ctx.view, &ctx.account, ctx.config)
        .map_err(|_| TransactionResult::TefInternal)?;
    if tx.amount > liquid {
        return Err(TransactionResult::TecUnfundedPayment);
    }
    let mut source = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;
    source.balance = source
        .balance
        .checked_sub(tx.amount)
        .map_err(|_| TransactionResult::TecUnfundedPayment)?;
    update_account_root(ctx.view, source).map_err(|_| TransactionResult::TefInternal)?;

    let keylet = keylet::pay_channel(&ctx.account, &tx.destination, ctx.seq_consumed);
    let mut channel = PayChannel {
        account: ctx.account,
        destination: tx.destination,
        amount: tx.amount,
        settle_delay: tx.settle_delay,
        public_key: Some(tx.public_key.clone()),
        source_tag: tx.common_fields.source_tag,
        destination_tag: tx.destination_tag,
        cancel_after: tx.cancel_after,
        ..Default::default()
    };
    channel.owner_node = dir_insert(
        ctx.view,
        keylet::owner_dir(&ctx.account).key,
        &DirectoryKind::Owner(ctx.account),
        keylet.key,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    ctx.view
        .insert(keylet.key, LedgerEntry::PayChannel(channel))
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &ctx.account, 1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
