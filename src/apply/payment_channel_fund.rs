//! The PaymentChannelFund applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{update_account_root, xrp_liquid};
use crate::ledger::view::LedgerView;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::PaymentChannelFund;
use crate::ter::TransactionResult;

pub fn preflight(tx: &PaymentChannelFund, _rules: &Rules) -> TxResult {
    if tx.amount.is_zero() {
        return Err(TransactionResult::TemBadAmount);
    }
    if tx.expiration == Some(0) {
        return Err(TransactionResult::TemBadExpiration);
    }
    Ok(())
}

pub fn preclaim(tx: &PaymentChannelFund, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let channel = view
        .peek(&tx.channel)
        .and_then(LedgerEntry::into_pay_channel)
        .ok_or(TransactionResult::TecNoEntry)?;
    if channel.account != tx.common_fields.account {
        return Err(TransactionResult::TecNoPermission);
    }
    if let Some(cancel_after) = channel.cancel_after {
        if cancel_after <= config.parent_close_time {
            return Err(TransactionResult::TecExpired);
        }
    }
    Ok(())
}

pub fn apply(tx: &PaymentChannelFund, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let mut channel = ctx
        .view
        .peek(&tx.channel)
        .and_then(LedgerEntry::into_pay_channel)
        .ok_or(TransactionResult::TecNoEntry)?;

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

    channel.amount = channel
        .amount
        .checked_add(tx.amount)
        .map_err(|_| TransactionResult::TefInternal)?;
    if let Some(expiration) = tx.expiration {
        // An expiration can only be pushed out far enough to honor the
        // settle delay.
        let earliest = ctx
            .config
            .parent_close_time
            .saturating_add(channel.settle_delay);
        if expiration < earliest {
            return Err(TransactionResult::TemBadExpiration);
        }
        channel.expiration = Some(expiration);
    }
    ctx.view
        .update(tx.channel, LedgerEntry::PayChannel(channel))
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
