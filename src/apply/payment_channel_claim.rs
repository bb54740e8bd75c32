//! The PaymentChannelClaim applier: pay out, renew, or close a channel.
//! Claim signatures are verified upstream; this layer enforces the
//! monotonic balance and the close protocol.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::dir_remove;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, adjust_owner_count};
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::{AccountRootFlag, PayChannel};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::{PaymentChannelClaim, PaymentChannelClaimFlag};
use crate::ter::TransactionResult;

pub fn preflight(tx: &PaymentChannelClaim, _rules: &Rules) -> TxResult {
    if tx.has_flag(PaymentChannelClaimFlag::TfRenew)
        && tx.has_flag(PaymentChannelClaimFlag::TfClose)
    {
        return Err(TransactionResult::TemInvalidFlag);
    }
    Ok(())
}

pub fn preclaim(tx: &PaymentChannelClaim, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    let channel = view
        .peek(&tx.channel)
        .and_then(LedgerEntry::into_pay_channel)
        .ok_or(TransactionResult::TecNoEntry)?;
    let sender = tx.common_fields.account;
    if sender != channel.account && sender != channel.destination {
        return Err(TransactionResult::TecNoPermission);
    }
    Ok(())
}

fn close_channel(
    ctx: &mut ApplyContext<'_, '_>,
    channel: &PayChannel,
    key: crate::core::types::Hash256,
) -> TxResult {
    // The unclaimed remainder goes home and the reserve is released.
    let remainder = channel.remaining();
    if !remainder.is_zero() {
        let mut owner = account_root(ctx.view, &channel.account)
            .map_err(|_| TransactionResult::TefInternal)?;
        owner.balance = owner
            .balance
            .checked_add(remainder)
            .map_err(|_| TransactionResult::TefInternal)?;
        crate::ledger::transfer::update_account_root(ctx.view, owner)
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    dir_remove(
        ctx.view,
        keylet::owner_dir(&channel.account).key,
        channel.owner_node,
        &key,
        false,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    ctx.view
        .erase(&key)
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &channel.account, -1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}

pub fn apply(tx: &PaymentChannelClaim, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let mut channel = ctx
        .view
        .peek(&tx.channel)
        .and_then(LedgerEntry::into_pay_channel)
        .ok_or(TransactionResult::TecNoEntry)?;
    let sender = ctx.account;
    let is_owner = sender == channel.account;

    // An expired channel can only be torn down.
    if let Some(expiration) = channel.expiration {
        if expiration <= ctx.config.parent_close_time {
            return close_channel(ctx, &channel, tx.channel);
        }
    }

    if let Some(balance) = tx.balance {
        let delta = balance
            .checked_sub(channel.balance)
            .map_err(|_| TransactionResult::TecUnfundedPayment)?;
        if delta.is_zero() || balance > channel.amount {
            return Err(TransactionResult::TecUnfundedPayment);
        }
        if let Some(authorized) = tx.amount {
            if balance > authorized {
                return Err(TransactionResult::TecUnfundedPayment);
            }
        }
        let destination = account_root(ctx.view, &channel.destination)
            .map_err(|_| TransactionResult::TecNoDst)?;
        if destination.has_flag(AccountRootFlag::LsfDepositAuth)
            && sender != channel.destination
            && !ctx.view.exists(
                &keylet::deposit_preauth(&channel.destination, &sender).key,
            )
        {
            return Err(TransactionResult::TecNoPermission);
        }

        // Move the claimed delta out of escrow to the destination.
        channel.balance = balance;
        ctx.view
            .update(tx.channel, LedgerEntry::PayChannel(channel.clone()))
            .map_err(|_| TransactionResult::TefInternal)?;
        let mut destination = destination;
        destination.balance = destination
            .balance
            .checked_add(delta)
            .map_err(|_| TransactionResult::TefInternal)?;
        crate::ledger::transfer::update_account_root(ctx.view, destination)
            .map_err(|_| TransactionResult::TefInternal)?;
    }

    if tx.has_flag(PaymentChannelClaimFlag::TfRenew) {
        if !is_owner {
            return Err(TransactionResult::TecNoPermission);
        }
        channel.expiration = None;
        ctx.view
            .update(tx.channel, LedgerEntry::PayChannel(channel.clone()))
            .map_err(|_| TransactionResult::TefInternal)?;
    }

    if tx.has_flag(PaymentChannelClaimFlag::TfClose) {
        // The destination closes immediately; the owner closes at once
        // only when nothing is left to claim, otherwise the settle delay
        // starts ticking.
        if !is_owner || channel.remaining().is_zero() {
            return close_channel(ctx, &channel, tx.channel);
        }
        channel.expiration = Some(
            ctx.config
                .parent_close_time
                .saturating_add(channel.settle_delay),
        );
        ctx.view
            .update(tx.channel, LedgerEntry::PayChannel(channel))
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    Ok(())
}
