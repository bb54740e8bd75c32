//! The Payment applier: native transfers, single-line issued transfers,
//! and path-based delivery through the flow engine.

use bigdecimal::Zero;
use log::debug;

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::core::types::Quality;
use crate::flow::{flow, FlowParams};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{
    account_root, is_deep_frozen, is_frozen, send_xrp, transfer_iou, update_account_root,
};
use crate::ledger::view::LedgerView;
use crate::models::amount::{Amount, XRPAmount};
use crate::models::ledger::objects::{AccountRoot, AccountRootFlag, RippleStateFlag};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::{Payment, PaymentFlag};
use crate::ter::TransactionResult;

fn is_xrp_to_xrp(tx: &Payment) -> bool {
    tx.amount.is_xrp() && tx.send_max.as_ref().map_or(true, Amount::is_xrp)
}

pub fn preflight(tx: &Payment, _rules: &Rules) -> TxResult {
    if tx.amount.is_zero() || tx.amount.is_negative() {
        return Err(TransactionResult::TemBadAmount);
    }
    if let Some(send_max) = &tx.send_max {
        if send_max.is_zero() || send_max.is_negative() {
            return Err(TransactionResult::TemBadAmount);
        }
    }
    let xrp_direct = is_xrp_to_xrp(tx);
    if xrp_direct {
        if tx.send_max.is_some() {
            return Err(TransactionResult::TemBadSendXrpMax);
        }
        if tx.has_flag(PaymentFlag::TfPartialPayment) {
            return Err(TransactionResult::TemBadSendXrpPartial);
        }
        if tx.has_flag(PaymentFlag::TfNoRippleDirect) {
            return Err(TransactionResult::TemBadSendXrpNoDirect);
        }
        if tx.paths.as_ref().map_or(false, |paths| !paths.is_empty()) {
            return Err(TransactionResult::TemBadPath);
        }
    }
    if tx.deliver_min.is_some() && !tx.has_flag(PaymentFlag::TfPartialPayment) {
        return Err(TransactionResult::TemBadAmount);
    }
    if let Some(deliver_min) = &tx.deliver_min {
        if deliver_min.is_zero() || deliver_min.is_negative() {
            return Err(TransactionResult::TemBadAmount);
        }
        if deliver_min.issue() != tx.amount.issue() {
            return Err(TransactionResult::TemBadAmount);
        }
    }
    if tx.destination == tx.common_fields.account
        && tx.send_max.as_ref().map_or(true, |send_max| {
            send_max.issue() == tx.amount.issue()
        })
    {
        return Err(TransactionResult::TemRedundant);
    }
    Ok(())
}

pub fn preclaim(tx: &Payment, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let destination_key = keylet::account(&tx.destination).key;
    match view.peek(&destination_key).and_then(LedgerEntry::into_account_root) {
        None => {
            // Only a large enough native payment may create an account.
            match &tx.amount {
                Amount::XRPAmount(drops) => {
                    if !is_xrp_to_xrp(tx) {
                        return Err(TransactionResult::TecNoDst);
                    }
                    if drops.0 < config.reserve_base {
                        return Err(TransactionResult::TecNoDstInsufXrp);
                    }
                }
                Amount::IssuedCurrencyAmount(_) => return Err(TransactionResult::TecNoDst),
            }
        }
        Some(destination) => {
            if destination.has_flag(AccountRootFlag::LsfRequireDestTag)
                && tx.destination_tag.is_none()
            {
                return Err(TransactionResult::TecDstTagNeeded);
            }
            if tx.amount.is_xrp() && destination.has_flag(AccountRootFlag::LsfDisallowXRP) {
                return Err(TransactionResult::TecNoTarget);
            }
            if destination.has_flag(AccountRootFlag::LsfDepositAuth)
                && tx.destination != tx.common_fields.account
                && !view.exists(
                    &keylet::deposit_preauth(&tx.destination, &tx.common_fields.account).key,
                )
            {
                // The wedge exception: tiny native payments may top up a
                // destination sitting at or below the base reserve.
                let tiny = matches!(&tx.amount, Amount::XRPAmount(drops)
                    if drops.0 <= config.reserve_base);
                let wedged = destination.balance.0 <= config.reserve_base;
                if !(tiny && wedged && tx.amount.is_xrp()) {
                    return Err(TransactionResult::TecNoPermission);
                }
            }
        }
    }
    Ok(())
}

fn apply_xrp_direct(tx: &Payment, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let drops = match &tx.amount {
        Amount::XRPAmount(drops) => *drops,
        Amount::IssuedCurrencyAmount(_) => return Err(TransactionResult::TefInternal),
    };
    let fee = tx.common_fields.fee.unwrap_or(XRPAmount::ZERO);
    let source = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;

    // Reserve is measured against the balance before the fee came off.
    let prior = source.balance.checked_add(fee).map_err(|_| {
        TransactionResult::TefInternal
    })?;
    let reserve = XRPAmount(ctx.config.reserve(source.owner_count));
    let spendable = prior.saturating_sub(reserve);
    let max_spend = spendable.min(source.balance);
    if drops > max_spend {
        return Err(TransactionResult::TecUnfundedPayment);
    }

    let destination_key = keylet::account(&tx.destination).key;
    if ctx.view.exists(&destination_key) {
        send_xrp(ctx.view, &ctx.account, &tx.destination, drops)
            .map_err(|_| TransactionResult::TefInternal)?;
    } else {
        let mut source = source;
        source.balance = source
            .balance
            .checked_sub(drops)
            .map_err(|_| TransactionResult::TecUnfundedPayment)?;
        update_account_root(ctx.view, source).map_err(|_| TransactionResult::TefInternal)?;
        let sequence = if ctx.config.rules.deletable_accounts_enabled() {
            ctx.config.ledger_sequence
        } else {
            1
        };
        let created = AccountRoot {
            account: tx.destination,
            balance: drops,
            sequence,
            ..Default::default()
        };
        ctx.view
            .insert(destination_key, LedgerEntry::AccountRoot(created))
            .map_err(|_| TransactionResult::TefInternal)?;
        debug!("payment: created {} with {drops} drops", tx.destination);
    }
    Ok(())
}

/// A payment that touches a single trust line: the sender or the receiver
/// is the issuer and no cross-issue SendMax is involved.
fn is_direct_issue(tx: &Payment) -> bool {
    match &tx.amount {
        Amount::XRPAmount(_) => false,
        Amount::IssuedCurrencyAmount(amount) => {
            let same_issue = tx
                .send_max
                .as_ref()
                .map_or(true, |send_max| send_max.issue() == amount.issue());
            let no_paths = tx.paths.as_ref().map_or(true, |paths| paths.is_empty());
            same_issue
                && no_paths
                && (amount.issuer == tx.common_fields.account || amount.issuer == tx.destination)
        }
    }
}

fn apply_direct_issue(tx: &Payment, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let amount = match &tx.amount {
        Amount::IssuedCurrencyAmount(amount) => amount,
        Amount::XRPAmount(_) => return Err(TransactionResult::TefInternal),
    };
    let issue = amount.issue();
    let source = ctx.account;
    let destination = tx.destination;

    // A frozen sender may still redeem toward the issuer; a deep-frozen
    // receiver may not take delivery at all.
    if destination != issue.issuer && is_frozen(ctx.view, &source, &issue) {
        return Err(TransactionResult::TecFrozen);
    }
    if is_deep_frozen(ctx.view, &destination, &issue) {
        return Err(TransactionResult::TecFrozen);
    }

    let line_key = keylet::line(&source, &destination, &issue.currency).key;
    let state = ctx
        .view
        .peek(&line_key)
        .and_then(LedgerEntry::into_ripple_state)
        .ok_or(TransactionResult::TecPathDry)?;

    if issue.issuer == source {
        // Issuing toward the destination: stay inside its limit, and
        // honor authorization when the issuer demands it.
        let issuer_root =
            account_root(ctx.view, &source).map_err(|_| TransactionResult::TefInternal)?;
        if issuer_root.has_flag(AccountRootFlag::LsfRequireAuth) {
            let authorized = state.side_flag(
                &source,
                RippleStateFlag::LsfLowAuth,
                RippleStateFlag::LsfHighAuth,
            );
            if !authorized {
                return Err(TransactionResult::TecNoAuth);
            }
        }
        let held = state.balance_for(&destination).value;
        let limit = if destination == state.low_account() {
            state.low_limit.value.clone()
        } else {
            state.high_limit.value.clone()
        };
        if held + &amount.value > limit {
            return Err(TransactionResult::TecPathDry);
        }
    } else {
        // Redeeming toward the issuer: bounded by what the sender holds.
        let held = state.balance_for(&source).value;
        if held < amount.value {
            return Err(TransactionResult::TecPathDry);
        }
    }

    transfer_iou(ctx.view, &source, &destination, amount)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}

pub fn apply(tx: &Payment, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    if is_xrp_to_xrp(tx) {
        return apply_xrp_direct(tx, ctx);
    }
    if is_direct_issue(tx) {
        return apply_direct_issue(tx, ctx);
    }

    let partial = tx.has_flag(PaymentFlag::TfPartialPayment);
    let limit_quality = if tx.has_flag(PaymentFlag::TfLimitQuality) {
        match &tx.send_max {
            Some(send_max) => {
                let out = tx.amount.as_big();
                if out.is_zero() {
                    None
                } else {
                    Quality::from_big(&(send_max.as_big() / out))
                }
            }
            None => None,
        }
    } else {
        None
    };
    // The sender of an issued currency without SendMax is bounded by the
    // delivered amount at face value.
    let send_max = tx.send_max.clone().or_else(|| {
        if tx.amount.is_issued_currency() {
            Some(tx.amount.clone())
        } else {
            None
        }
    });

    let params = FlowParams {
        src: ctx.account,
        dst: tx.destination,
        deliver: tx.amount.clone(),
        send_max,
        paths: tx.paths.clone().unwrap_or_default(),
        default_path: !tx.has_flag(PaymentFlag::TfNoRippleDirect),
        partial_payment: partial,
        deliver_min: tx.deliver_min.clone(),
        limit_quality,
        owner_pays_transfer_fee: true,
    };
    let outcome = flow(ctx.view, &params, ctx.config)?;
    if partial {
        ctx.delivered_amount = Some(outcome.actual_out.clone());
    }
    if outcome.actual_out.is_zero() {
        return Err(TransactionResult::TecPathDry);
    }
    Ok(())
}
