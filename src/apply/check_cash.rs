//! The CheckCash applier: the destination redeems a check for an exact
//! amount, or flexibly above a minimum.

use bigdecimal::Zero;

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::dir_remove;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{
    adjust_owner_count, iou_available, send_xrp, transfer_iou, xrp_liquid,
};
use crate::ledger::view::LedgerView;
use crate::models::amount::{Amount, IssuedCurrencyAmount};
use crate::models::ledger::objects::Check;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::CheckCash;
use crate::ter::TransactionResult;

pub fn preflight(tx: &CheckCash, _rules: &Rules) -> TxResult {
    match (&tx.amount, &tx.deliver_min) {
        (Some(_), Some(_)) | (None, None) => return Err(TransactionResult::TemMalformed),
        _ => {}
    }
    let requested = tx.amount.as_ref().or(tx.deliver_min.as_ref());
    if let Some(requested) = requested {
        if requested.is_zero() || requested.is_negative() {
            return Err(TransactionResult::TemBadAmount);
        }
    }
    Ok(())
}

fn read_check(view: &PaymentSandbox<'_>, tx: &CheckCash) -> Result<Check, TransactionResult> {
    view.peek(&tx.check_id)
        .and_then(LedgerEntry::into_check)
        .ok_or(TransactionResult::TecNoEntry)
}

pub fn preclaim(tx: &CheckCash, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let check = read_check(view, tx)?;
    if check.destination != tx.common_fields.account {
        return Err(TransactionResult::TecNoPermission);
    }
    if check.is_expired(config.parent_close_time) {
        return Err(TransactionResult::TecExpired);
    }
    let requested = tx.amount.as_ref().or(tx.deliver_min.as_ref());
    if let Some(requested) = requested {
        if requested.issue() != check.send_max.issue() {
            return Err(TransactionResult::TemBadCurrency);
        }
    }
    Ok(())
}

fn delete_check(ctx: &mut ApplyContext<'_, '_>, check: &Check, key: crate::core::types::Hash256) -> TxResult {
    dir_remove(
        ctx.view,
        keylet::owner_dir(&check.account).key,
        check.owner_node,
        &key,
        false,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    if let Some(destination_node) = check.destination_node {
        dir_remove(
            ctx.view,
            keylet::owner_dir(&check.destination).key,
            destination_node,
            &key,
            false,
        )
        .map_err(|_| TransactionResult::TefInternal)?;
    }
    ctx.view
        .erase(&key)
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &check.account, -1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}

pub fn apply(tx: &CheckCash, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let check = read_check(ctx.view, tx)?;
    let flexible = tx.deliver_min.is_some();
    let requested = tx
        .amount
        .as_ref()
        .or(tx.deliver_min.as_ref())
        .ok_or(TransactionResult::TemMalformed)?
        .clone();

    // Cap at the face value of the check.
    if matches!(
        requested.cmp_value(&check.send_max),
        Ok(core::cmp::Ordering::Greater) | Err(_)
    ) {
        return Err(TransactionResult::TecPathPartial);
    }

    match &check.send_max {
        Amount::XRPAmount(face) => {
            let liquid = xrp_liquid(ctx.view, &check.account, ctx.config)
                .map_err(|_| TransactionResult::TefInternal)?;
            let pay = if flexible {
                // Flexible mode drains up to the face value; the named
                // amount is the floor.
                let floor = match &requested {
                    Amount::XRPAmount(drops) => *drops,
                    _ => return Err(TransactionResult::TefInternal),
                };
                let pay = (*face).min(liquid);
                if pay < floor {
                    return Err(TransactionResult::TecPathPartial);
                }
                pay
            } else {
                let exact = match &requested {
                    Amount::XRPAmount(drops) => *drops,
                    _ => return Err(TransactionResult::TefInternal),
                };
                if exact > liquid {
                    return Err(TransactionResult::TecUnfundedPayment);
                }
                exact
            };
            send_xrp(ctx.view, &check.account, &ctx.account, pay)
                .map_err(|_| TransactionResult::TefInternal)?;
        }
        Amount::IssuedCurrencyAmount(send_max) => {
            let issue = send_max.issue();
            let face = send_max.value.clone();
            let available = if check.account == issue.issuer {
                face.clone()
            } else {
                iou_available(ctx.view, &check.account, &issue)
            };
            let pay = if flexible {
                let floor = requested.as_big();
                let pay = if available < face { available } else { face };
                if pay < floor {
                    return Err(TransactionResult::TecPathPartial);
                }
                pay
            } else {
                let exact = requested.as_big();
                if exact > available {
                    return Err(TransactionResult::TecUnfundedPayment);
                }
                exact
            };
            if pay.is_zero() {
                return Err(TransactionResult::TecUnfundedPayment);
            }
            let net = IssuedCurrencyAmount::new(issue.currency, issue.issuer, pay);
            transfer_iou(ctx.view, &check.account, &ctx.account, &net)
                .map_err(|_| TransactionResult::TefInternal)?;
        }
    }

    delete_check(ctx, &check, tx.check_id)
}
