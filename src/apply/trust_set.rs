//! The TrustSet applier: the trust-line state machine.

use bigdecimal::{BigDecimal, Signed, Zero};

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::constants::QUALITY_ONE;
use crate::core::keylet;
use crate::core::types::AccountId;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{
    adjust_owner_count, trust_create, trust_delete, trust_line_is_default,
};
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::{AccountRootFlag, RippleState, RippleStateFlag};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::{TrustSet, TrustSetFlag};
use crate::ter::TransactionResult;

/// Quality values at face value normalize away.
fn normalize_quality(quality: Option<u32>) -> Option<u32> {
    quality.filter(|value| *value != 0 && *value != QUALITY_ONE)
}

/// An absent quality leaves the stored value alone; a present one
/// replaces it (normalizing face value to unset).
fn apply_quality(requested: Option<u32>, existing: Option<u32>) -> Option<u32> {
    match requested {
        None => existing,
        Some(_) => normalize_quality(requested),
    }
}

pub fn preflight(tx: &TrustSet, rules: &Rules) -> TxResult {
    if tx.limit_amount.value.is_negative() {
        return Err(TransactionResult::TemBadLimit);
    }
    if tx.limit_amount.currency.is_xrp() {
        return Err(TransactionResult::TemBadCurrency);
    }
    if tx.limit_amount.issuer == AccountId::ZERO {
        return Err(TransactionResult::TemDstNeeded);
    }
    if tx.limit_amount.issuer == tx.common_fields.account {
        return Err(TransactionResult::TemDstIsSrc);
    }
    if tx.has_flag(TrustSetFlag::TfSetNoRipple) && tx.has_flag(TrustSetFlag::TfClearNoRipple) {
        return Err(TransactionResult::TemInvalidFlag);
    }
    if tx.has_flag(TrustSetFlag::TfSetFreeze) && tx.has_flag(TrustSetFlag::TfClearFreeze) {
        return Err(TransactionResult::TemInvalidFlag);
    }
    if (tx.has_flag(TrustSetFlag::TfSetDeepFreeze) || tx.has_flag(TrustSetFlag::TfClearDeepFreeze))
        && !rules.deep_freeze_enabled()
    {
        return Err(TransactionResult::TemDisabled);
    }
    if tx.has_flag(TrustSetFlag::TfSetDeepFreeze) && tx.has_flag(TrustSetFlag::TfClearDeepFreeze) {
        return Err(TransactionResult::TemInvalidFlag);
    }
    Ok(())
}

pub fn preclaim(tx: &TrustSet, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    if !view.exists(&keylet::account(&tx.limit_amount.issuer).key) {
        return Err(TransactionResult::TecNoIssuer);
    }
    Ok(())
}

/// Whether the account's side of a line holds only default state (the
/// reserve flag itself does not count).
fn side_is_default(state: &RippleState, side: &AccountId) -> bool {
    let is_low = *side == state.low_account();
    let limit = if is_low {
        &state.low_limit
    } else {
        &state.high_limit
    };
    let (quality_in, quality_out) = if is_low {
        (state.low_quality_in, state.low_quality_out)
    } else {
        (state.high_quality_in, state.high_quality_out)
    };
    let flags = if is_low {
        RippleStateFlag::LsfLowAuth as u32
            | RippleStateFlag::LsfLowNoRipple as u32
            | RippleStateFlag::LsfLowFreeze as u32
            | RippleStateFlag::LsfLowDeepFreeze as u32
    } else {
        RippleStateFlag::LsfHighAuth as u32
            | RippleStateFlag::LsfHighNoRipple as u32
            | RippleStateFlag::LsfHighFreeze as u32
            | RippleStateFlag::LsfHighDeepFreeze as u32
    };
    limit.is_zero()
        && quality_in.is_none()
        && quality_out.is_none()
        && state.flags & flags == 0
        && !state.balance_for(side).value.is_positive()
}

fn create_line(tx: &TrustSet, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let account = ctx.account;
    let counterparty = tx.limit_amount.issuer;
    let quality_in = normalize_quality(tx.quality_in);
    let quality_out = normalize_quality(tx.quality_out);

    let source = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;

    let requests_auth = tx.has_flag(TrustSetFlag::TfSetfAuth);
    if requests_auth && !source.has_flag(AccountRootFlag::LsfRequireAuth) {
        return Err(TransactionResult::TefNoAuthRequired);
    }
    let set_freeze = tx.has_flag(TrustSetFlag::TfSetFreeze);
    if set_freeze && source.has_flag(AccountRootFlag::LsfNoFreeze) {
        return Err(TransactionResult::TecNoPermission);
    }
    // Lines start with rippling enabled; only an explicit request sets
    // the flag.
    let set_no_ripple = tx.has_flag(TrustSetFlag::TfSetNoRipple);

    let nothing_requested = tx.limit_amount.is_zero()
        && quality_in.is_none()
        && quality_out.is_none()
        && !requests_auth
        && !set_freeze
        && !tx.has_flag(TrustSetFlag::TfSetNoRipple)
        && !tx.has_flag(TrustSetFlag::TfSetDeepFreeze);
    if nothing_requested {
        return Err(TransactionResult::TecNoLineRedundant);
    }

    let owner_count = ctx.view.owner_count_hook(&account, source.owner_count);
    if source.balance.0 < ctx.config.reserve_to_create(owner_count) {
        return Err(TransactionResult::TecInsufReserveLine);
    }

    let account_is_low = account < counterparty;
    let mut flags = 0u32;
    if requests_auth {
        flags |= if account_is_low {
            RippleStateFlag::LsfLowAuth as u32
        } else {
            RippleStateFlag::LsfHighAuth as u32
        };
    }
    if set_no_ripple {
        flags |= if account_is_low {
            RippleStateFlag::LsfLowNoRipple as u32
        } else {
            RippleStateFlag::LsfHighNoRipple as u32
        };
    }
    if set_freeze {
        flags |= if account_is_low {
            RippleStateFlag::LsfLowFreeze as u32
        } else {
            RippleStateFlag::LsfHighFreeze as u32
        };
    }
    if tx.has_flag(TrustSetFlag::TfSetDeepFreeze) {
        flags |= if account_is_low {
            RippleStateFlag::LsfLowDeepFreeze as u32
        } else {
            RippleStateFlag::LsfHighDeepFreeze as u32
        };
    }

    trust_create(
        ctx.view,
        &account,
        &counterparty,
        tx.limit_amount.currency,
        tx.limit_amount.value.clone(),
        BigDecimal::zero(),
        quality_in,
        quality_out,
        flags,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}

fn modify_line(
    tx: &TrustSet,
    ctx: &mut ApplyContext<'_, '_>,
    mut state: RippleState,
) -> TxResult {
    let account = ctx.account;
    let account_is_low = account == state.low_account();
    let source = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;

    // Authorization may only ever be granted.
    if tx.has_flag(TrustSetFlag::TfSetfAuth) {
        if !source.has_flag(AccountRootFlag::LsfRequireAuth) {
            return Err(TransactionResult::TefNoAuthRequired);
        }
        state.set_flag(if account_is_low {
            RippleStateFlag::LsfLowAuth
        } else {
            RippleStateFlag::LsfHighAuth
        });
    }

    // No-ripple is refused while the account's side of the balance is in
    // debt: fix1578 turns the silent skip into a claimed failure.
    if tx.has_flag(TrustSetFlag::TfSetNoRipple) {
        if state.balance_for(&account).value.is_negative() {
            if ctx.config.rules.fix1578_enabled() {
                return Err(TransactionResult::TecNoPermission);
            }
        } else {
            state.set_flag(if account_is_low {
                RippleStateFlag::LsfLowNoRipple
            } else {
                RippleStateFlag::LsfHighNoRipple
            });
        }
    } else if tx.has_flag(TrustSetFlag::TfClearNoRipple) {
        state.clear_flag(if account_is_low {
            RippleStateFlag::LsfLowNoRipple
        } else {
            RippleStateFlag::LsfHighNoRipple
        });
    }

    if tx.has_flag(TrustSetFlag::TfSetFreeze) {
        if source.has_flag(AccountRootFlag::LsfNoFreeze) {
            return Err(TransactionResult::TecNoPermission);
        }
        state.set_flag(if account_is_low {
            RippleStateFlag::LsfLowFreeze
        } else {
            RippleStateFlag::LsfHighFreeze
        });
    } else if tx.has_flag(TrustSetFlag::TfClearFreeze) {
        state.clear_flag(if account_is_low {
            RippleStateFlag::LsfLowFreeze
        } else {
            RippleStateFlag::LsfHighFreeze
        });
    }

    if tx.has_flag(TrustSetFlag::TfSetDeepFreeze) {
        if source.has_flag(AccountRootFlag::LsfNoFreeze) {
            return Err(TransactionResult::TecNoPermission);
        }
        state.set_flag(if account_is_low {
            RippleStateFlag::LsfLowDeepFreeze
        } else {
            RippleStateFlag::LsfHighDeepFreeze
        });
    } else if tx.has_flag(TrustSetFlag::TfClearDeepFreeze) {
        state.clear_flag(if account_is_low {
            RippleStateFlag::LsfLowDeepFreeze
        } else {
            RippleStateFlag::LsfHighDeepFreeze
        });
    }

    // The limit and qualities belong to the transaction source.
    let limit = crate::models::amount::IssuedCurrencyAmount::new(
        tx.limit_amount.currency,
        account,
        tx.limit_amount.value.clone(),
    );
    if account_is_low {
        state.low_limit = limit;
        state.low_quality_in = apply_quality(tx.quality_in, state.low_quality_in);
        state.low_quality_out = apply_quality(tx.quality_out, state.low_quality_out);
    } else {
        state.high_limit = limit;
        state.high_quality_in = apply_quality(tx.quality_in, state.high_quality_in);
        state.high_quality_out = apply_quality(tx.quality_out, state.high_quality_out);
    }

    // Reserve flag evolution: a side that stops being default releases
    // its reserve, a side that becomes non-default takes one on.
    let reserve_flag = if account_is_low {
        RippleStateFlag::LsfLowReserve
    } else {
        RippleStateFlag::LsfHighReserve
    };
    let now_default = side_is_default(&state, &account);
    let held_reserve = state.has_flag(reserve_flag);
    let key = keylet::line(&account, &tx.limit_amount.issuer, &tx.limit_amount.currency).key;

    if !now_default && !held_reserve {
        let owner_count = ctx.view.owner_count_hook(&account, source.owner_count);
        if source.balance.0 < ctx.config.reserve_to_create(owner_count) {
            return Err(TransactionResult::TecInsufReserveLine);
        }
        state.set_flag(reserve_flag);
        adjust_owner_count(ctx.view, &account, 1).map_err(|_| TransactionResult::TefInternal)?;
    } else if now_default && held_reserve {
        state.clear_flag(reserve_flag);
        adjust_owner_count(ctx.view, &account, -1).map_err(|_| TransactionResult::TefInternal)?;
    }

    if trust_line_is_default(&state) {
        trust_delete(ctx.view, &state, key).map_err(|_| TransactionResult::TefInternal)?;
    } else {
        ctx.view
            .update(key, LedgerEntry::RippleState(state))
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    Ok(())
}

pub fn apply(tx: &TrustSet, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let key = keylet::line(
        &ctx.account,
        &tx.limit_amount.issuer,
        &tx.limit_amount.currency,
    )
    .key;
    match ctx.view.peek(&key).and_then(LedgerEntry::into_ripple_state) {
        None => create_line(tx, ctx),
        Some(state) => modify_line(tx, ctx, state),
    }
}
