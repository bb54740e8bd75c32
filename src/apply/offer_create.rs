//! The OfferCreate applier: cancel a predecessor, round to tick size,
//! cross the books through the flow engine, then place any remainder.

use bigdecimal::{BigDecimal, Signed, Zero};
use log::debug;

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::core::types::Quality;
use crate::flow::offers::{offer_delete, offer_place};
use crate::flow::{flow, FlowParams};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{
    account_root, funds_available, is_frozen, is_global_frozen,
};
use crate::ledger::view::LedgerView;
use crate::models::amount::Amount;
use crate::models::ledger::objects::{Offer, OfferFlag};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::{OfferCreate, OfferCreateFlag};
use crate::ter::TransactionResult;

pub fn preflight(tx: &OfferCreate, rules: &Rules) -> TxResult {
    if tx.taker_pays.is_zero()
        || tx.taker_pays.is_negative()
        || tx.taker_gets.is_zero()
        || tx.taker_gets.is_negative()
    {
        return Err(TransactionResult::TemBadOffer);
    }
    if tx.taker_pays.is_xrp() && tx.taker_gets.is_xrp() {
        return Err(TransactionResult::TemBadOffer);
    }
    if tx.taker_pays.issue() == tx.taker_gets.issue() {
        return Err(TransactionResult::TemRedundant);
    }
    if tx.expiration == Some(0) {
        return Err(TransactionResult::TemBadExpiration);
    }
    if tx.offer_sequence == Some(0) {
        return Err(TransactionResult::TemBadSequence);
    }
    if tx.has_flag(OfferCreateFlag::TfImmediateOrCancel)
        && tx.has_flag(OfferCreateFlag::TfFillOrKill)
    {
        return Err(TransactionResult::TemInvalidFlag);
    }
    if tx.domain_id.is_some() && !rules.permissioned_dex_enabled() {
        return Err(TransactionResult::TemDisabled);
    }
    Ok(())
}

pub fn preclaim(tx: &OfferCreate, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    for issue in [tx.taker_pays.issue(), tx.taker_gets.issue()] {
        if issue.is_xrp() {
            continue;
        }
        if !view.exists(&keylet::account(&issue.issuer).key) {
            return Err(TransactionResult::TecNoIssuer);
        }
        if is_global_frozen(view, &issue.issuer) {
            return Err(TransactionResult::TecFrozen);
        }
    }
    if is_frozen(view, &tx.common_fields.account, &tx.taker_gets.issue()) {
        return Err(TransactionResult::TecFrozen);
    }
    if let Some(cancel) = tx.offer_sequence {
        let account_sequence = account_root(view, &tx.common_fields.account)
            .map(|root| root.sequence)
            .unwrap_or(0);
        if cancel >= account_sequence {
            return Err(TransactionResult::TemBadSequence);
        }
    }
    let funds = funds_available(view, &tx.common_fields.account, &tx.taker_gets, config)
        .map_err(|_| TransactionResult::TefInternal)?;
    if funds.is_zero() {
        return Err(TransactionResult::TecUnfundedOffer);
    }
    if let Some(expiration) = tx.expiration {
        if expiration <= config.parent_close_time && config.rules.deposit_preauth_enabled() {
            return Err(TransactionResult::TecExpired);
        }
    }
    Ok(())
}

/// Round a positive value down to `digits` significant digits.
fn round_to_tick(value: &BigDecimal, digits: u8) -> BigDecimal {
    if value.is_zero() {
        return BigDecimal::zero();
    }
    let rounded = value.with_prec(digits as u64);
    if &rounded > value {
        // with_prec rounds half-up; step back one unit in the last place.
        let (_, scale) = rounded.as_bigint_and_exponent();
        rounded - BigDecimal::new(1.into(), scale)
    } else {
        rounded
    }
}

/// The smaller of the two issuers' tick sizes, if either publishes one.
fn effective_tick(view: &PaymentSandbox<'_>, tx: &OfferCreate) -> Option<u8> {
    let mut tick: Option<u8> = None;
    for issue in [tx.taker_pays.issue(), tx.taker_gets.issue()] {
        if issue.is_xrp() {
            continue;
        }
        if let Ok(root) = account_root(view, &issue.issuer) {
            if let Some(size) = root.tick_size {
                tick = Some(tick.map_or(size, |held| held.min(size)));
            }
        }
    }
    tick
}

pub fn apply(tx: &OfferCreate, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let account = ctx.account;

    // An old offer named for replacement goes first.
    if let Some(cancel) = tx.offer_sequence {
        let key = keylet::offer(&account, cancel).key;
        if let Some(existing) = ctx.view.peek(&key).and_then(LedgerEntry::into_offer) {
            offer_delete(ctx.view, key, &existing).map_err(|_| TransactionResult::TefInternal)?;
        }
    }

    // Born expired under the legacy rules: charge the fee, change nothing
    // else.
    if let Some(expiration) = tx.expiration {
        if expiration <= ctx.config.parent_close_time {
            return Ok(());
        }
    }

    // Tick-size rounding: shrink the sold side to the coarser issuer
    // grid, then recompute the bought side at the offered rate.
    let mut taker_pays = tx.taker_pays.clone();
    let mut taker_gets = tx.taker_gets.clone();
    let original_rate = {
        let gets = taker_gets.as_big();
        if gets.is_zero() {
            return Err(TransactionResult::TemBadOffer);
        }
        taker_pays.as_big() / gets
    };
    if let Some(tick) = effective_tick(ctx.view, tx) {
        let gets_rounded = round_to_tick(&taker_gets.as_big(), tick);
        if gets_rounded.is_zero() {
            return Ok(());
        }
        let pays_recomputed = &gets_rounded * &original_rate;
        taker_gets = Amount::from_big(&taker_gets.issue(), gets_rounded)
            .map_err(|_| TransactionResult::TemBadOffer)?;
        taker_pays = Amount::from_big(&taker_pays.issue(), pays_recomputed)
            .map_err(|_| TransactionResult::TemBadOffer)?;
        if taker_pays.is_zero() || taker_gets.is_zero() {
            return Ok(());
        }
    }

    let quality = Quality::from_big(&(taker_pays.as_big() / taker_gets.as_big()))
        .ok_or(TransactionResult::TemBadOffer)?;

    // Cross the books unless placed passively. The crossing buys our
    // TakerPays with our TakerGets, only at rates no worse than ours.
    let mut crossed_pays = Amount::zero(&taker_pays.issue());
    let mut crossed_gets = Amount::zero(&taker_gets.issue());
    if !tx.has_flag(OfferCreateFlag::TfPassive) {
        let limit = Quality::from_big(&(taker_gets.as_big() / taker_pays.as_big()))
            .ok_or(TransactionResult::TemBadOffer)?;
        let params = FlowParams {
            src: account,
            dst: account,
            deliver: taker_pays.clone(),
            send_max: Some(taker_gets.clone()),
            paths: alloc::vec::Vec::new(),
            default_path: true,
            partial_payment: true,
            deliver_min: None,
            limit_quality: Some(limit),
            owner_pays_transfer_fee: false,
        };
        let mut crossing = ctx.view.branch();
        match flow(&mut crossing, &params, ctx.config) {
            Ok(outcome) => {
                let layer = crossing.into_layer();
                ctx.view
                    .absorb(layer)
                    .map_err(|_| TransactionResult::TefInternal)?;
                crossed_gets = outcome.actual_in;
                crossed_pays = outcome.actual_out;
                debug!("offer: crossed {crossed_gets} for {crossed_pays}");
            }
            Err(TransactionResult::TecPathDry)
            | Err(TransactionResult::TecPathPartial)
            | Err(TransactionResult::TecNoLine) => {
                // Nothing crossed; fall through to placement.
            }
            Err(error) => return Err(error),
        }
    }

    // Exhausted when the received side or the paid side is used up.
    let pays_done = matches!(
        crossed_pays.cmp_value(&taker_pays),
        Ok(core::cmp::Ordering::Equal) | Ok(core::cmp::Ordering::Greater)
    );
    let gets_done = matches!(
        crossed_gets.cmp_value(&taker_gets),
        Ok(core::cmp::Ordering::Equal) | Ok(core::cmp::Ordering::Greater)
    );
    let exhausted = pays_done || gets_done;

    if tx.has_flag(OfferCreateFlag::TfFillOrKill) && !exhausted {
        return Err(TransactionResult::TecKilled);
    }
    if tx.has_flag(OfferCreateFlag::TfImmediateOrCancel) || exhausted {
        return Ok(());
    }

    // The remainder keeps the original exchange rate rather than being a
    // plain subtraction, so partial crossings cannot drift the price.
    let pays_left = taker_pays.as_big() - crossed_pays.as_big();
    if !pays_left.is_positive() {
        return Ok(());
    }
    let gets_left = &pays_left / &original_rate;
    let remaining_pays = Amount::from_big(&taker_pays.issue(), pays_left)
        .map_err(|_| TransactionResult::TefInternal)?;
    let remaining_gets = Amount::from_big(&taker_gets.issue(), gets_left)
        .map_err(|_| TransactionResult::TefInternal)?;
    if remaining_pays.is_zero() || remaining_gets.is_zero() {
        return Ok(());
    }

    // Placement needs reserve headroom; a taker who crossed something
    // simply keeps the crossing.
    let source = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;
    let owner_count = ctx.view.owner_count_hook(&account, source.owner_count);
    if source.balance.0 < ctx.config.reserve_to_create(owner_count) {
        if !crossed_pays.is_zero() {
            return Ok(());
        }
        return Err(TransactionResult::TecInsufReserveOffer);
    }

    let mut flags = 0u32;
    if tx.has_flag(OfferCreateFlag::TfPassive) {
        flags |= OfferFlag::LsfPassive as u32;
    }
    if tx.has_flag(OfferCreateFlag::TfSell) {
        flags |= OfferFlag::LsfSell as u32;
    }
    let book_base = keylet::book_base(&remaining_pays.issue(), &remaining_gets.issue());
    let offer = Offer {
        account,
        sequence: ctx.seq_consumed,
        taker_pays: remaining_pays,
        taker_gets: remaining_gets,
        book_directory: keylet::quality(book_base, quality).key,
        expiration: tx.expiration,
        flags,
        ..Default::default()
    };
    let key = keylet::offer(&account, ctx.seq_consumed).key;
    offer_place(ctx.view, key, offer).map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
