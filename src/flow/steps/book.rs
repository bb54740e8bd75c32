//! Crossing one order book: consume offers from the best quality page
//! toward worse ones, re-validating maker funding through the sandbox's
//! deferred-credit hooks and charging issuer transfer fees on both sides.

use bigdecimal::{BigDecimal, One, Signed, Zero};
use log::trace;

use crate::constants::MAX_OFFERS_CONSUMED;
use crate::core::keylet;
use crate::core::types::{AccountId, Currency, Hash256, Issue, Quality};
use crate::ledger::directory::dir_indexes;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{
    account_root, rate_ratio, ripple_credit, transfer_rate, update_account_root,
};
use crate::ledger::view::{LedgerView, ViewError};
use crate::models::amount::Amount;
use crate::models::ledger::objects::Offer;
use crate::models::ledger::LedgerEntry;

use super::super::offers::{offer_delete, offer_funded_gets};
use super::super::{ExecCtx, FlowResult};
use super::BookStep;

enum Pass {
    /// Compute only, toward an output target.
    Rev { out_target: BigDecimal },
    /// Execute, limited by available input and the reverse promise.
    Fwd {
        in_limit: BigDecimal,
        out_cap: Option<BigDecimal>,
    },
}

impl BookStep {
    pub fn book_base(&self) -> Hash256 {
        keylet::book_base(&self.book_in, &self.book_out)
    }

    /// Fee multiplier on the taker's payment: the input issuer inflates
    /// the debit when neither the strand source nor the offer owner is
    /// the issuer.
    fn in_fee_ratio(&self, sandbox: &PaymentSandbox<'_>, owner: &AccountId) -> BigDecimal {
        if self.book_in.is_xrp()
            || self.book_in.issuer == self.strand_src
            || self.book_in.issuer == *owner
        {
            BigDecimal::one()
        } else {
            rate_ratio(transfer_rate(sandbox, &self.book_in.issuer))
        }
    }

    /// Fee multiplier on the owner's delivery of the sold side.
    fn out_fee_ratio(&self, sandbox: &PaymentSandbox<'_>, owner: &AccountId) -> BigDecimal {
        if !self.owner_pays_transfer_fee
            || self.book_out.is_xrp()
            || self.book_out.issuer == *owner
            || self.book_out.issuer == self.strand_dst
        {
            BigDecimal::one()
        } else {
            rate_ratio(transfer_rate(sandbox, &self.book_out.issuer))
        }
    }

    /// A globally frozen issuer takes its whole book out of play.
    fn frozen_out(&self, sandbox: &PaymentSandbox<'_>) -> bool {
        use crate::ledger::transfer::is_global_frozen;
        (!self.book_in.is_xrp() && is_global_frozen(sandbox, &self.book_in.issuer))
            || (!self.book_out.is_xrp() && is_global_frozen(sandbox, &self.book_out.issuer))
    }

    pub fn quality_upper_bound(
        &self,
        sandbox: &PaymentSandbox<'_>,
        _ctx: &ExecCtx<'_>,
    ) -> Option<Quality> {
        if self.inactive || self.frozen_out(sandbox) {
            return None;
        }
        let base = self.book_base();
        let start = base.with_low_64(1);
        let end = keylet::book_end(base);
        let page = sandbox.succ(&start, &end)?;
        Some(Quality(page.low_64()))
    }

    fn walk(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        mut pass: Pass,
    ) -> FlowResult<(Amount, Amount)> {
        if self.frozen_out(sandbox) {
            return Ok((Amount::zero(&self.book_in), Amount::zero(&self.book_out)));
        }
        let base = self.book_base();
        let end = keylet::book_end(base);
        let mut page_floor = base.with_low_64(1);

        let mut in_total = BigDecimal::zero();
        let mut out_total = BigDecimal::zero();
        let execute = matches!(pass, Pass::Fwd { .. });

        'book: while let Some(page_key) = sandbox.succ(&page_floor, &end) {
            let quality = Quality(page_key.low_64());
            let offer_rate = quality.as_big();
            let offer_keys = dir_indexes(sandbox, page_key)?;

            for offer_key in offer_keys {
                if self.offers_used >= MAX_OFFERS_CONSUMED {
                    self.inactive = true;
                    break 'book;
                }
                let offer = match sandbox.peek(&offer_key).and_then(LedgerEntry::into_offer) {
                    Some(offer) => offer,
                    None => continue,
                };
                if offer.is_expired(ctx.config.parent_close_time) {
                    ctx.offers_to_remove.push(offer_key);
                    continue;
                }
                let funded =
                    offer_funded_gets(sandbox, &offer, ctx.config, self.owner_pays_transfer_fee)
                        .as_big();
                if !funded.is_positive() {
                    ctx.offers_to_remove.push(offer_key);
                    continue;
                }
                self.offers_used += 1;

                let owner = offer.account;
                let in_fee = self.in_fee_ratio(sandbox, &owner);
                let out_fee = self.out_fee_ratio(sandbox, &owner);

                // How much of the sold side this offer contributes.
                let mut out_chunk = funded.clone();
                let gets_remaining = offer.taker_gets.as_big();
                if gets_remaining < out_chunk {
                    out_chunk = gets_remaining;
                }
                match &pass {
                    Pass::Rev { out_target } => {
                        let still_needed = out_target - &out_total;
                        if still_needed < out_chunk {
                            out_chunk = still_needed;
                        }
                    }
                    Pass::Fwd { in_limit, out_cap } => {
                        let in_left = in_limit - &in_total;
                        let affordable = in_left / (&offer_rate * &in_fee);
                        if affordable < out_chunk {
                            out_chunk = affordable;
                        }
                        if let Some(cap) = out_cap {
                            let cap_left = cap - &out_total;
                            if cap_left < out_chunk {
                                out_chunk = cap_left;
                            }
                        }
                    }
                }
                if !out_chunk.is_positive() {
                    break 'book;
                }

                let in_to_owner = &out_chunk * &offer_rate;
                let step_in = &in_to_owner * &in_fee;
                let owner_gross_out = &out_chunk * &out_fee;

                if execute {
                    self.pay_owner(sandbox, &owner, &in_to_owner)?;
                    self.take_from_owner(sandbox, &owner, &out_chunk, &owner_gross_out)?;
                    self.consume_offer(sandbox, offer_key, offer, &in_to_owner, &out_chunk)?;
                    trace!(
                        "book step: crossed {offer_key} for {out_chunk} at rate {offer_rate}"
                    );
                }

                in_total += step_in;
                out_total += out_chunk;

                let done = match &mut pass {
                    Pass::Rev { out_target } => out_total >= *out_target,
                    Pass::Fwd { in_limit, out_cap } => {
                        in_total >= *in_limit
                            || out_cap.as_ref().map_or(false, |cap| out_total >= *cap)
                    }
                };
                if done {
                    break 'book;
                }
            }

            let next = page_key.low_64();
            if next == u64::MAX {
                break;
            }
            page_floor = page_key.with_low_64(next + 1);
        }

        let in_amount = Amount::from_big_ceil(&self.book_in, in_total)
            .map_err(|_| ViewError::Internal(alloc::string::String::from("book in overflow")))?;
        let out_amount = Amount::from_big(&self.book_out, out_total)
            .map_err(|_| ViewError::Internal(alloc::string::String::from("book out overflow")))?;
        Ok((in_amount, out_amount))
    }

    /// Settle the bought side with the offer owner. Native value arrives
    /// straight on the owner's balance; issued value is forwarded by the
    /// input issuer, who already collected the taker's fee.
    fn pay_owner(
        &self,
        sandbox: &mut PaymentSandbox<'_>,
        owner: &AccountId,
        value: &BigDecimal,
    ) -> FlowResult<()> {
        if self.book_in.is_xrp() {
            let drops = match Amount::from_big(&Issue::XRP, value.clone()) {
                Ok(Amount::XRPAmount(drops)) => drops,
                _ => return Err(ViewError::Internal("bad native chunk".into()).into()),
            };
            let mut root = account_root(sandbox, owner)?;
            root.balance = root
                .balance
                .checked_add(drops)
                .map_err(|_| ViewError::Internal("owner balance overflow".into()))?;
            update_account_root(sandbox, root)?;
            Ok(())
        } else {
            ripple_credit(sandbox, &self.book_in.issuer, owner, self.book_in.currency, value)
                .map_err(Into::into)
        }
    }

    /// Collect the sold side from the owner, gross of any issuer fee.
    fn take_from_owner(
        &self,
        sandbox: &mut PaymentSandbox<'_>,
        owner: &AccountId,
        _net: &BigDecimal,
        gross: &BigDecimal,
    ) -> FlowResult<()> {
        if self.book_out.is_xrp() {
            let drops = match Amount::from_big_ceil(&Issue::XRP, gross.clone()) {
                Ok(Amount::XRPAmount(drops)) => drops,
                _ => return Err(ViewError::Internal("bad native chunk".into()).into()),
            };
            let mut root = account_root(sandbox, owner)?;
            let pre_balance = root.balance;
            root.balance = root
                .balance
                .checked_sub(drops)
                .map_err(|_| ViewError::Internal("owner balance underflow".into()))?;
            update_account_root(sandbox, root)?;
            sandbox.credit(
                owner,
                &AccountId::ZERO,
                Currency::XRP,
                drops.as_big(),
                pre_balance.as_big(),
            );
            Ok(())
        } else {
            ripple_credit(
                sandbox,
                owner,
                &self.book_out.issuer,
                self.book_out.currency,
                gross,
            )
            .map_err(Into::into)
        }
    }

    /// Shrink the offer by what was taken; fully consumed offers leave
    /// the ledger immediately.
    fn consume_offer(
        &self,
        sandbox: &mut PaymentSandbox<'_>,
        key: Hash256,
        mut offer: Offer,
        in_taken: &BigDecimal,
        out_taken: &BigDecimal,
    ) -> FlowResult<()> {
        let gets_left = offer.taker_gets.as_big() - out_taken;
        let pays_left = offer.taker_pays.as_big() - in_taken;
        if !gets_left.is_positive() || !pays_left.is_positive() {
            offer_delete(sandbox, key, &offer)?;
            return Ok(());
        }
        offer.taker_gets = Amount::from_big(&offer.taker_gets.issue(), gets_left)
            .map_err(|_| ViewError::Internal("offer remainder overflow".into()))?;
        offer.taker_pays = Amount::from_big(&offer.taker_pays.issue(), pays_left)
            .map_err(|_| ViewError::Internal("offer remainder overflow".into()))?;
        sandbox.update(key, LedgerEntry::Offer(offer))?;
        Ok(())
    }

    pub fn rev(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        out_requested: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        if self.inactive {
            return Ok((Amount::zero(&self.book_in), Amount::zero(&self.book_out)));
        }
        let used_before = self.offers_used;
        let result = self.walk(
            sandbox,
            ctx,
            Pass::Rev {
                out_target: out_requested.as_big(),
            },
        );
        // The reverse pass only sizes the step; it does not spend the
        // offer cap.
        self.offers_used = used_before;
        result
    }

    pub fn fwd(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        in_available: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        if self.inactive {
            return Ok((Amount::zero(&self.book_in), Amount::zero(&self.book_out)));
        }
        let out_cap = self.cache.as_ref().map(|cache| cache.cached_out.as_big());
        self.walk(
            sandbox,
            ctx,
            Pass::Fwd {
                in_limit: in_available.as_big(),
                out_cap,
            },
        )
    }
}
