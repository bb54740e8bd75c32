//! One hop along a trust line: `src` extends or redeems credit with
//! `dst`. Issuer transfer fees show up as the step consuming more than it
//! emits.

use bigdecimal::{BigDecimal, Signed, Zero};

use crate::core::keylet;
use crate::core::types::{Issue, Quality};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{rate_ratio, ripple_credit, transfer_rate};
use crate::ledger::view::LedgerView;
use crate::models::amount::Amount;
use crate::models::ledger::objects::{RippleState, RippleStateFlag};

use super::super::{ExecCtx, FlowResult};
use super::{DebtDirection, DirectStep};

impl DirectStep {
    fn line(&self, sandbox: &PaymentSandbox<'_>) -> Option<RippleState> {
        sandbox
            .peek(&keylet::line(&self.src, &self.dst, &self.currency).key)?
            .into_ripple_state()
    }

    /// Sending is blocked by a counterparty freeze unless the sender is
    /// redeeming claims it already holds; a deep freeze on either side
    /// stops the line entirely.
    fn blocked(&self, sandbox: &PaymentSandbox<'_>, state: &RippleState) -> bool {
        if state.has_flag(RippleStateFlag::LsfLowDeepFreeze)
            || state.has_flag(RippleStateFlag::LsfHighDeepFreeze)
        {
            return true;
        }
        let dst_froze = state.side_flag(
            &self.dst,
            RippleStateFlag::LsfLowFreeze,
            RippleStateFlag::LsfHighFreeze,
        );
        if dst_froze && !state.balance_for(&self.src).value.is_positive() {
            return true;
        }
        // No-ripple: src refuses to be rippled through when both of its
        // adjoining lines carry its no-ripple flag.
        if let Some(previous) = &self.prev_account {
            let through_here = state.side_flag(
                &self.src,
                RippleStateFlag::LsfLowNoRipple,
                RippleStateFlag::LsfHighNoRipple,
            );
            let through_prev = sandbox
                .peek(&keylet::line(previous, &self.src, &self.currency).key)
                .and_then(|entry| entry.into_ripple_state())
                .map(|prev_state| {
                    prev_state.side_flag(
                        &self.src,
                        RippleStateFlag::LsfLowNoRipple,
                        RippleStateFlag::LsfHighNoRipple,
                    )
                })
                .unwrap_or(false);
            if through_here && through_prev {
                return true;
            }
        }
        false
    }

    /// How much `src` can still move toward `dst`: claims it holds plus
    /// the credit `dst` extends, after this transaction's deferred debits.
    fn capacity(&self, sandbox: &PaymentSandbox<'_>, state: &RippleState) -> BigDecimal {
        let reported = state.balance_for(&self.src);
        let adjusted = sandbox
            .balance_hook(
                &self.src,
                &self.dst,
                &Amount::IssuedCurrencyAmount(reported),
            )
            .as_big();
        let dst_limit = if self.dst == state.low_account() {
            state.low_limit.value.clone()
        } else {
            state.high_limit.value.clone()
        };
        let capacity = adjusted + dst_limit;
        if capacity.is_negative() {
            BigDecimal::zero()
        } else {
            capacity
        }
    }

    /// Input units consumed per output unit: the issuer's transfer rate
    /// when value ripples out of an account other than the strand source.
    fn ratio(&self, sandbox: &PaymentSandbox<'_>) -> BigDecimal {
        if self.src_is_strand_src {
            BigDecimal::from(1u32)
        } else {
            rate_ratio(transfer_rate(sandbox, &self.src))
        }
    }

    pub fn debt_direction(&self, sandbox: &PaymentSandbox<'_>) -> DebtDirection {
        match self.line(sandbox) {
            Some(state) if state.balance_for(&self.src).value.is_positive() => {
                DebtDirection::Redeems
            }
            _ => DebtDirection::Issues,
        }
    }

    pub fn quality_upper_bound(
        &self,
        sandbox: &PaymentSandbox<'_>,
        _ctx: &ExecCtx<'_>,
    ) -> Option<Quality> {
        let state = self.line(sandbox)?;
        if self.blocked(sandbox, &state) || self.capacity(sandbox, &state).is_zero() {
            return None;
        }
        Quality::from_big(&self.ratio(sandbox))
    }

    fn in_issue(&self) -> Issue {
        Issue::new(self.currency, self.src)
    }

    fn out_issue(&self) -> Issue {
        Issue::new(self.currency, self.dst)
    }

    pub fn rev(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        _ctx: &mut ExecCtx<'_>,
        out_requested: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        let dry = || {
            (
                Amount::zero(&self.in_issue()),
                Amount::zero(&self.out_issue()),
            )
        };
        let state = match self.line(sandbox) {
            Some(state) => state,
            None => return Ok(dry()),
        };
        if self.blocked(sandbox, &state) {
            return Ok(dry());
        }
        let capacity = self.capacity(sandbox, &state);
        let mut out = out_requested.as_big();
        if capacity < out {
            out = capacity;
        }
        if out.is_zero() {
            return Ok(dry());
        }
        let needed = &out * self.ratio(sandbox);
        Ok((
            Amount::from_big_ceil(&self.in_issue(), needed)
                .map_err(|_| crate::ter::TransactionResult::TefInternal)?,
            Amount::from_big(&self.out_issue(), out)
                .map_err(|_| crate::ter::TransactionResult::TefInternal)?,
        ))
    }

    pub fn fwd(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        _ctx: &mut ExecCtx<'_>,
        in_available: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        let dry = || {
            (
                Amount::zero(&self.in_issue()),
                Amount::zero(&self.out_issue()),
            )
        };
        let state = match self.line(sandbox) {
            Some(state) => state,
            None => return Ok(dry()),
        };
        if self.blocked(sandbox, &state) {
            return Ok(dry());
        }
        let ratio = self.ratio(sandbox);
        let mut out = in_available.as_big() / &ratio;
        let capacity = self.capacity(sandbox, &state);
        if capacity < out {
            out = capacity;
        }
        // The reverse pass binds the forward pass.
        if let Some(cache) = &self.cache {
            let promised = cache.cached_out.as_big();
            if promised < out {
                out = promised;
            }
        }
        if out.is_zero() {
            return Ok(dry());
        }
        ripple_credit(sandbox, &self.src, &self.dst, self.currency, &out)?;
        let consumed = &out * ratio;
        Ok((
            Amount::from_big_ceil(&self.in_issue(), consumed)
                .map_err(|_| crate::ter::TransactionResult::TefInternal)?,
            Amount::from_big(&self.out_issue(), out)
                .map_err(|_| crate::ter::TransactionResult::TefInternal)?,
        ))
    }
}
