//! Strand steps: polymorphic over endpoint, trust-line, and order-book
//! hops, dispatched by pattern match.

pub mod book;
pub mod direct;
pub mod xrp_endpoint;

use crate::core::types::{AccountId, Currency, Issue, Quality};
use crate::ledger::sandbox::PaymentSandbox;
use crate::models::amount::Amount;

use super::{ExecCtx, FlowResult};

/// Whether a step extends new debt or redeems existing debt at its
/// output. Issuing steps cannot offer a better-than-face rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtDirection {
    Issues,
    Redeems,
}

/// The last reverse-pass result, binding the forward pass.
#[derive(Debug, Clone)]
pub struct Cache {
    pub cached_in: Amount,
    pub cached_out: Amount,
}

/// A native endpoint at the head or tail of a strand.
#[derive(Debug, Clone)]
pub struct XrpEndpointStep {
    pub account: AccountId,
    pub is_last: bool,
    pub cache: Option<Cache>,
}

/// One hop along a trust line.
#[derive(Debug, Clone)]
pub struct DirectStep {
    pub src: AccountId,
    pub dst: AccountId,
    pub currency: Currency,
    /// The account value rippled out of before reaching `src`; used for
    /// the no-ripple rule.
    pub prev_account: Option<AccountId>,
    /// The strand source pays no transfer fee out of itself.
    pub src_is_strand_src: bool,
    pub cache: Option<Cache>,
}

/// Crossing one order book, best offers first.
#[derive(Debug, Clone)]
pub struct BookStep {
    pub book_in: Issue,
    pub book_out: Issue,
    pub strand_src: AccountId,
    pub strand_dst: AccountId,
    pub owner_pays_transfer_fee: bool,
    pub offers_used: usize,
    pub inactive: bool,
    pub cache: Option<Cache>,
}

#[derive(Debug, Clone)]
pub enum Step {
    XrpEndpoint(XrpEndpointStep),
    Direct(DirectStep),
    Book(BookStep),
}

impl Step {
    pub fn input_issue(&self) -> Issue {
        match self {
            Step::XrpEndpoint(_) => Issue::XRP,
            Step::Direct(step) => Issue::new(step.currency, step.src),
            Step::Book(step) => step.book_in,
        }
    }

    pub fn output_issue(&self) -> Issue {
        match self {
            Step::XrpEndpoint(_) => Issue::XRP,
            Step::Direct(step) => Issue::new(step.currency, step.dst),
            Step::Book(step) => step.book_out,
        }
    }

    pub fn cache(&self) -> Option<&Cache> {
        match self {
            Step::XrpEndpoint(step) => step.cache.as_ref(),
            Step::Direct(step) => step.cache.as_ref(),
            Step::Book(step) => step.cache.as_ref(),
        }
    }

    pub fn clear_cache(&mut self) {
        match self {
            Step::XrpEndpoint(step) => step.cache = None,
            Step::Direct(step) => step.cache = None,
            Step::Book(step) => step.cache = None,
        }
    }

    /// A step past its offer cap no longer participates.
    pub fn inactive(&self) -> bool {
        match self {
            Step::Book(step) => step.inactive,
            _ => false,
        }
    }

    pub fn offers_used(&self) -> usize {
        match self {
            Step::Book(step) => step.offers_used,
            _ => 0,
        }
    }

    pub fn debt_direction(&self, sandbox: &PaymentSandbox<'_>) -> DebtDirection {
        match self {
            Step::XrpEndpoint(_) => DebtDirection::Issues,
            Step::Direct(step) => step.debt_direction(sandbox),
            Step::Book(_) => DebtDirection::Issues,
        }
    }

    /// Best quality this step could possibly yield, or `None` when dry.
    pub fn quality_upper_bound(
        &self,
        sandbox: &PaymentSandbox<'_>,
        ctx: &ExecCtx<'_>,
    ) -> Option<Quality> {
        match self {
            Step::XrpEndpoint(step) => step.quality_upper_bound(sandbox, ctx),
            Step::Direct(step) => step.quality_upper_bound(sandbox, ctx),
            Step::Book(step) => step.quality_upper_bound(sandbox, ctx),
        }
    }

    /// Reverse pass: the input required at this step to produce (up to)
    /// the requested output. Caches the pair.
    pub fn rev(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        out_requested: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        let result = match self {
            Step::XrpEndpoint(step) => step.rev(sandbox, ctx, out_requested)?,
            Step::Direct(step) => step.rev(sandbox, ctx, out_requested)?,
            Step::Book(step) => step.rev(sandbox, ctx, out_requested)?,
        };
        let cache = Cache {
            cached_in: result.0.clone(),
            cached_out: result.1.clone(),
        };
        match self {
            Step::XrpEndpoint(step) => step.cache = Some(cache),
            Step::Direct(step) => step.cache = Some(cache),
            Step::Book(step) => step.cache = Some(cache),
        }
        Ok(result)
    }

    /// Forward pass: consume the available input, mutate the sandbox, and
    /// report what was realized. Forward output is bound by the cached
    /// reverse output so the passes stay symmetric.
    pub fn fwd(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        in_available: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        match self {
            Step::XrpEndpoint(step) => step.fwd(sandbox, ctx, in_available),
            Step::Direct(step) => step.fwd(sandbox, ctx, in_available),
            Step::Book(step) => step.fwd(sandbox, ctx, in_available),
        }
    }

    /// Forward results must not exceed what the reverse pass promised.
    pub fn valid_fwd(&self, in_consumed: &Amount, out_produced: &Amount) -> bool {
        match self.cache() {
            Some(cache) => {
                !matches!(
                    out_produced.cmp_value(&cache.cached_out),
                    Ok(core::cmp::Ordering::Greater) | Err(_)
                ) && !matches!(
                    in_consumed.cmp_value(&cache.cached_in),
                    Ok(core::cmp::Ordering::Greater) | Err(_)
                )
            }
            None => false,
        }
    }
}
