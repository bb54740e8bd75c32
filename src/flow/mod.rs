//! Path-based payment execution: strands of steps crossing trust lines
//! and order books against a payment sandbox.

pub mod offers;
pub mod steps;
pub mod strand;

use alloc::vec::Vec;

use log::{debug, trace};

use crate::apply::config::Config;
use crate::core::types::{AccountId, Hash256, Quality};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::view::{LedgerView, ViewError};
use crate::models::amount::Amount;
use crate::ter::TransactionResult;

pub use strand::{to_strand, to_strands, Strand};

/// Errors inside flow execution: semantic outcomes carry their result
/// code, broken state is an internal failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowError {
    Ter(TransactionResult),
    View(ViewError),
}

impl From<ViewError> for FlowError {
    fn from(err: ViewError) -> Self {
        FlowError::View(err)
    }
}

impl From<TransactionResult> for FlowError {
    fn from(ter: TransactionResult) -> Self {
        FlowError::Ter(ter)
    }
}

impl FlowError {
    pub fn ter(&self) -> TransactionResult {
        match self {
            FlowError::Ter(ter) => *ter,
            FlowError::View(_) => TransactionResult::TefInternal,
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;

/// Shared mutable context threaded through step execution.
pub struct ExecCtx<'c> {
    pub config: &'c Config,
    /// Offers found unfunded or expired while crossing; erased when the
    /// flow finishes.
    pub offers_to_remove: Vec<Hash256>,
}

impl<'c> ExecCtx<'c> {
    pub fn new(config: &'c Config) -> Self {
        ExecCtx {
            config,
            offers_to_remove: Vec::new(),
        }
    }
}

/// What the caller asks of the flow engine.
#[derive(Debug, Clone)]
pub struct FlowParams {
    pub src: AccountId,
    pub dst: AccountId,
    /// The amount to deliver at the destination.
    pub deliver: Amount,
    /// Cap on the amount the source spends.
    pub send_max: Option<Amount>,
    /// Explicit path candidates from the transaction.
    pub paths: Vec<Vec<crate::models::transactions::payment::PathStep>>,
    /// Include the implicit default strand.
    pub default_path: bool,
    pub partial_payment: bool,
    pub deliver_min: Option<Amount>,
    /// Do not execute strands whose quality is worse than this.
    pub limit_quality: Option<Quality>,
    /// Offer crossing: the owner bears transfer fees on the output side.
    pub owner_pays_transfer_fee: bool,
}

#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub actual_in: Amount,
    pub actual_out: Amount,
}

const MAX_FLOW_ITERATIONS: usize = 1000;

/// Execute a payment (or crossing) against `sandbox`. On success the
/// sandbox holds all state changes; on failure it should be discarded by
/// the caller.
pub fn flow(
    sandbox: &mut PaymentSandbox<'_>,
    params: &FlowParams,
    config: &Config,
) -> Result<FlowOutcome, TransactionResult> {
    let src_issue = params
        .send_max
        .as_ref()
        .map(|amount| amount.issue())
        .unwrap_or_else(|| {
            if params.deliver.is_xrp() {
                crate::core::types::Issue::XRP
            } else {
                params.deliver.issue()
            }
        });
    let mut strands = to_strands(
        sandbox,
        &params.src,
        &params.dst,
        &params.deliver.issue(),
        src_issue,
        &params.paths,
        params.default_path,
        params.owner_pays_transfer_fee,
    )?;

    if strands.is_empty() {
        return Err(TransactionResult::TecNoLine);
    }
    debug!("flow: {} strand candidate(s)", strands.len());

    let mut ctx = ExecCtx::new(config);
    let mut remaining_out = params.deliver.clone();
    let mut remaining_in = params.send_max.clone();
    let mut total_in = Amount::zero(&src_issue);
    let mut total_out = Amount::zero(&params.deliver.issue());
    let mut active: Vec<bool> = strands.iter().map(|_| true).collect();

    for _ in 0..MAX_FLOW_ITERATIONS {
        if remaining_out.is_zero() {
            break;
        }
        if matches!(&remaining_in, Some(limit) if limit.is_zero()) {
            break;
        }

        // Select the strand with the best (lowest) quality upper bound.
        let mut best: Option<(usize, Quality)> = None;
        for (index, strand) in strands.iter().enumerate() {
            if !active[index] {
                continue;
            }
            match strand.quality_upper_bound(sandbox, &ctx) {
                Some(bound) => {
                    if best.map_or(true, |(_, held)| bound.0 < held.0) {
                        best = Some((index, bound));
                    }
                }
                None => active[index] = false,
            }
        }
        let (index, bound) = match best {
            Some(found) => found,
            None => break,
        };
        if let Some(limit) = &params.limit_quality {
            if !bound.within_limit(limit) {
                trace!("flow: best bound {bound} beyond limit quality {limit}");
                break;
            }
        }

        let mut attempt = sandbox.branch();
        let executed = strands[index].execute(
            &mut attempt,
            &mut ctx,
            &remaining_out,
            remaining_in.as_ref(),
        );
        match executed {
            Ok((strand_in, strand_out)) if !strand_out.is_zero() => {
                let layer = attempt.into_layer();
                sandbox
                    .absorb(layer)
                    .map_err(|_| TransactionResult::TefInternal)?;
                remaining_out = remaining_out
                    .checked_sub(&strand_out)
                    .unwrap_or_else(|_| Amount::zero(&remaining_out.issue()));
                if let Some(limit) = remaining_in.take() {
                    remaining_in = Some(
                        limit
                            .checked_sub(&strand_in)
                            .unwrap_or_else(|_| Amount::zero(&limit.issue())),
                    );
                }
                total_in = total_in
                    .checked_add(&strand_in)
                    .map_err(|_| TransactionResult::TefInternal)?;
                total_out = total_out
                    .checked_add(&strand_out)
                    .map_err(|_| TransactionResult::TefInternal)?;
                trace!("flow: strand {index} moved {strand_in} -> {strand_out}");
            }
            Ok(_) => {
                active[index] = false;
            }
            Err(FlowError::Ter(_)) => {
                active[index] = false;
            }
            Err(err @ FlowError::View(_)) => return Err(err.ter()),
        }
    }

    // Clear out offers found dead along the way.
    for key in core::mem::take(&mut ctx.offers_to_remove) {
        if let Some(entry) = sandbox.peek(&key) {
            if let Some(offer) = entry.into_offer() {
                offers::offer_delete(sandbox, key, &offer)
                    .map_err(|_| TransactionResult::TefInternal)?;
            }
        }
    }

    if !remaining_out.is_zero() {
        if !params.partial_payment {
            return Err(TransactionResult::TecPathPartial);
        }
        if total_out.is_zero() {
            return Err(TransactionResult::TecPathDry);
        }
    }
    if params.partial_payment {
        if let Some(minimum) = &params.deliver_min {
            if matches!(
                total_out.cmp_value(minimum),
                Ok(core::cmp::Ordering::Less) | Err(_)
            ) {
                return Err(TransactionResult::TecPathPartial);
            }
        }
    }

    Ok(FlowOutcome {
        actual_in: total_in,
        actual_out: total_out,
    })
}
