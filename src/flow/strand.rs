//! Assembling candidate strands from transaction paths and executing one
//! strand: reverse pass to size it, forward pass to realize it.

use alloc::vec::Vec;

use bigdecimal::{BigDecimal, One};
use log::trace;

use crate::core::types::{AccountId, Hash256, Issue, Quality};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, update_account_root};
use crate::models::amount::Amount;
use crate::models::transactions::payment::PathStep;
use crate::ter::TransactionResult;

use super::steps::{BookStep, DirectStep, Step, XrpEndpointStep};
use super::{ExecCtx, FlowResult};

const MAX_STRAND_STEPS: usize = 20;

pub struct Strand {
    pub steps: Vec<Step>,
}

struct StrandBuilder<'b> {
    strand_src: AccountId,
    strand_dst: AccountId,
    owner_pays_transfer_fee: bool,
    steps: Vec<Step>,
    /// Where the value currently sits: an account, or nowhere when the
    /// running issue is native.
    position: Option<AccountId>,
    current: Issue,
    prev_account: Option<AccountId>,
    seen: Vec<(Option<AccountId>, Issue)>,
    _sandbox: &'b PaymentSandbox<'b>,
}

impl<'b> StrandBuilder<'b> {
    fn push_direct(&mut self, src: AccountId, dst: AccountId) -> Result<(), TransactionResult> {
        if src == dst {
            return Ok(());
        }
        self.steps.push(Step::Direct(DirectStep {
            src,
            dst,
            currency: self.current.currency,
            prev_account: self.prev_account,
            src_is_strand_src: src == self.strand_src,
            cache: None,
        }));
        self.prev_account = Some(src);
        self.position = Some(dst);
        self.note_position()?;
        Ok(())
    }

    fn push_book(&mut self, out: Issue) -> Result<(), TransactionResult> {
        // Selling an issued currency into a book requires holding claims
        // on its issuer; bridge to the issuer first.
        if !self.current.is_xrp() {
            if let Some(position) = self.position {
                if position != self.current.issuer {
                    let issuer = self.current.issuer;
                    self.push_direct(position, issuer)?;
                }
            }
        }
        self.steps.push(Step::Book(BookStep {
            book_in: self.current,
            book_out: out,
            strand_src: self.strand_src,
            strand_dst: self.strand_dst,
            owner_pays_transfer_fee: self.owner_pays_transfer_fee,
            offers_used: 0,
            inactive: false,
            cache: None,
        }));
        self.prev_account = None;
        self.current = out;
        self.position = if out.is_xrp() { None } else { Some(out.issuer) };
        self.note_position()?;
        Ok(())
    }

    fn note_position(&mut self) -> Result<(), TransactionResult> {
        let mark = (self.position, self.current);
        if self.seen.contains(&mark) {
            return Err(TransactionResult::TemBadPathLoop);
        }
        self.seen.push(mark);
        if self.steps.len() > MAX_STRAND_STEPS {
            return Err(TransactionResult::TemBadPath);
        }
        Ok(())
    }
}

/// Build one strand from source to destination through the given path
/// elements.
pub fn to_strand(
    sandbox: &PaymentSandbox<'_>,
    src: &AccountId,
    dst: &AccountId,
    deliver: &Issue,
    src_issue: Issue,
    path: &[PathStep],
    owner_pays_transfer_fee: bool,
) -> Result<Strand, TransactionResult> {
    let mut builder = StrandBuilder {
        strand_src: *src,
        strand_dst: *dst,
        owner_pays_transfer_fee,
        steps: Vec::new(),
        position: if src_issue.is_xrp() { None } else { Some(*src) },
        current: src_issue,
        prev_account: None,
        seen: Vec::new(),
        _sandbox: sandbox,
    };

    if src_issue.is_xrp() {
        builder
            .steps
            .push(Step::XrpEndpoint(XrpEndpointStep::new(*src, false)));
    }
    builder.note_position()?;

    for element in path {
        match (element.account, element.currency, element.issuer) {
            (Some(account), None, None) => {
                let from = builder
                    .position
                    .ok_or(TransactionResult::TemBadPath)?;
                if builder.current.is_xrp() {
                    return Err(TransactionResult::TemBadPath);
                }
                builder.push_direct(from, account)?;
            }
            (None, currency, issuer) => {
                let currency = currency.unwrap_or(crate::core::types::Currency::XRP);
                let next = if currency.is_xrp() {
                    Issue::XRP
                } else {
                    Issue::new(currency, issuer.ok_or(TransactionResult::TemBadPath)?)
                };
                builder.push_book(next)?;
            }
            _ => return Err(TransactionResult::TemBadPath),
        }
    }

    // Convert into the delivered issue if the path has not already.
    if builder.current != *deliver
        && !(builder.current.is_xrp() && deliver.is_xrp())
        && builder.current.currency != deliver.currency
    {
        builder.push_book(*deliver)?;
    } else if !builder.current.is_xrp()
        && builder.current.currency == deliver.currency
        && builder.current.issuer != deliver.issuer
        && builder.position != Some(deliver.issuer)
    {
        // Same currency, different issuer: ripple across the issuers.
        let from = builder.position.ok_or(TransactionResult::TemBadPath)?;
        builder.push_direct(from, deliver.issuer)?;
    }

    if deliver.is_xrp() {
        builder
            .steps
            .push(Step::XrpEndpoint(XrpEndpointStep::new(*dst, true)));
    } else {
        let from = builder.position.ok_or(TransactionResult::TemBadPath)?;
        if from != *dst {
            // Issued value ripples through its issuer unless an endpoint
            // already is the issuer.
            if from != deliver.issuer && *dst != deliver.issuer {
                builder.push_direct(from, deliver.issuer)?;
                builder.push_direct(deliver.issuer, *dst)?;
            } else {
                builder.push_direct(from, *dst)?;
            }
        }
    }

    if builder.steps.is_empty() {
        return Err(TransactionResult::TemBadPath);
    }
    Ok(Strand {
        steps: builder.steps,
    })
}

/// All candidate strands: the transaction's paths plus, unless excluded,
/// the implicit default strand. Malformed candidates are skipped unless
/// nothing survives.
#[allow(clippy::too_many_arguments)]
pub fn to_strands(
    sandbox: &PaymentSandbox<'_>,
    src: &AccountId,
    dst: &AccountId,
    deliver: &Issue,
    src_issue: Issue,
    paths: &Vec<Vec<PathStep>>,
    default_path: bool,
    owner_pays_transfer_fee: bool,
) -> Result<Vec<Strand>, TransactionResult> {
    let mut strands = Vec::new();
    let mut first_error: Option<TransactionResult> = None;

    if default_path {
        match to_strand(sandbox, src, dst, deliver, src_issue, &[], owner_pays_transfer_fee) {
            Ok(strand) => strands.push(strand),
            Err(error) => first_error = first_error.or(Some(error)),
        }
    }
    for path in paths {
        match to_strand(sandbox, src, dst, deliver, src_issue, path, owner_pays_transfer_fee) {
            Ok(strand) => strands.push(strand),
            Err(error) => first_error = first_error.or(Some(error)),
        }
    }
    if strands.is_empty() {
        return Err(first_error.unwrap_or(TransactionResult::TemBadPath));
    }
    Ok(strands)
}

impl Strand {
    /// The best composite rate the strand could achieve: the product of
    /// each step's bound. Absent when any step is dry.
    pub fn quality_upper_bound(
        &self,
        sandbox: &PaymentSandbox<'_>,
        ctx: &ExecCtx<'_>,
    ) -> Option<Quality> {
        let mut composite = BigDecimal::one();
        for step in &self.steps {
            let bound = step.quality_upper_bound(sandbox, ctx)?;
            composite = composite * bound.as_big();
        }
        Quality::from_big(&composite)
    }

    /// Reverse then forward: size the strand against the requested output
    /// (and optional input cap), then realize it against the sandbox.
    /// Returns (input consumed, output delivered).
    pub fn execute(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        out_requested: &Amount,
        in_limit: Option<&Amount>,
    ) -> FlowResult<(Amount, Amount)> {
        for step in &mut self.steps {
            step.clear_cache();
        }
        let in_issue = self.steps[0].input_issue();
        let out_issue = out_requested.issue();
        let dry = || (Amount::zero(&in_issue), Amount::zero(&out_issue));

        // Reverse pass, right to left.
        let mut needed = out_requested.clone();
        for step in self.steps.iter_mut().rev() {
            let (step_in, step_out) = step.rev(sandbox, ctx, &needed)?;
            if step_out.is_zero() {
                return Ok(dry());
            }
            needed = step_in;
        }

        let mut input = needed;
        if let Some(limit) = in_limit {
            if matches!(limit.cmp_value(&input), Ok(core::cmp::Ordering::Less)) {
                input = limit.clone();
            }
        }
        if input.is_zero() {
            return Ok(dry());
        }

        // Forward pass, left to right, mutating the sandbox.
        let mut results: Vec<(Amount, Amount)> = Vec::with_capacity(self.steps.len());
        let mut available = input;
        for step in self.steps.iter_mut() {
            let (consumed, produced) = step.fwd(sandbox, ctx, &available)?;
            if !step.valid_fwd(&consumed, &produced) {
                trace!("strand: forward exceeded reverse promise");
                return Err(TransactionResult::TecInternal.into());
            }
            available = produced.clone();
            results.push((consumed, produced));
        }

        // A native head may have been debited more than the next step
        // could consume; hand the difference back.
        if self.steps.len() > 1 {
            if let Step::XrpEndpoint(head) = &self.steps[0] {
                let payer = head.account;
                if let (Amount::XRPAmount(produced), Amount::XRPAmount(consumed_next)) =
                    (results[0].1.clone(), results[1].0.clone())
                {
                    if !head.is_last && consumed_next < produced {
                        let refund = produced.saturating_sub(consumed_next);
                        let mut root = account_root(sandbox, &payer)?;
                        root.balance = root.balance.checked_add(refund).map_err(|_| {
                            crate::ledger::view::ViewError::Internal("refund overflow".into())
                        })?;
                        update_account_root(sandbox, root)?;
                        results[0] = (
                            Amount::XRPAmount(consumed_next),
                            Amount::XRPAmount(consumed_next),
                        );
                    }
                }
            }
        }

        let actual_in = results
            .first()
            .map(|(consumed, _)| consumed.clone())
            .unwrap_or_else(|| Amount::zero(&self.steps[0].input_issue()));
        let actual_out = results
            .last()
            .map(|(_, produced)| produced.clone())
            .unwrap_or_else(|| Amount::zero(&out_requested.issue()));
        Ok((actual_in, actual_out))
    }

    pub fn offers_used(&self) -> usize {
        self.steps.iter().map(|step| step.offers_used()).sum()
    }

    /// Keys of every book the strand crosses, for diagnostics.
    pub fn books(&self) -> Vec<Hash256> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Book(book) => Some(book.book_base()),
                _ => None,
            })
            .collect()
    }
}
