//! Orchestrates one transaction: preflight, preclaim, apply, fee and
//! sequence accounting, commit, and metadata emission.

use alloc::vec::Vec;

use lazy_static::lazy_static;
use log::debug;

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::dir_remove;
use crate::ledger::meta::build_affected_nodes;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, update_account_root};
use crate::ledger::view::{LedgerView, ViewResult};
use crate::models::amount::XRPAmount;
use crate::models::transactions::metadata::TransactionMetadata;
use crate::models::transactions::{AnyTransaction, TransactionType};
use crate::ter::TransactionResult;

struct Dispatch {
    transaction_type: TransactionType,
    preflight: fn(&AnyTransaction, &Rules) -> TxResult,
    preclaim: fn(&AnyTransaction, &PaymentSandbox<'_>, &Config) -> TxResult,
    apply: fn(&AnyTransaction, &mut ApplyContext<'_, '_>) -> TxResult,
}

macro_rules! dispatch {
    ($ty:ident, $module:ident) => {{
        fn preflight(tx: &AnyTransaction, rules: &Rules) -> TxResult {
            match tx {
                AnyTransaction::$ty(tx) => crate::apply::$module::preflight(tx, rules),
                _ => Err(TransactionResult::TefInternal),
            }
        }
        fn preclaim(tx: &AnyTransaction, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
            match tx {
                AnyTransaction::$ty(tx) => crate::apply::$module::preclaim(tx, view, config),
                _ => Err(TransactionResult::TefInternal),
            }
        }
        fn apply(tx: &AnyTransaction, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
            match tx {
                AnyTransaction::$ty(tx) => crate::apply::$module::apply(tx, ctx),
                _ => Err(TransactionResult::TefInternal),
            }
        }
        Dispatch {
            transaction_type: TransactionType::$ty,
            preflight,
            preclaim,
            apply,
        }
    }};
}

lazy_static! {
    /// Process-lifetime applier registry, complete before the first
    /// transaction is applied.
    static ref REGISTRY: Vec<Dispatch> = alloc::vec![
        dispatch!(AccountDelete, account_delete),
        dispatch!(AccountSet, account_set),
        dispatch!(CheckCancel, check_cancel),
        dispatch!(CheckCash, check_cash),
        dispatch!(CheckCreate, check_create),
        dispatch!(DepositPreauth, deposit_preauth),
        dispatch!(NFTokenAcceptOffer, nftoken_accept_offer),
        dispatch!(NFTokenBurn, nftoken_burn),
        dispatch!(NFTokenCancelOffer, nftoken_cancel_offer),
        dispatch!(NFTokenCreateOffer, nftoken_create_offer),
        dispatch!(NFTokenMint, nftoken_mint),
        dispatch!(OfferCancel, offer_cancel),
        dispatch!(OfferCreate, offer_create),
        dispatch!(Payment, payment),
        dispatch!(PaymentChannelClaim, payment_channel_claim),
        dispatch!(PaymentChannelCreate, payment_channel_create),
        dispatch!(PaymentChannelFund, payment_channel_fund),
        dispatch!(SetRegularKey, set_regular_key),
        dispatch!(SignerListSet, signer_list_set),
        dispatch!(TicketCreate, ticket_create),
        dispatch!(TrustSet, trust_set),
    ];
}

fn lookup(transaction_type: TransactionType) -> Option<&'static Dispatch> {
    REGISTRY
        .iter()
        .find(|dispatch| dispatch.transaction_type == transaction_type)
}

/// What the sequence-or-ticket gate decided.
enum SeqKind {
    Sequence(u32),
    Ticket(u32),
}

fn check_sequence(
    tx: &AnyTransaction,
    view: &PaymentSandbox<'_>,
    account_sequence: u32,
) -> Result<SeqKind, TransactionResult> {
    let common = tx.common();
    match common.ticket_sequence {
        Some(ticket) => {
            if common.sequence.unwrap_or(0) != 0 {
                return Err(TransactionResult::TemBadSequence);
            }
            let key = keylet::ticket(&common.account, ticket).key;
            if view.exists(&key) {
                Ok(SeqKind::Ticket(ticket))
            } else if ticket >= account_sequence {
                Err(TransactionResult::TerPreTicket)
            } else {
                Err(TransactionResult::TefNoTicket)
            }
        }
        None => {
            let sequence = common.sequence.unwrap_or(0);
            if sequence < account_sequence {
                Err(TransactionResult::TefPastSeq)
            } else if sequence > account_sequence {
                Err(TransactionResult::TerPreSeq)
            } else {
                Ok(SeqKind::Sequence(sequence))
            }
        }
    }
}

/// Consume the sequence or ticket and charge the fee against the root
/// sandbox. Returns the sequence value entries created by this
/// transaction key off.
fn charge_and_advance(
    sandbox: &mut PaymentSandbox<'_>,
    tx: &AnyTransaction,
    kind: &SeqKind,
    fee: XRPAmount,
) -> ViewResult<u32> {
    let account = tx.common().account;
    let mut root = account_root(sandbox, &account)?;
    root.balance = root.balance.saturating_sub(fee);
    let consumed = match kind {
        SeqKind::Sequence(sequence) => {
            root.sequence = root.sequence.saturating_add(1);
            *sequence
        }
        SeqKind::Ticket(ticket) => *ticket,
    };
    update_account_root(sandbox, root)?;

    if let SeqKind::Ticket(ticket) = kind {
        let key = keylet::ticket(&account, *ticket).key;
        if let Some(entry) = sandbox.peek(&key) {
            if let Some(held) = entry.as_ticket() {
                dir_remove(
                    sandbox,
                    keylet::owner_dir(&account).key,
                    held.owner_node,
                    &key,
                    true,
                )?;
            }
            sandbox.erase(&key)?;
            crate::ledger::transfer::adjust_owner_count(sandbox, &account, -1)?;
        }
    }

    sandbox.adjust_drops_destroyed(fee.0);
    Ok(consumed)
}

/// Apply one validated transaction to the view. Returns the result code
/// and the metadata describing every affected entry. Non-applied results
/// (`tem`, `tef`, `tel`, `ter`) leave the view untouched and carry
/// minimal metadata; `tec` results claim the fee only.
pub fn apply_transaction(
    view: &mut dyn LedgerView,
    tx: &AnyTransaction,
    config: &Config,
) -> (TransactionResult, TransactionMetadata) {
    let txn_id = tx.hash();
    let transaction_type = tx.transaction_type();
    debug!("apply {transaction_type} {txn_id}");

    let dispatch = match lookup(transaction_type) {
        Some(dispatch) => dispatch,
        None => {
            return (
                TransactionResult::TefInternal,
                TransactionMetadata::minimal(TransactionResult::TefInternal),
            )
        }
    };

    // Universal preflight.
    let common = tx.common();
    let fee = common.fee.unwrap_or(XRPAmount::ZERO);
    if fee.0 < config.base_fee {
        return (
            TransactionResult::TelInsufFeeP,
            TransactionMetadata::minimal(TransactionResult::TelInsufFeeP),
        );
    }
    if common.account == crate::core::types::AccountId::ZERO {
        return (
            TransactionResult::TemBadSrcAccount,
            TransactionMetadata::minimal(TransactionResult::TemBadSrcAccount),
        );
    }
    if let Err(error) = (dispatch.preflight)(tx, &config.rules) {
        return (error, TransactionMetadata::minimal(error));
    }

    let mut root_sandbox = PaymentSandbox::root(view, txn_id, config.ledger_sequence);

    // The source must exist, cover the fee, and present the right
    // sequence or ticket.
    let source = match account_root(&root_sandbox, &common.account) {
        Ok(source) => source,
        Err(_) => {
            return (
                TransactionResult::TerNoAccount,
                TransactionMetadata::minimal(TransactionResult::TerNoAccount),
            )
        }
    };
    if let Some(last) = common.last_ledger_sequence {
        if config.ledger_sequence > last {
            return (
                TransactionResult::TefMaxLedger,
                TransactionMetadata::minimal(TransactionResult::TefMaxLedger),
            );
        }
    }
    let kind = match check_sequence(tx, &root_sandbox, source.sequence) {
        Ok(kind) => kind,
        Err(error) => return (error, TransactionMetadata::minimal(error)),
    };
    if source.balance < fee {
        return (
            TransactionResult::TerInsufFeeB,
            TransactionMetadata::minimal(TransactionResult::TerInsufFeeB),
        );
    }

    let seq_consumed = match charge_and_advance(&mut root_sandbox, tx, &kind, fee) {
        Ok(consumed) => consumed,
        Err(_) => {
            return (
                TransactionResult::TefInternal,
                TransactionMetadata::minimal(TransactionResult::TefInternal),
            )
        }
    };

    // Preclaim, then the applier proper on a child layer so claimed-cost
    // failures keep only the fee.
    let mut result = TransactionResult::TesSuccess;
    let mut delivered = None;
    match (dispatch.preclaim)(tx, &root_sandbox, config) {
        Ok(()) => {
            let mut child = root_sandbox.branch();
            let mut ctx = ApplyContext {
                view: &mut child,
                config,
                account: common.account,
                txn_id,
                seq_consumed,
                delivered_amount: None,
            };
            let applied = (dispatch.apply)(tx, &mut ctx);
            delivered = ctx.delivered_amount.take();
            match applied {
                Ok(()) => {
                    let layer = child.into_layer();
                    if root_sandbox.absorb(layer).is_err() {
                        return (
                            TransactionResult::TefInternal,
                            TransactionMetadata::minimal(TransactionResult::TefInternal),
                        );
                    }
                }
                Err(error) if error.is_tec() => {
                    // Drop the speculative layer; the fee stays claimed.
                    result = error;
                    delivered = None;
                }
                Err(error) => return (error, TransactionMetadata::minimal(error)),
            }
        }
        Err(error) if error.is_tec() => result = error,
        Err(error) => return (error, TransactionMetadata::minimal(error)),
    }

    // Commit: thread entries to this transaction, synthesize metadata,
    // replay onto the backing view.
    let mut layer = root_sandbox.into_layer();
    layer.thread_all(txn_id, config.ledger_sequence);
    let affected_nodes = build_affected_nodes(&layer);
    if layer.apply_to_view(view).is_err() {
        return (
            TransactionResult::TefInternal,
            TransactionMetadata::minimal(TransactionResult::TefInternal),
        );
    }

    let metadata = TransactionMetadata {
        transaction_index: 0,
        transaction_result: result,
        affected_nodes,
        delivered_amount: if result.is_tes() { delivered } else { None },
    };
    (result, metadata)
}
