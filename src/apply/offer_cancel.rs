//! The OfferCancel applier. Cancelling an absent offer succeeds.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::flow::offers::offer_delete;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::account_root;
use crate::ledger::view::LedgerView;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::OfferCancel;
use crate::ter::TransactionResult;

pub fn preflight(tx: &OfferCancel, _rules: &Rules) -> TxResult {
    if tx.offer_sequence == 0 {
        return Err(TransactionResult::TemBadSequence);
    }
    Ok(())
}

pub fn preclaim(tx: &OfferCancel, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    let account_sequence = account_root(view, &tx.common_fields.account)
        .map(|root| root.sequence)
        .unwrap_or(0);
    if tx.offer_sequence >= account_sequence {
        return Err(TransactionResult::TemBadSequence);
    }
    Ok(())
}

pub fn apply(tx: &OfferCancel, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let key = keylet::offer(&ctx.account, tx.offer_sequence).key;
    if let Some(offer) = ctx.view.peek(&key).and_then(LedgerEntry::into_offer) {
        offer_delete(ctx.view, key, &offer).map_err(|_| TransactionResult::TefInternal)?;
    }
    Ok(())
}
