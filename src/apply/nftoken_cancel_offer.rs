//! The NFTokenCancelOffer applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::core::types::Hash256;
use crate::ledger::directory::dir_remove;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::adjust_owner_count;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::NFTokenOffer;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::NFTokenCancelOffer;
use crate::ter::TransactionResult;

pub fn preflight(tx: &NFTokenCancelOffer, _rules: &Rules) -> TxResult {
    if tx.nftoken_offers.is_empty() {
        return Err(TransactionResult::TemMalformed);
    }
    Ok(())
}

pub fn preclaim(tx: &NFTokenCancelOffer, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    // Every named offer must either be cancellable by the sender or
    // already gone.
    for key in &tx.nftoken_offers {
        if let Some(offer) = view.peek(key).and_then(LedgerEntry::into_nftoken_offer) {
            let sender = tx.common_fields.account;
            let permitted = offer.owner == sender
                || offer.destination == Some(sender)
                || offer.is_expired(config.parent_close_time);
            if !permitted {
                return Err(TransactionResult::TecNoPermission);
            }
        }
    }
    Ok(())
}

/// Remove an NFToken offer from the ledger and both its directories.
pub(crate) fn nftoken_offer_delete(
    ctx: &mut ApplyContext<'_, '_>,
    key: Hash256,
    offer: &NFTokenOffer,
) -> TxResult {
    let token_dir = if offer.is_sell() {
        keylet::nft_sells(&offer.nftoken_id)
    } else {
        keylet::nft_buys(&offer.nftoken_id)
    };
    dir_remove(
        ctx.view,
        token_dir.key,
        offer.nftoken_offer_node,
        &key,
        false,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    dir_remove(
        ctx.view,
        keylet::owner_dir(&offer.owner).key,
        offer.owner_node,
        &key,
        false,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    ctx.view
        .erase(&key)
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &offer.owner, -1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}

pub fn apply(tx: &NFTokenCancelOffer, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    for key in &tx.nftoken_offers {
        if let Some(offer) = ctx.view.peek(key).and_then(LedgerEntry::into_nftoken_offer) {
            nftoken_offer_delete(ctx, *key, &offer)?;
        }
    }
    Ok(())
}
