//! The NFTokenCreateOffer applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::nftoken_pages::find_token;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::directory::{dir_insert, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{adjust_owner_count, is_frozen};
use crate::ledger::view::LedgerView;
use crate::models::amount::Amount;
use crate::models::ledger::objects::{NFTokenOffer, NFTokenOfferFlag};
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::NFTokenCreateOffer;
use crate::ter::TransactionResult;
use crate::utils::nftoken_id::parse_nftoken_id;

const LSF_ONLY_XRP: u16 = 0x0002;
const LSF_TRANSFERABLE: u16 = 0x0008;

pub fn preflight(tx: &NFTokenCreateOffer, _rules: &Rules) -> TxResult {
    if tx.amount.is_negative() {
        return Err(TransactionResult::TemBadAmount);
    }
    if !tx.is_sell() && tx.amount.is_zero() {
        // A bid for nothing is no bid.
        return Err(TransactionResult::TemBadAmount);
    }
    if tx.is_sell() {
        if tx.owner.is_some() {
            return Err(TransactionResult::TemMalformed);
        }
    } else {
        match tx.owner {
            None => return Err(TransactionResult::TemMalformed),
            Some(owner) if owner == tx.common_fields.account => {
                return Err(TransactionResult::TemMalformed)
            }
            _ => {}
        }
    }
    if tx.destination == Some(tx.common_fields.account) {
        return Err(TransactionResult::TemMalformed);
    }
    if tx.expiration == Some(0) {
        return Err(TransactionResult::TemBadExpiration);
    }
    Ok(())
}

pub fn preclaim(tx: &NFTokenCreateOffer, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    let holder = tx.owner.unwrap_or(tx.common_fields.account);
    if find_token(view, &holder, &tx.nftoken_id).is_none() {
        return Err(TransactionResult::TecNoEntry);
    }
    let parts = parse_nftoken_id(&tx.nftoken_id);
    if parts.flags & LSF_ONLY_XRP != 0 && tx.amount.is_issued_currency() {
        return Err(TransactionResult::TecNoPermission);
    }
    if parts.flags & LSF_TRANSFERABLE == 0
        && parts.issuer != tx.common_fields.account
        && tx.destination != Some(parts.issuer)
    {
        return Err(TransactionResult::TecNoPermission);
    }
    if let Amount::IssuedCurrencyAmount(amount) = &tx.amount {
        if is_frozen(view, &tx.common_fields.account, &amount.issue()) {
            return Err(TransactionResult::TecFrozen);
        }
    }
    Ok(())
}

pub fn apply(tx: &NFTokenCreateOffer, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    ctx.can_afford_new_object(TransactionResult::TecInsufficientReserve)?;

    let keylet = keylet::nftoken_offer(&ctx.account, ctx.seq_consumed);
    let token_dir = if tx.is_sell() {
        keylet::nft_sells(&tx.nftoken_id)
    } else {
        keylet::nft_buys(&tx.nftoken_id)
    };

    let mut offer = NFTokenOffer {
        owner: ctx.account,
        nftoken_id: tx.nftoken_id,
        amount: tx.amount.clone(),
        destination: tx.destination,
        expiration: tx.expiration,
        flags: if tx.is_sell() {
            NFTokenOfferFlag::LsfSellNFToken as u32
        } else {
            0
        },
        ..Default::default()
    };
    offer.owner_node = dir_insert(
        ctx.view,
        keylet::owner_dir(&ctx.account).key,
        &DirectoryKind::Owner(ctx.account),
        keylet.key,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    offer.nftoken_offer_node = dir_insert(
        ctx.view,
        token_dir.key,
        &DirectoryKind::Plain,
        keylet.key,
    )
    .map_err(|_| TransactionResult::TefInternal)?;
    ctx.view
        .insert(keylet.key, LedgerEntry::NFTokenOffer(offer))
        .map_err(|_| TransactionResult::TefInternal)?;
    adjust_owner_count(ctx.view, &ctx.account, 1)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
