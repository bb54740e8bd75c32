//! The NFTokenAcceptOffer applier: direct acceptance of a buy or sell
//! offer, or brokering a matched pair for a fee.

use bigdecimal::BigDecimal;

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::nftoken_cancel_offer::nftoken_offer_delete;
use crate::apply::nftoken_pages::{find_token, insert_token, remove_token};
use crate::apply::TxResult;
use crate::core::types::{AccountId, Hash256};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::view::LedgerView;
use crate::ledger::transfer::{
    funds_available, send_xrp, transfer_iou,
};
use crate::models::amount::{Amount, IssuedCurrencyAmount};
use crate::models::ledger::objects::NFTokenOffer;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::NFTokenAcceptOffer;
use crate::ter::TransactionResult;
use crate::utils::nftoken_id::parse_nftoken_id;

pub fn preflight(tx: &NFTokenAcceptOffer, _rules: &Rules) -> TxResult {
    if tx.nftoken_sell_offer.is_none() && tx.nftoken_buy_offer.is_none() {
        return Err(TransactionResult::TemMalformed);
    }
    if let Some(fee) = &tx.nftoken_broker_fee {
        if !tx.is_brokered() {
            return Err(TransactionResult::TemMalformed);
        }
        if fee.is_zero() || fee.is_negative() {
            return Err(TransactionResult::TemMalformed);
        }
    }
    Ok(())
}

fn load_offer(
    view: &PaymentSandbox<'_>,
    key: &Option<Hash256>,
) -> Result<Option<NFTokenOffer>, TransactionResult> {
    match key {
        None => Ok(None),
        Some(key) => view
            .peek(key)
            .and_then(LedgerEntry::into_nftoken_offer)
            .map(Some)
            .ok_or(TransactionResult::TecObjectNotFound),
    }
}

pub fn preclaim(tx: &NFTokenAcceptOffer, view: &PaymentSandbox<'_>, config: &Config) -> TxResult {
    let sender = tx.common_fields.account;
    let sell = load_offer(view, &tx.nftoken_sell_offer)?;
    let buy = load_offer(view, &tx.nftoken_buy_offer)?;

    for offer in [&sell, &buy].into_iter().flatten() {
        if offer.is_expired(config.parent_close_time) {
            return Err(TransactionResult::TecExpired);
        }
    }
    if let Some(sell) = &sell {
        if !sell.is_sell() {
            return Err(TransactionResult::TecNFTokenOfferTypeMismatch);
        }
        // The seller must still hold the token.
        if find_token(view, &sell.owner, &sell.nftoken_id).is_none() {
            return Err(TransactionResult::TecNoPermission);
        }
    }
    if let Some(buy) = &buy {
        if buy.is_sell() {
            return Err(TransactionResult::TecNFTokenOfferTypeMismatch);
        }
    }

    match (&sell, &buy) {
        (Some(sell), Some(buy)) => {
            if sell.nftoken_id != buy.nftoken_id {
                return Err(TransactionResult::TecNFTokenBuySellMismatch);
            }
            if sell.owner == buy.owner {
                return Err(TransactionResult::TecNFTokenBuySellMismatch);
            }
            if sell.amount.issue() != buy.amount.issue() {
                return Err(TransactionResult::TecNFTokenBuySellMismatch);
            }
            if matches!(
                buy.amount.cmp_value(&sell.amount),
                Ok(core::cmp::Ordering::Less) | Err(_)
            ) {
                return Err(TransactionResult::TecInsufficientPayment);
            }
            if let Some(destination) = sell.destination {
                if destination != buy.owner && destination != sender {
                    return Err(TransactionResult::TecNoPermission);
                }
            }
            if let Some(destination) = buy.destination {
                if destination != sell.owner && destination != sender {
                    return Err(TransactionResult::TecNoPermission);
                }
            }
            if let Some(fee) = &tx.nftoken_broker_fee {
                let spread = buy
                    .amount
                    .checked_sub(&sell.amount)
                    .map_err(|_| TransactionResult::TecNFTokenBuySellMismatch)?;
                if matches!(
                    fee.cmp_value(&spread),
                    Ok(core::cmp::Ordering::Greater) | Ok(core::cmp::Ordering::Equal) | Err(_)
                ) {
                    return Err(TransactionResult::TecInsufficientPayment);
                }
            }
        }
        (Some(sell), None) => {
            if sell.owner == sender {
                return Err(TransactionResult::TecCantAcceptOwnNFTokenOffer);
            }
            if let Some(destination) = sell.destination {
                if destination != sender {
                    return Err(TransactionResult::TecNoPermission);
                }
            }
        }
        (None, Some(buy)) => {
            if buy.owner == sender {
                return Err(TransactionResult::TecCantAcceptOwnNFTokenOffer);
            }
            // Accepting a bid requires holding the token.
            if find_token(view, &sender, &buy.nftoken_id).is_none() {
                return Err(TransactionResult::TecNoPermission);
            }
            if let Some(destination) = buy.destination {
                if destination != sender {
                    return Err(TransactionResult::TecNoPermission);
                }
            }
        }
        (None, None) => return Err(TransactionResult::TemMalformed),
    }
    Ok(())
}

fn pay(
    ctx: &mut ApplyContext<'_, '_>,
    from: &AccountId,
    to: &AccountId,
    amount: &Amount,
) -> TxResult {
    if amount.is_zero() || from == to {
        return Ok(());
    }
    match amount {
        Amount::XRPAmount(drops) => send_xrp(ctx.view, from, to, *drops)
            .map_err(|_| TransactionResult::TecInsufficientFunds),
        Amount::IssuedCurrencyAmount(issued) => transfer_iou(ctx.view, from, to, issued)
            .map_err(|_| TransactionResult::TecInsufficientFunds),
    }
}

pub fn apply(tx: &NFTokenAcceptOffer, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let sender = ctx.account;
    let sell = load_offer(ctx.view, &tx.nftoken_sell_offer)?;
    let buy = load_offer(ctx.view, &tx.nftoken_buy_offer)?;

    let (buyer, seller, token_id, price) = match (&sell, &buy) {
        (Some(sell), Some(buy)) => (buy.owner, sell.owner, sell.nftoken_id, buy.amount.clone()),
        (Some(sell), None) => (sender, sell.owner, sell.nftoken_id, sell.amount.clone()),
        (None, Some(buy)) => (buy.owner, sender, buy.nftoken_id, buy.amount.clone()),
        (None, None) => return Err(TransactionResult::TemMalformed),
    };
    let broker_fee = tx
        .nftoken_broker_fee
        .clone()
        .unwrap_or_else(|| Amount::zero(&price.issue()));

    // The buyer must be good for the whole price.
    let funds = funds_available(ctx.view, &buyer, &price, ctx.config)
        .map_err(|_| TransactionResult::TefInternal)?;
    if matches!(
        funds.cmp_value(&price),
        Ok(core::cmp::Ordering::Less) | Err(_)
    ) {
        return Err(TransactionResult::TecInsufficientFunds);
    }

    // Broker first, then the issuer's cut, then the seller.
    let mut to_seller = price.checked_sub(&broker_fee).map_err(|_| {
        TransactionResult::TefInternal
    })?;
    pay(ctx, &buyer, &sender, &broker_fee)?;

    let parts = parse_nftoken_id(&token_id);
    if parts.transfer_fee > 0 && parts.issuer != seller && parts.issuer != buyer {
        let cut_value = to_seller.as_big() * BigDecimal::from(parts.transfer_fee as u32)
            / BigDecimal::from(crate::constants::NFTOKEN_MAX_TRANSFER_FEE as u32);
        let cut = match &to_seller {
            Amount::XRPAmount(_) => {
                Amount::from_big(&to_seller.issue(), cut_value)
                    .map_err(|_| TransactionResult::TefInternal)?
            }
            Amount::IssuedCurrencyAmount(issued) => Amount::IssuedCurrencyAmount(
                IssuedCurrencyAmount::new(issued.currency, issued.issuer, cut_value),
            ),
        };
        pay(ctx, &buyer, &parts.issuer, &cut)?;
        to_seller = to_seller
            .checked_sub(&cut)
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    pay(ctx, &buyer, &seller, &to_seller)?;

    // Move the token.
    let token = remove_token(ctx.view, &seller, &token_id)?;
    insert_token(ctx.view, &buyer, token)?;

    if let Some(sell_offer) = sell {
        nftoken_offer_delete(ctx, tx.nftoken_sell_offer.unwrap_or_default(), &sell_offer)?;
    }
    if let Some(buy_offer) = buy {
        nftoken_offer_delete(ctx, tx.nftoken_buy_offer.unwrap_or_default(), &buy_offer)?;
    }
    Ok(())
}
