//! Shared order-book offer bookkeeping.

use bigdecimal::BigDecimal;

use crate::apply::config::Config;
use crate::core::keylet;
use crate::core::types::Hash256;
use crate::ledger::directory::{dir_remove, dir_insert, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{adjust_owner_count, funds_available, rate_ratio, transfer_rate};
use crate::ledger::view::{LedgerView, ViewResult};
use crate::models::amount::Amount;
use crate::models::ledger::objects::Offer;
use crate::models::ledger::LedgerEntry;

/// What the offer owner can actually deliver against `TakerGets`, after
/// this transaction's deferred credits and, when the owner bears it, the
/// transfer fee on the sold side.
pub fn offer_funded_gets(
    sandbox: &PaymentSandbox<'_>,
    offer: &Offer,
    config: &Config,
    owner_pays_transfer_fee: bool,
) -> Amount {
    let gets_issue = offer.taker_gets.issue();
    let funds = match funds_available(sandbox, &offer.account, &offer.taker_gets, config) {
        Ok(funds) => funds,
        Err(_) => return Amount::zero(&gets_issue),
    };
    let mut available = funds.as_big();
    if owner_pays_transfer_fee && !gets_issue.is_xrp() && gets_issue.issuer != offer.account {
        // The owner must cover gets x rate; scale what the funds can back.
        let rate = transfer_rate(sandbox, &gets_issue.issuer);
        available = available / rate_ratio(rate);
    }
    let offered = offer.taker_gets.as_big();
    let funded = if available < offered { available } else { offered };
    if funded < BigDecimal::from(0) {
        return Amount::zero(&gets_issue);
    }
    Amount::from_big(&gets_issue, funded).unwrap_or_else(|_| Amount::zero(&gets_issue))
}

/// Remove an offer from the ledger, its book page, and its owner's
/// directory, releasing the owner's reserve.
pub fn offer_delete(
    sandbox: &mut PaymentSandbox<'_>,
    key: Hash256,
    offer: &Offer,
) -> ViewResult<()> {
    dir_remove(
        sandbox,
        offer.book_directory,
        offer.book_node,
        &key,
        false,
    )?;
    dir_remove(
        sandbox,
        keylet::owner_dir(&offer.account).key,
        offer.owner_node,
        &key,
        false,
    )?;
    sandbox.erase(&key)?;
    adjust_owner_count(sandbox, &offer.account, -1)
}

/// Place an offer into its book page and the owner's directory, filling
/// in the node hints, and write the entry. The caller has already done
/// reserve and funding checks.
pub fn offer_place(
    sandbox: &mut PaymentSandbox<'_>,
    key: Hash256,
    mut offer: Offer,
) -> ViewResult<()> {
    let pays = offer.taker_pays.issue();
    let gets = offer.taker_gets.issue();
    let rate = offer.book_directory.low_64();
    offer.book_node = dir_insert(
        sandbox,
        offer.book_directory,
        &DirectoryKind::Book { pays, gets, rate },
        key,
    )?;
    offer.owner_node = dir_insert(
        sandbox,
        keylet::owner_dir(&offer.account).key,
        &DirectoryKind::Owner(offer.account),
        key,
    )?;
    let owner = offer.account;
    sandbox.insert(key, LedgerEntry::Offer(offer))?;
    adjust_owner_count(sandbox, &owner, 1)
}
