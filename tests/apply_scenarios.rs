//! End-to-end applications against an in-memory ledger.

mod common;

use bigdecimal::BigDecimal;

use common::*;
use xrpl_apply::apply::Feature;
use xrpl_apply::core::keylet;
use xrpl_apply::ledger::view::LedgerView;
use xrpl_apply::models::amount::IssuedCurrencyAmount;
use xrpl_apply::models::transactions::{
    AnyTransaction, NFTokenMint, OfferCreate, OfferCreateFlag, Payment, PaymentFlag,
    TicketCreate, TrustSet,
};
use xrpl_apply::ter::TransactionResult;

#[test]
fn xrp_payment_creates_destination_account() {
    let mut env = TestEnv::new();
    env.fund(alice(), 100_000_000);
    let before = env.total_drops();

    let metadata = env.submit_ok(AnyTransaction::Payment(Payment {
        common_fields: env.common(alice()),
        amount: drops(20_000_000),
        destination: bob(),
        ..Default::default()
    }));

    assert_eq!(env.balance(alice()), 79_999_990);
    assert_eq!(env.balance(bob()), 20_000_000);
    let bob_root = env.root(bob());
    assert_eq!(bob_root.sequence, env.config.ledger_sequence);
    assert_eq!(bob_root.owner_count, 0);

    let created: Vec<_> = metadata
        .affected_nodes
        .iter()
        .filter(|node| node.is_created())
        .collect();
    let modified: Vec<_> = metadata
        .affected_nodes
        .iter()
        .filter(|node| node.is_modified())
        .collect();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].node().ledger_entry_type, "AccountRoot");
    assert_eq!(modified.len(), 1);
    assert_eq!(modified[0].node().ledger_entry_type, "AccountRoot");

    // Drops are conserved modulo the destroyed fee.
    assert_eq!(env.total_drops(), before);
}

#[test]
fn iou_payment_direct_from_issuer() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 1_000);

    let metadata = env.submit_ok(AnyTransaction::Payment(Payment {
        common_fields: env.common(issuer()),
        amount: usd_amount(100),
        destination: alice(),
        ..Default::default()
    }));

    assert_eq!(env.usd_balance(alice()), BigDecimal::from(100));
    let line_node = metadata
        .affected_nodes
        .iter()
        .find(|node| node.node().ledger_entry_type == "RippleState")
        .expect("trust line modified");
    assert!(line_node.is_modified());
    let previous = line_node.node().previous_fields.as_ref().unwrap();
    assert_eq!(previous["Balance"]["value"], "0");
}

#[test]
fn offer_crossing_consumes_maker() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(carol(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(carol(), 1_000);
    env.issue_usd(carol(), 100);
    env.trust(alice(), 1_000);

    // Maker: carol sells 100 USD for 10 XRP.
    let maker_sequence = env.sequence(carol());
    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(carol()),
        taker_pays: drops(10_000_000),
        taker_gets: usd_amount(100),
        ..Default::default()
    }));
    let maker_key = keylet::offer(&carol(), maker_sequence).key;
    assert!(env.ledger.exists(&maker_key));

    let carol_before = env.balance(carol());
    let alice_offers_before = env.owner_count(alice());

    // Taker: alice buys 100 USD with 10 XRP; the books cross in full.
    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: usd_amount(100),
        taker_gets: drops(10_000_000),
        ..Default::default()
    }));

    assert_eq!(env.usd_balance(alice()), BigDecimal::from(100));
    assert_eq!(env.balance(carol()), carol_before + 10_000_000);
    assert!(!env.ledger.exists(&maker_key));
    // Nothing placed for alice, so her owned objects are unchanged.
    assert_eq!(env.owner_count(alice()), alice_offers_before);
    assert!(!env
        .ledger
        .exists(&keylet::offer(&alice(), env.sequence(alice()) - 1).key));
}

#[test]
fn partial_payment_reports_delivered_amount() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 1_000);
    env.trust(bob(), 1_000);
    env.issue_usd(alice(), 60);

    let mut tx = Payment {
        common_fields: env.common(alice()),
        amount: usd_amount(100),
        destination: bob(),
        send_max: Some(usd_amount(110)),
        deliver_min: Some(usd_amount(50)),
        ..Default::default()
    };
    tx.common_fields.flags = PaymentFlag::TfPartialPayment as u32;
    let metadata = env.submit_ok(AnyTransaction::Payment(tx));

    assert_eq!(env.usd_balance(bob()), BigDecimal::from(60));
    assert_eq!(env.usd_balance(alice()), BigDecimal::from(0));
    assert_eq!(metadata.delivered_amount, Some(usd_amount(60)));
}

#[test]
fn partial_payment_below_deliver_min_fails() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 1_000);
    env.trust(bob(), 1_000);
    env.issue_usd(alice(), 40);

    let mut tx = Payment {
        common_fields: env.common(alice()),
        amount: usd_amount(100),
        destination: bob(),
        send_max: Some(usd_amount(110)),
        deliver_min: Some(usd_amount(50)),
        ..Default::default()
    };
    tx.common_fields.flags = PaymentFlag::TfPartialPayment as u32;
    let (result, _) = env.submit(AnyTransaction::Payment(tx));
    assert_eq!(result, TransactionResult::TecPathPartial);
    // The claimed-cost path keeps the fee but not the transfer.
    assert_eq!(env.usd_balance(bob()), BigDecimal::from(0));
    assert_eq!(env.usd_balance(alice()), BigDecimal::from(40));
}

#[test]
fn trust_set_collapse_deletes_line() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 500);
    assert_eq!(env.owner_count(alice()), 1);
    assert!(env.line_exists(alice()));

    let metadata = env.submit_ok(AnyTransaction::TrustSet(TrustSet {
        common_fields: env.common(alice()),
        limit_amount: IssuedCurrencyAmount::new(usd(), issuer(), BigDecimal::from(0)),
        ..Default::default()
    }));

    assert!(!env.line_exists(alice()));
    assert_eq!(env.owner_count(alice()), 0);
    // The line itself plus the emptied owner directories go away.
    let deleted_lines: Vec<_> = metadata
        .affected_nodes
        .iter()
        .filter(|node| node.is_deleted() && node.node().ledger_entry_type == "RippleState")
        .collect();
    assert_eq!(deleted_lines.len(), 1);
}

#[test]
fn nftoken_page_split_on_thirty_third_token() {
    let mut env = TestEnv::new();
    env.fund(alice(), 100_000_000);

    for _ in 0..32 {
        env.submit_ok(AnyTransaction::NFTokenMint(NFTokenMint {
            common_fields: env.common(alice()),
            nftoken_taxon: 7,
            ..Default::default()
        }));
    }
    assert_eq!(env.owner_count(alice()), 1);
    let count_before = env.owner_count(alice());

    env.submit_ok(AnyTransaction::NFTokenMint(NFTokenMint {
        common_fields: env.common(alice()),
        nftoken_taxon: 7,
        ..Default::default()
    }));

    assert_eq!(env.owner_count(alice()), count_before + 1);

    // The high page sits at the owner's fixed maximum key; the low page
    // links up to it and holds the smaller token ids.
    let max_key = keylet::nftoken_page_max(&alice()).key;
    let high_page = env
        .ledger
        .read(&max_key)
        .unwrap()
        .into_nftoken_page()
        .unwrap();
    let low_key = high_page.previous_page_min.expect("split page linked");
    let low_page = env
        .ledger
        .read(&low_key)
        .unwrap()
        .into_nftoken_page()
        .unwrap();
    assert_eq!(low_page.next_page_min, Some(max_key));
    assert_eq!(
        low_page.nftokens.len() + high_page.nftokens.len(),
        33
    );

    let mut all: Vec<_> = low_page
        .nftokens
        .iter()
        .chain(high_page.nftokens.iter())
        .map(|token| token.nftoken_id)
        .collect();
    let mut sorted = all.clone();
    sorted.sort();
    assert_eq!(all, sorted);
    assert!(low_page.nftokens.last().unwrap().nftoken_id
        < high_page.nftokens.first().unwrap().nftoken_id);
    all.dedup();
    assert_eq!(all.len(), 33);
}

#[test]
fn reserve_boundary_for_third_owned_object() {
    let mut env = TestEnv::new();
    // The first two objects are free; the third must clear the floor at
    // three owned objects, after the three creation fees are burned.
    let needed = env.config.reserve(3);
    env.fund(alice(), needed + 3 * FEE);

    for _ in 0..2 {
        env.submit_ok(AnyTransaction::TicketCreate(TicketCreate {
            common_fields: env.common(alice()),
            ticket_count: 1,
            ..Default::default()
        }));
    }
    // At exactly the required balance the third object fits.
    assert_eq!(env.balance(alice()), needed + FEE);
    env.submit_ok(AnyTransaction::TicketCreate(TicketCreate {
        common_fields: env.common(alice()),
        ticket_count: 1,
        ..Default::default()
    }));
    assert_eq!(env.owner_count(alice()), 3);
}

#[test]
fn reserve_boundary_one_drop_short_fails() {
    let mut env = TestEnv::new();
    let needed = env.config.reserve(3);
    env.fund(alice(), needed + 3 * FEE - 1);

    for _ in 0..2 {
        env.submit_ok(AnyTransaction::TicketCreate(TicketCreate {
            common_fields: env.common(alice()),
            ticket_count: 1,
            ..Default::default()
        }));
    }
    let (result, _) = env.submit(AnyTransaction::TicketCreate(TicketCreate {
        common_fields: env.common(alice()),
        ticket_count: 1,
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecInsufficientReserve);
    assert_eq!(env.owner_count(alice()), 2);
}

#[test]
fn fill_or_kill_one_hair_short_is_killed() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(carol(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(carol(), 1_000);
    env.issue_usd(carol(), 99);
    env.trust(alice(), 1_000);

    // The maker can only cover 99 of the 100 USD asked for.
    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(carol()),
        taker_pays: drops(10_000_000),
        taker_gets: usd_amount(100),
        ..Default::default()
    }));

    let mut fok = OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: usd_amount(100),
        taker_gets: drops(10_000_000),
        ..Default::default()
    };
    fok.common_fields.flags = OfferCreateFlag::TfFillOrKill as u32;
    let (result, _) = env.submit(AnyTransaction::OfferCreate(fok));
    assert_eq!(result, TransactionResult::TecKilled);
    assert_eq!(env.usd_balance(alice()), BigDecimal::from(0));
}

#[test]
fn fill_or_kill_exact_match_succeeds() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(carol(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(carol(), 1_000);
    env.issue_usd(carol(), 100);
    env.trust(alice(), 1_000);

    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(carol()),
        taker_pays: drops(10_000_000),
        taker_gets: usd_amount(100),
        ..Default::default()
    }));

    let mut fok = OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: usd_amount(100),
        taker_gets: drops(10_000_000),
        ..Default::default()
    };
    fok.common_fields.flags = OfferCreateFlag::TfFillOrKill as u32;
    env.submit_ok(AnyTransaction::OfferCreate(fok));
    assert_eq!(env.usd_balance(alice()), BigDecimal::from(100));
}

#[test]
fn offer_expiration_boundary() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 1_000);
    env.issue_usd(alice(), 100);

    // Expiring exactly at the parent close time is already expired.
    let (result, _) = env.submit(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: drops(1_000_000),
        taker_gets: usd_amount(10),
        expiration: Some(env.config.parent_close_time),
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecExpired);

    // One second later is a live offer.
    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: drops(1_000_000),
        taker_gets: usd_amount(10),
        expiration: Some(env.config.parent_close_time + 1),
        ..Default::default()
    }));
    assert_eq!(env.owner_count(alice()), 2);
}

#[test]
fn expired_offer_without_amendment_is_charged_noop() {
    let mut env = TestEnv::new();
    env.config.rules = env.config.rules.clone().without(Feature::DepositPreauth);
    env.fund(alice(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 1_000);
    env.issue_usd(alice(), 100);
    let balance_before = env.balance(alice());

    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: drops(1_000_000),
        taker_gets: usd_amount(10),
        expiration: Some(env.config.parent_close_time),
        ..Default::default()
    }));
    assert_eq!(env.balance(alice()), balance_before - FEE);
    assert_eq!(env.owner_count(alice()), 1);
}

#[test]
fn xrp_conservation_across_a_mixed_batch() {
    let mut env = TestEnv::new();
    env.fund(alice(), 100_000_000);
    env.fund(carol(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    let before = env.total_drops();

    env.submit_ok(AnyTransaction::Payment(Payment {
        common_fields: env.common(alice()),
        amount: drops(20_000_000),
        destination: bob(),
        ..Default::default()
    }));
    env.trust(carol(), 1_000);
    env.issue_usd(carol(), 100);
    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(carol()),
        taker_pays: drops(10_000_000),
        taker_gets: usd_amount(100),
        ..Default::default()
    }));
    env.trust(alice(), 1_000);
    env.submit_ok(AnyTransaction::OfferCreate(OfferCreate {
        common_fields: env.common(alice()),
        taker_pays: usd_amount(100),
        taker_gets: drops(10_000_000),
        ..Default::default()
    }));

    assert_eq!(env.total_drops(), before);
}

#[test]
fn sandbox_commit_reapply_is_noop() {
    // Applying the same transaction twice fails the second time on the
    // sequence gate, leaving state untouched.
    let mut env = TestEnv::new();
    env.fund(alice(), 100_000_000);
    let tx = AnyTransaction::Payment(Payment {
        common_fields: env.common(alice()),
        amount: drops(20_000_000),
        destination: bob(),
        ..Default::default()
    });
    env.submit_ok(tx.clone());
    let balance_after = env.balance(alice());
    let (result, _) = env.submit(tx);
    assert_eq!(result, TransactionResult::TefPastSeq);
    assert_eq!(env.balance(alice()), balance_after);
}
