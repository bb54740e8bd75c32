//! NFToken lifecycle: mint, trade, broker, burn.

mod common;

use common::*;
use xrpl_apply::apply::nftoken_pages;
use xrpl_apply::core::keylet;
use xrpl_apply::core::types::Hash256;
use xrpl_apply::ledger::view::LedgerView;
use xrpl_apply::ledger::PaymentSandbox;
use xrpl_apply::models::transactions::{
    AnyTransaction, NFTokenAcceptOffer, NFTokenBurn, NFTokenCancelOffer, NFTokenCreateOffer,
    NFTokenCreateOfferFlag, NFTokenMint, NFTokenMintFlag,
};
use xrpl_apply::ter::TransactionResult;

fn first_token(env: &TestEnv, owner: xrpl_apply::core::types::AccountId) -> Hash256 {
    let max_key = keylet::nftoken_page_max(&owner).key;
    env.ledger
        .read(&max_key)
        .unwrap()
        .into_nftoken_page()
        .unwrap()
        .nftokens[0]
        .nftoken_id
}

fn mint_transferable(env: &mut TestEnv, minter: xrpl_apply::core::types::AccountId) -> Hash256 {
    let mut mint = NFTokenMint {
        common_fields: env.common(minter),
        nftoken_taxon: 1,
        ..Default::default()
    };
    mint.common_fields.flags = NFTokenMintFlag::TfTransferable as u32;
    env.submit_ok(AnyTransaction::NFTokenMint(mint));
    first_token(env, minter)
}

#[test]
fn mint_and_burn_roundtrip() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);

    let token = mint_transferable(&mut env, alice());
    assert_eq!(env.owner_count(alice()), 1);

    env.submit_ok(AnyTransaction::NFTokenBurn(NFTokenBurn {
        common_fields: env.common(alice()),
        nftoken_id: token,
        ..Default::default()
    }));
    // The only page collapsed with its last token.
    assert_eq!(env.owner_count(alice()), 0);
    assert_eq!(env.root(alice()).burned_nftokens, Some(1));
}

#[test]
fn sell_offer_accepted_moves_token_and_price() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);

    let token = mint_transferable(&mut env, alice());

    let sell_sequence = env.sequence(alice());
    let mut sell = NFTokenCreateOffer {
        common_fields: env.common(alice()),
        nftoken_id: token,
        amount: drops(5_000_000),
        ..Default::default()
    };
    sell.common_fields.flags = NFTokenCreateOfferFlag::TfSellNFToken as u32;
    env.submit_ok(AnyTransaction::NFTokenCreateOffer(sell));
    let offer_key = keylet::nftoken_offer(&alice(), sell_sequence).key;
    assert!(env.ledger.exists(&offer_key));

    env.submit_ok(AnyTransaction::NFTokenAcceptOffer(NFTokenAcceptOffer {
        common_fields: env.common(bob()),
        nftoken_sell_offer: Some(offer_key),
        ..Default::default()
    }));

    // Token moved, price paid, offer gone.
    let sandbox_view = PaymentSandbox::root(&env.ledger, Hash256::ZERO, 1);
    assert!(nftoken_pages::find_token(&sandbox_view, &bob(), &token).is_some());
    assert!(nftoken_pages::find_token(&sandbox_view, &alice(), &token).is_none());
    assert!(!env.ledger.exists(&offer_key));
    // Alice paid two fees (mint, offer) and received the 5 XRP price.
    assert_eq!(env.balance(alice()), 55_000_000 - 2 * FEE);
}

#[test]
fn cannot_accept_own_offer() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    let token = mint_transferable(&mut env, alice());

    let sell_sequence = env.sequence(alice());
    let mut sell = NFTokenCreateOffer {
        common_fields: env.common(alice()),
        nftoken_id: token,
        amount: drops(5_000_000),
        ..Default::default()
    };
    sell.common_fields.flags = NFTokenCreateOfferFlag::TfSellNFToken as u32;
    env.submit_ok(AnyTransaction::NFTokenCreateOffer(sell));

    let (result, _) = env.submit(AnyTransaction::NFTokenAcceptOffer(NFTokenAcceptOffer {
        common_fields: env.common(alice()),
        nftoken_sell_offer: Some(keylet::nftoken_offer(&alice(), sell_sequence).key),
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecCantAcceptOwnNFTokenOffer);
}

#[test]
fn cancel_offer_releases_reserve() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    let token = mint_transferable(&mut env, alice());

    let sell_sequence = env.sequence(alice());
    let mut sell = NFTokenCreateOffer {
        common_fields: env.common(alice()),
        nftoken_id: token,
        amount: drops(5_000_000),
        ..Default::default()
    };
    sell.common_fields.flags = NFTokenCreateOfferFlag::TfSellNFToken as u32;
    env.submit_ok(AnyTransaction::NFTokenCreateOffer(sell));
    assert_eq!(env.owner_count(alice()), 2);

    env.submit_ok(AnyTransaction::NFTokenCancelOffer(NFTokenCancelOffer {
        common_fields: env.common(alice()),
        nftoken_offers: vec![keylet::nftoken_offer(&alice(), sell_sequence).key],
    }));
    assert_eq!(env.owner_count(alice()), 1);
}

#[test]
fn brokered_accept_pays_broker_and_seller() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    env.fund(carol(), 50_000_000);

    let token = mint_transferable(&mut env, alice());

    let sell_sequence = env.sequence(alice());
    let mut sell = NFTokenCreateOffer {
        common_fields: env.common(alice()),
        nftoken_id: token,
        amount: drops(5_000_000),
        ..Default::default()
    };
    sell.common_fields.flags = NFTokenCreateOfferFlag::TfSellNFToken as u32;
    env.submit_ok(AnyTransaction::NFTokenCreateOffer(sell));

    let buy_sequence = env.sequence(bob());
    env.submit_ok(AnyTransaction::NFTokenCreateOffer(NFTokenCreateOffer {
        common_fields: env.common(bob()),
        nftoken_id: token,
        amount: drops(6_000_000),
        owner: Some(alice()),
        ..Default::default()
    }));

    let alice_before = env.balance(alice());
    let bob_before = env.balance(bob());
    let carol_before = env.balance(carol());

    env.submit_ok(AnyTransaction::NFTokenAcceptOffer(NFTokenAcceptOffer {
        common_fields: env.common(carol()),
        nftoken_sell_offer: Some(keylet::nftoken_offer(&alice(), sell_sequence).key),
        nftoken_buy_offer: Some(keylet::nftoken_offer(&bob(), buy_sequence).key),
        nftoken_broker_fee: Some(drops(500_000)),
        ..Default::default()
    }));

    // Buyer pays the full bid; the broker keeps the fee, the seller the
    // rest.
    assert_eq!(env.balance(bob()), bob_before - 6_000_000);
    assert_eq!(env.balance(carol()), carol_before + 500_000 - FEE);
    assert_eq!(env.balance(alice()), alice_before + 5_500_000);

    let sandbox_view = PaymentSandbox::root(&env.ledger, Hash256::ZERO, 1);
    assert!(nftoken_pages::find_token(&sandbox_view, &bob(), &token).is_some());
}
