//! Checks, payment channels, preauthorization, signer lists, and account
//! deletion, end to end.

mod common;

use bigdecimal::BigDecimal;

use common::*;
use xrpl_apply::core::keylet;
use xrpl_apply::ledger::view::LedgerView;
use xrpl_apply::models::amount::XRPAmount;
use xrpl_apply::models::ledger::objects::AccountRootFlag;
use xrpl_apply::models::transactions::{
    AccountDelete, AccountSet, AccountSetFlag, AnyTransaction, CheckCancel, CheckCash,
    CheckCreate, DepositPreauth, Payment, PaymentChannelClaim, PaymentChannelClaimFlag,
    PaymentChannelCreate, SetRegularKey, SignerEntry, SignerListSet,
};
use xrpl_apply::ter::TransactionResult;

#[test]
fn check_create_cash_moves_funds() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);

    let check_sequence = env.sequence(alice());
    env.submit_ok(AnyTransaction::CheckCreate(CheckCreate {
        common_fields: env.common(alice()),
        destination: bob(),
        send_max: drops(5_000_000),
        ..Default::default()
    }));
    assert_eq!(env.owner_count(alice()), 1);
    let check_key = keylet::check(&alice(), check_sequence).key;
    assert!(env.ledger.exists(&check_key));

    let cash = CheckCash {
        common_fields: env.common(bob()),
        check_id: check_key,
        amount: Some(drops(5_000_000)),
        ..Default::default()
    };
    env.submit_ok(AnyTransaction::CheckCash(cash));

    assert_eq!(env.balance(bob()), 55_000_000 - FEE);
    assert!(!env.ledger.exists(&check_key));
    assert_eq!(env.owner_count(alice()), 0);
}

#[test]
fn check_cancel_by_stranger_needs_expiry() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    env.fund(carol(), 50_000_000);

    let check_sequence = env.sequence(alice());
    env.submit_ok(AnyTransaction::CheckCreate(CheckCreate {
        common_fields: env.common(alice()),
        destination: bob(),
        send_max: drops(5_000_000),
        expiration: Some(env.config.parent_close_time + 100),
        ..Default::default()
    }));
    let check_key = keylet::check(&alice(), check_sequence).key;

    // A third party cannot cancel a live check.
    let (result, _) = env.submit(AnyTransaction::CheckCancel(CheckCancel {
        common_fields: env.common(carol()),
        check_id: check_key,
    }));
    assert_eq!(result, TransactionResult::TecNoPermission);

    // The destination can.
    env.submit_ok(AnyTransaction::CheckCancel(CheckCancel {
        common_fields: env.common(bob()),
        check_id: check_key,
    }));
    assert!(!env.ledger.exists(&check_key));
}

#[test]
fn payment_channel_claim_and_close() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    let before = env.total_drops();

    let channel_sequence = env.sequence(alice());
    env.submit_ok(AnyTransaction::PaymentChannelCreate(PaymentChannelCreate {
        common_fields: env.common(alice()),
        amount: XRPAmount(10_000_000),
        destination: bob(),
        settle_delay: 3600,
        public_key: "ED0000000000000000000000000000000000000000000000000000000000000000"
            .into(),
        ..Default::default()
    }));
    let channel_key = keylet::pay_channel(&alice(), &bob(), channel_sequence).key;
    assert!(env.ledger.exists(&channel_key));
    assert_eq!(env.owner_count(alice()), 1);

    // The destination claims part of the escrow.
    let claim = PaymentChannelClaim {
        common_fields: env.common(bob()),
        channel: channel_key,
        balance: Some(XRPAmount(4_000_000)),
        ..Default::default()
    };
    env.submit_ok(AnyTransaction::PaymentChannelClaim(claim));
    assert_eq!(env.balance(bob()), 54_000_000 - FEE);

    // Closing from the destination returns the remainder to alice.
    let mut close = PaymentChannelClaim {
        common_fields: env.common(bob()),
        channel: channel_key,
        ..Default::default()
    };
    close.common_fields.flags = PaymentChannelClaimFlag::TfClose as u32;
    env.submit_ok(AnyTransaction::PaymentChannelClaim(close));

    assert!(!env.ledger.exists(&channel_key));
    assert_eq!(env.owner_count(alice()), 0);
    assert_eq!(env.balance(alice()), 46_000_000 - FEE);
    assert_eq!(env.total_drops(), before);
}

#[test]
fn deposit_auth_blocks_until_preauthorized() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);

    let set = AccountSet {
        common_fields: env.common(bob()),
        set_flag: Some(AccountSetFlag::AsfDepositAuth as u32),
        ..Default::default()
    };
    env.submit_ok(AnyTransaction::AccountSet(set));
    assert!(env.root(bob()).has_flag(AccountRootFlag::LsfDepositAuth));

    let blocked = AnyTransaction::Payment(Payment {
        common_fields: env.common(alice()),
        amount: drops(20_000_000),
        destination: bob(),
        ..Default::default()
    });
    let (result, _) = env.submit(blocked);
    assert_eq!(result, TransactionResult::TecNoPermission);

    let preauth = DepositPreauth {
        common_fields: env.common(bob()),
        authorize: Some(alice()),
        ..Default::default()
    };
    env.submit_ok(AnyTransaction::DepositPreauth(preauth));

    env.submit_ok(AnyTransaction::Payment(Payment {
        common_fields: env.common(alice()),
        amount: drops(20_000_000),
        destination: bob(),
        ..Default::default()
    }));
    assert_eq!(env.balance(bob()), 70_000_000 - 2 * FEE);
}

#[test]
fn signer_list_lifecycle() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);

    env.submit_ok(AnyTransaction::SignerListSet(SignerListSet {
        common_fields: env.common(alice()),
        signer_quorum: 3,
        signer_entries: Some(vec![
            SignerEntry {
                account: bob(),
                signer_weight: 2,
            },
            SignerEntry {
                account: carol(),
                signer_weight: 2,
            },
        ]),
    }));
    assert_eq!(env.owner_count(alice()), 1);
    assert!(env.ledger.exists(&keylet::signer_list(&alice()).key));

    // With a signer list in place the master key may be disabled.
    env.submit_ok(AnyTransaction::AccountSet(AccountSet {
        common_fields: env.common(alice()),
        set_flag: Some(AccountSetFlag::AsfDisableMaster as u32),
        ..Default::default()
    }));

    // Quorum zero deletes the list.
    env.submit_ok(AnyTransaction::SignerListSet(SignerListSet {
        common_fields: env.common(alice()),
        signer_quorum: 0,
        signer_entries: None,
    }));
    assert_eq!(env.owner_count(alice()), 0);
    assert!(!env.ledger.exists(&keylet::signer_list(&alice()).key));
}

#[test]
fn disable_master_without_alternative_fails() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    let (result, _) = env.submit(AnyTransaction::AccountSet(AccountSet {
        common_fields: env.common(alice()),
        set_flag: Some(AccountSetFlag::AsfDisableMaster as u32),
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecNoAlternativeKey);
}

#[test]
fn regular_key_set_and_clear() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.submit_ok(AnyTransaction::SetRegularKey(SetRegularKey {
        common_fields: env.common(alice()),
        regular_key: Some(bob()),
    }));
    assert_eq!(env.root(alice()).regular_key, Some(bob()));
    env.submit_ok(AnyTransaction::SetRegularKey(SetRegularKey {
        common_fields: env.common(alice()),
        regular_key: None,
    }));
    assert_eq!(env.root(alice()).regular_key, None);
}

#[test]
fn account_delete_sweeps_balance() {
    let mut env = TestEnv::new();
    env.config.ledger_sequence = 1_000;
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    let before = env.total_drops();

    let metadata = env.submit_ok(AnyTransaction::AccountDelete(AccountDelete {
        common_fields: env.common(alice()),
        destination: bob(),
        ..Default::default()
    }));

    assert!(!env.ledger.exists(&keylet::account(&alice()).key));
    assert_eq!(env.balance(bob()), 100_000_000 - FEE);
    assert!(metadata
        .affected_nodes
        .iter()
        .any(|node| node.is_deleted() && node.node().ledger_entry_type == "AccountRoot"));
    // The fee was destroyed, everything else moved.
    assert_eq!(env.total_drops(), before);
}

#[test]
fn account_delete_too_soon() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    // ledger_sequence 7 is far below sequence + 256.
    let (result, _) = env.submit(AnyTransaction::AccountDelete(AccountDelete {
        common_fields: env.common(alice()),
        destination: bob(),
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecTooSoon);
    assert!(env.ledger.exists(&keylet::account(&alice()).key));
}

#[test]
fn account_delete_with_obligations_fails() {
    let mut env = TestEnv::new();
    env.config.ledger_sequence = 1_000;
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    env.fund(issuer(), 50_000_000);
    env.trust(alice(), 1_000);

    let (result, _) = env.submit(AnyTransaction::AccountDelete(AccountDelete {
        common_fields: env.common(alice()),
        destination: bob(),
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecHasObligations);
}

#[test]
fn fee_claimed_on_tec_keeps_sequence() {
    let mut env = TestEnv::new();
    env.fund(alice(), 50_000_000);
    env.fund(bob(), 50_000_000);
    let sequence_before = env.sequence(alice());
    let balance_before = env.balance(alice());

    // Unfunded: more than alice can spend above her reserve.
    let (result, metadata) = env.submit(AnyTransaction::Payment(Payment {
        common_fields: env.common(alice()),
        amount: drops(45_000_000),
        destination: bob(),
        ..Default::default()
    }));
    assert_eq!(result, TransactionResult::TecUnfundedPayment);
    assert_eq!(env.sequence(alice()), sequence_before + 1);
    assert_eq!(env.balance(alice()), balance_before - FEE);
    // Only the fee claim shows in the metadata.
    assert!(metadata.affected_nodes.iter().all(|node| node.is_modified()));
    let usd = env.usd_balance(bob());
    assert_eq!(usd, BigDecimal::from(0));
}
