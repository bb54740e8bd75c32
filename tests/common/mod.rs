#![allow(dead_code)]

use bigdecimal::BigDecimal;

use xrpl_apply::apply::{apply_transaction, Config};
use xrpl_apply::core::keylet;
use xrpl_apply::core::types::{AccountId, Currency};
use xrpl_apply::ledger::view::LedgerView;
use xrpl_apply::ledger::InMemoryLedger;
use xrpl_apply::models::amount::{Amount, IssuedCurrencyAmount, XRPAmount};
use xrpl_apply::models::ledger::objects::AccountRoot;
use xrpl_apply::models::ledger::LedgerEntry;
use xrpl_apply::models::transactions::metadata::TransactionMetadata;
use xrpl_apply::models::transactions::{
    AnyTransaction, CommonFields, Payment, TrustSet,
};
use xrpl_apply::ter::TransactionResult;

pub const FEE: u64 = 10;

pub fn alice() -> AccountId {
    AccountId([0xA1; 20])
}

pub fn bob() -> AccountId {
    AccountId([0xB2; 20])
}

pub fn carol() -> AccountId {
    AccountId([0xC3; 20])
}

pub fn issuer() -> AccountId {
    AccountId([0x1E; 20])
}

pub fn usd() -> Currency {
    Currency::standard("USD").unwrap()
}

pub fn usd_amount(value: i64) -> Amount {
    Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
        usd(),
        issuer(),
        BigDecimal::from(value),
    ))
}

pub fn drops(value: u64) -> Amount {
    Amount::XRPAmount(XRPAmount(value))
}

pub struct TestEnv {
    pub ledger: InMemoryLedger,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let config = Config {
            ledger_sequence: 7,
            parent_close_time: 1_000_000,
            ..Default::default()
        };
        TestEnv {
            ledger: InMemoryLedger::new(),
            config,
        }
    }

    pub fn fund(&mut self, account: AccountId, balance: u64) {
        let root = AccountRoot {
            account,
            balance: XRPAmount(balance),
            sequence: 1,
            ..Default::default()
        };
        self.ledger
            .insert(keylet::account(&account).key, LedgerEntry::AccountRoot(root))
            .unwrap();
    }

    pub fn root(&self, account: AccountId) -> AccountRoot {
        self.ledger
            .read(&keylet::account(&account).key)
            .unwrap()
            .into_account_root()
            .unwrap()
    }

    pub fn balance(&self, account: AccountId) -> u64 {
        self.root(account).balance.0
    }

    pub fn owner_count(&self, account: AccountId) -> u32 {
        self.root(account).owner_count
    }

    pub fn sequence(&self, account: AccountId) -> u32 {
        self.root(account).sequence
    }

    pub fn common(&self, account: AccountId) -> CommonFields {
        CommonFields {
            account,
            fee: Some(XRPAmount(FEE)),
            sequence: Some(self.sequence(account)),
            ..Default::default()
        }
    }

    pub fn submit(&mut self, tx: AnyTransaction) -> (TransactionResult, TransactionMetadata) {
        apply_transaction(&mut self.ledger, &tx, &self.config)
    }

    pub fn submit_ok(&mut self, tx: AnyTransaction) -> TransactionMetadata {
        let (result, metadata) = self.submit(tx);
        assert_eq!(result, TransactionResult::TesSuccess, "{result:?}");
        metadata
    }

    /// Open a trust line from `holder` toward the canonical issuer.
    pub fn trust(&mut self, holder: AccountId, limit: i64) {
        let tx = AnyTransaction::TrustSet(TrustSet {
            common_fields: self.common(holder),
            limit_amount: IssuedCurrencyAmount::new(usd(), issuer(), BigDecimal::from(limit)),
            ..Default::default()
        });
        self.submit_ok(tx);
    }

    /// Issue `value` USD from the issuer to `holder` over their line.
    pub fn issue_usd(&mut self, holder: AccountId, value: i64) {
        let tx = AnyTransaction::Payment(Payment {
            common_fields: self.common(issuer()),
            amount: usd_amount(value),
            destination: holder,
            ..Default::default()
        });
        self.submit_ok(tx);
    }

    /// The USD line balance from `holder`'s perspective.
    pub fn usd_balance(&self, holder: AccountId) -> BigDecimal {
        let key = keylet::line(&holder, &issuer(), &usd()).key;
        match self.ledger.read(&key) {
            Ok(entry) => entry
                .into_ripple_state()
                .map(|state| state.balance_for(&holder).value)
                .unwrap_or_else(|| BigDecimal::from(0)),
            Err(_) => BigDecimal::from(0),
        }
    }

    pub fn line_exists(&self, holder: AccountId) -> bool {
        self.ledger
            .exists(&keylet::line(&holder, &issuer(), &usd()).key)
    }

    /// Total native value visible to the conservation invariant.
    pub fn total_drops(&self) -> u64 {
        let mut total = self.ledger.drops_destroyed();
        self.ledger.for_each(&mut |_, entry| {
            if let Some(root) = entry.as_account_root() {
                total += root.balance.0;
            }
            if let Some(channel) = entry.as_pay_channel() {
                total += channel.remaining().0;
            }
        });
        total
    }
}
