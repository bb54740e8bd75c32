//! Moving value between accounts: native balance shuffles, trust-line
//! credit, line creation and collapse, freezes and funding queries.

use bigdecimal::{BigDecimal, Signed, Zero};

use crate::apply::config::Config;
use crate::constants::QUALITY_ONE;
use crate::core::keylet;
use crate::core::types::{AccountId, Currency, Hash256, Issue};
use crate::ledger::directory::{dir_insert, dir_remove, DirectoryKind};
use crate::models::amount::{Amount, IssuedCurrencyAmount, XRPAmount};
use crate::models::ledger::objects::{
    AccountRoot, RippleState, RippleStateFlag,
};
use crate::models::ledger::LedgerEntry;

use super::sandbox::PaymentSandbox;
use super::view::{LedgerView, ViewError, ViewResult};

pub fn account_root(view: &dyn LedgerView, account: &AccountId) -> ViewResult<AccountRoot> {
    view.read(&keylet::account(account).key)?
        .into_account_root()
        .ok_or_else(|| ViewError::Internal(alloc::format!("{account} is not an AccountRoot")))
}

pub fn update_account_root(view: &mut dyn LedgerView, root: AccountRoot) -> ViewResult<()> {
    let key = keylet::account(&root.account).key;
    view.update(key, LedgerEntry::AccountRoot(root))
}

/// Bump or drop an account's owner count, keeping the sandbox's high-water
/// mark current so reserve checks inside flow see the peak.
pub fn adjust_owner_count(
    sandbox: &mut PaymentSandbox<'_>,
    account: &AccountId,
    delta: i32,
) -> ViewResult<()> {
    let mut root = account_root(sandbox, account)?;
    root.owner_count = if delta >= 0 {
        root.owner_count.saturating_add(delta as u32)
    } else {
        root.owner_count.saturating_sub((-delta) as u32)
    };
    let count = root.owner_count;
    update_account_root(sandbox, root)?;
    sandbox.record_owner_count(account, count);
    Ok(())
}

/// The issuer's transfer rate in parts per billion.
pub fn transfer_rate(view: &dyn LedgerView, issuer: &AccountId) -> u32 {
    account_root(view, issuer)
        .ok()
        .and_then(|root| root.transfer_rate)
        .filter(|rate| *rate >= QUALITY_ONE)
        .unwrap_or(QUALITY_ONE)
}

pub fn rate_ratio(rate: u32) -> BigDecimal {
    BigDecimal::from(rate) / BigDecimal::from(QUALITY_ONE)
}

/// Whether a transfer fee applies when `sender` moves `issue` to
/// `receiver`: the issuer charges only between two non-issuer parties.
pub fn transfer_fee_applies(issue: &Issue, sender: &AccountId, receiver: &AccountId) -> bool {
    !issue.is_xrp() && issue.issuer != *sender && issue.issuer != *receiver
}

/// Drops spendable above the reserve.
pub fn xrp_liquid(
    sandbox: &PaymentSandbox<'_>,
    account: &AccountId,
    config: &Config,
) -> ViewResult<XRPAmount> {
    let root = account_root(sandbox, account)?;
    let owner_count = sandbox.owner_count_hook(account, root.owner_count);
    let reserve = XRPAmount(config.reserve(owner_count));
    let liquid = root.balance.saturating_sub(reserve);
    let adjusted = sandbox.balance_hook(
        account,
        &AccountId::ZERO,
        &Amount::XRPAmount(liquid),
    );
    match adjusted {
        Amount::XRPAmount(drops) => Ok(drops),
        Amount::IssuedCurrencyAmount(_) => Err(ViewError::Internal(
            alloc::string::String::from("native balance hook returned an issued amount"),
        )),
    }
}

/// Move drops between two existing accounts.
pub fn send_xrp(
    sandbox: &mut PaymentSandbox<'_>,
    from: &AccountId,
    to: &AccountId,
    drops: XRPAmount,
) -> ViewResult<()> {
    if drops.is_zero() || from == to {
        return Ok(());
    }
    let mut sender = account_root(sandbox, from)?;
    let pre_balance = sender.balance;
    sender.balance = sender
        .balance
        .checked_sub(drops)
        .map_err(|_| ViewError::Internal(alloc::format!("{from} native balance underflow")))?;
    update_account_root(sandbox, sender)?;

    let mut receiver = account_root(sandbox, to)?;
    receiver.balance = receiver
        .balance
        .checked_add(drops)
        .map_err(|_| ViewError::Internal(alloc::format!("{to} native balance overflow")))?;
    update_account_root(sandbox, receiver)?;

    sandbox.credit(
        from,
        &AccountId::ZERO,
        Currency::XRP,
        drops.as_big(),
        pre_balance.as_big(),
    );
    Ok(())
}

/// True when both sides of a line are fully default: it only remains on
/// ledger while something distinguishes it.
pub fn trust_line_is_default(state: &RippleState) -> bool {
    let reserve_only = RippleStateFlag::LsfLowReserve as u32 | RippleStateFlag::LsfHighReserve as u32;
    state.balance.is_zero()
        && state.low_limit.is_zero()
        && state.high_limit.is_zero()
        && state.flags & !reserve_only == 0
        && state.low_quality_in.is_none()
        && state.low_quality_out.is_none()
        && state.high_quality_in.is_none()
        && state.high_quality_out.is_none()
}

/// Create a trust line between `holder` and `counterparty`. The holder's
/// side carries the requested limit and pays reserve; a nonzero starting
/// balance is held from the holder's perspective.
#[allow(clippy::too_many_arguments)]
pub fn trust_create(
    sandbox: &mut PaymentSandbox<'_>,
    holder: &AccountId,
    counterparty: &AccountId,
    currency: Currency,
    holder_limit: BigDecimal,
    holder_balance: BigDecimal,
    holder_quality_in: Option<u32>,
    holder_quality_out: Option<u32>,
    holder_flags: u32,
) -> ViewResult<Hash256> {
    let keylet = keylet::line(holder, counterparty, &currency);
    let (low, high) = if holder < counterparty {
        (*holder, *counterparty)
    } else {
        (*counterparty, *holder)
    };
    let holder_is_low = *holder == low;

    let balance_low_view = if holder_is_low {
        holder_balance
    } else {
        -holder_balance
    };
    let zero = BigDecimal::zero();
    let (low_limit, high_limit) = if holder_is_low {
        (holder_limit, zero)
    } else {
        (zero, holder_limit)
    };

    let mut state = RippleState {
        balance: IssuedCurrencyAmount::new(currency, AccountId::ONE, balance_low_view),
        low_limit: IssuedCurrencyAmount::new(currency, low, low_limit),
        high_limit: IssuedCurrencyAmount::new(currency, high, high_limit),
        flags: holder_flags,
        ..Default::default()
    };
    if holder_is_low {
        state.set_flag(RippleStateFlag::LsfLowReserve);
        state.low_quality_in = holder_quality_in;
        state.low_quality_out = holder_quality_out;
    } else {
        state.set_flag(RippleStateFlag::LsfHighReserve);
        state.high_quality_in = holder_quality_in;
        state.high_quality_out = holder_quality_out;
    }

    state.low_node = dir_insert(
        sandbox,
        keylet::owner_dir(&low).key,
        &DirectoryKind::Owner(low),
        keylet.key,
    )?;
    state.high_node = dir_insert(
        sandbox,
        keylet::owner_dir(&high).key,
        &DirectoryKind::Owner(high),
        keylet.key,
    )?;

    sandbox.insert(keylet.key, LedgerEntry::RippleState(state))?;
    adjust_owner_count(sandbox, holder, 1)?;
    Ok(keylet.key)
}

/// Remove a trust line from the ledger and both owner directories,
/// releasing the reserve of whichever sides held one.
pub fn trust_delete(
    sandbox: &mut PaymentSandbox<'_>,
    state: &RippleState,
    key: Hash256,
) -> ViewResult<()> {
    let low = state.low_account();
    let high = state.high_account();
    dir_remove(
        sandbox,
        keylet::owner_dir(&low).key,
        state.low_node,
        &key,
        false,
    )?;
    dir_remove(
        sandbox,
        keylet::owner_dir(&high).key,
        state.high_node,
        &key,
        false,
    )?;
    sandbox.erase(&key)?;
    if state.has_flag(RippleStateFlag::LsfLowReserve) {
        adjust_owner_count(sandbox, &low, -1)?;
    }
    if state.has_flag(RippleStateFlag::LsfHighReserve) {
        adjust_owner_count(sandbox, &high, -1)?;
    }
    Ok(())
}

/// Adjust the single trust line between `from` and `to` by `value` of
/// `currency`, creating the line when the receiver ends up with a claim on
/// the sender, and collapsing it when it returns to a default zero state.
pub fn ripple_credit(
    sandbox: &mut PaymentSandbox<'_>,
    from: &AccountId,
    to: &AccountId,
    currency: Currency,
    value: &BigDecimal,
) -> ViewResult<()> {
    if value.is_zero() || from == to {
        return Ok(());
    }
    let keylet = keylet::line(from, to, &currency);

    let pre_balance = match sandbox.peek(&keylet.key) {
        Some(entry) => {
            let state = entry
                .into_ripple_state()
                .ok_or_else(|| ViewError::Internal(alloc::format!("{} is not a trust line", keylet.key)))?;
            state.balance_for(from).value
        }
        None => BigDecimal::zero(),
    };

    match sandbox.peek(&keylet.key) {
        None => {
            // No line yet: the receiver acquires a claim on the sender.
            trust_create(
                sandbox,
                to,
                from,
                currency,
                BigDecimal::zero(),
                value.clone(),
                None,
                None,
                0,
            )?;
        }
        Some(entry) => {
            let mut state = entry
                .into_ripple_state()
                .ok_or_else(|| ViewError::Internal(alloc::format!("{} is not a trust line", keylet.key)))?;
            let from_is_low = *from == state.low_account();
            let delta = if from_is_low {
                -value.clone()
            } else {
                value.clone()
            };
            let next = state
                .balance
                .with_value(state.balance.value.clone() + delta)
                .map_err(|err| ViewError::Internal(alloc::format!("balance overflow: {err}")))?;
            state.balance = next;
            if trust_line_is_default(&state) {
                trust_delete(sandbox, &state, keylet.key)?;
            } else {
                sandbox.update(keylet.key, LedgerEntry::RippleState(state))?;
            }
        }
    }

    sandbox.credit(from, to, currency, value.clone(), pre_balance);
    Ok(())
}

/// Move `net` of an issued currency from `from` to `to`, routing through
/// the issuer. The sender bears any transfer fee: their debit is the
/// gross, the recipient's credit is the net.
pub fn transfer_iou(
    sandbox: &mut PaymentSandbox<'_>,
    from: &AccountId,
    to: &AccountId,
    net: &IssuedCurrencyAmount,
) -> ViewResult<()> {
    let issuer = net.issuer;
    if *from == issuer || *to == issuer {
        return ripple_credit(sandbox, from, to, net.currency, &net.value);
    }
    let rate = transfer_rate(sandbox, &issuer);
    let gross = if transfer_fee_applies(&net.issue(), from, to) {
        &net.value * rate_ratio(rate)
    } else {
        net.value.clone()
    };
    ripple_credit(sandbox, from, &issuer, net.currency, &gross)?;
    ripple_credit(sandbox, &issuer, to, net.currency, &net.value)
}

/// The issuer has globally frozen all of its issuances.
pub fn is_global_frozen(view: &dyn LedgerView, issuer: &AccountId) -> bool {
    use crate::models::ledger::objects::AccountRootFlag;
    account_root(view, issuer)
        .map(|root| root.has_flag(AccountRootFlag::LsfGlobalFreeze))
        .unwrap_or(false)
}

/// The issuer froze `account`'s line, or froze globally.
pub fn is_frozen(view: &dyn LedgerView, account: &AccountId, issue: &Issue) -> bool {
    if issue.is_xrp() {
        return false;
    }
    if *account == issue.issuer {
        return false;
    }
    if is_global_frozen(view, &issue.issuer) {
        return true;
    }
    match view.peek(&keylet::line(account, &issue.issuer, &issue.currency).key) {
        Some(entry) => entry
            .as_ripple_state()
            .map(|state| {
                state.side_flag(
                    &issue.issuer,
                    RippleStateFlag::LsfLowFreeze,
                    RippleStateFlag::LsfHighFreeze,
                )
            })
            .unwrap_or(false),
        None => false,
    }
}

/// Deep freeze also blocks receiving.
pub fn is_deep_frozen(view: &dyn LedgerView, account: &AccountId, issue: &Issue) -> bool {
    if issue.is_xrp() || *account == issue.issuer {
        return false;
    }
    match view.peek(&keylet::line(account, &issue.issuer, &issue.currency).key) {
        Some(entry) => entry
            .as_ripple_state()
            .map(|state| {
                state.side_flag(
                    &issue.issuer,
                    RippleStateFlag::LsfLowDeepFreeze,
                    RippleStateFlag::LsfHighDeepFreeze,
                )
            })
            .unwrap_or(false),
        None => false,
    }
}

/// The spendable balance `account` holds of `issue`, after this
/// transaction's deferred credits. Never negative.
pub fn iou_available(
    sandbox: &PaymentSandbox<'_>,
    account: &AccountId,
    issue: &Issue,
) -> BigDecimal {
    let reported = match sandbox.peek(&keylet::line(account, &issue.issuer, &issue.currency).key) {
        Some(entry) => match entry.as_ripple_state() {
            Some(state) => state.balance_for(account),
            None => return BigDecimal::zero(),
        },
        None => return BigDecimal::zero(),
    };
    let adjusted = sandbox.balance_hook(
        account,
        &issue.issuer,
        &Amount::IssuedCurrencyAmount(reported),
    );
    let value = adjusted.as_big();
    if value.is_negative() {
        BigDecimal::zero()
    } else {
        value
    }
}

/// What `account` can actually put behind `amount`: issuers are always
/// good for their own issue, native funds stop at the reserve.
pub fn funds_available(
    sandbox: &PaymentSandbox<'_>,
    account: &AccountId,
    amount: &Amount,
    config: &Config,
) -> ViewResult<Amount> {
    match amount {
        Amount::XRPAmount(_) => Ok(Amount::XRPAmount(xrp_liquid(sandbox, account, config)?)),
        Amount::IssuedCurrencyAmount(issued) => {
            if issued.issuer == *account {
                return Ok(amount.clone());
            }
            let available = iou_available(sandbox, account, &issued.issue());
            Ok(Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
                issued.currency,
                issued.issuer,
                available,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::view::InMemoryLedger;

    fn account(byte: u8) -> AccountId {
        AccountId([byte; 20])
    }

    fn seed_account(ledger: &mut InMemoryLedger, id: AccountId, drops: u64) {
        let root = AccountRoot {
            account: id,
            balance: XRPAmount(drops),
            sequence: 1,
            ..Default::default()
        };
        ledger
            .insert(keylet::account(&id).key, LedgerEntry::AccountRoot(root))
            .unwrap();
    }

    #[test]
    fn test_send_xrp_moves_balances() {
        let mut ledger = InMemoryLedger::new();
        seed_account(&mut ledger, account(1), 50_000_000);
        seed_account(&mut ledger, account(2), 10_000_000);
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        send_xrp(&mut sandbox, &account(1), &account(2), XRPAmount(5_000_000)).unwrap();
        assert_eq!(
            account_root(&sandbox, &account(1)).unwrap().balance,
            XRPAmount(45_000_000)
        );
        assert_eq!(
            account_root(&sandbox, &account(2)).unwrap().balance,
            XRPAmount(15_000_000)
        );
    }

    #[test]
    fn test_ripple_credit_creates_then_collapses_line() {
        let mut ledger = InMemoryLedger::new();
        seed_account(&mut ledger, account(1), 50_000_000);
        seed_account(&mut ledger, account(2), 50_000_000);
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let usd = Currency::standard("USD").unwrap();

        ripple_credit(&mut sandbox, &account(1), &account(2), usd, &BigDecimal::from(25)).unwrap();
        let key = keylet::line(&account(1), &account(2), &usd).key;
        let state = sandbox.read(&key).unwrap().into_ripple_state().unwrap();
        assert_eq!(state.balance_for(&account(2)).value, BigDecimal::from(25));
        assert_eq!(account_root(&sandbox, &account(2)).unwrap().owner_count, 1);

        // Paying it back erases the now-default line.
        ripple_credit(&mut sandbox, &account(2), &account(1), usd, &BigDecimal::from(25)).unwrap();
        assert!(!sandbox.exists(&key));
        assert_eq!(account_root(&sandbox, &account(2)).unwrap().owner_count, 0);
    }

    #[test]
    fn test_transfer_iou_charges_sender_gross() {
        let mut ledger = InMemoryLedger::new();
        let issuer = account(9);
        seed_account(&mut ledger, account(1), 50_000_000);
        seed_account(&mut ledger, account(2), 50_000_000);
        let mut issuer_root = AccountRoot {
            account: issuer,
            balance: XRPAmount(50_000_000),
            sequence: 1,
            transfer_rate: Some(1_200_000_000),
            ..Default::default()
        };
        issuer_root.flags = 0;
        ledger
            .insert(
                keylet::account(&issuer).key,
                LedgerEntry::AccountRoot(issuer_root),
            )
            .unwrap();
        let usd = Currency::standard("USD").unwrap();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);

        // Seed holdings: issuer owes account(1) 120 USD.
        ripple_credit(&mut sandbox, &issuer, &account(1), usd, &BigDecimal::from(120)).unwrap();

        let net = IssuedCurrencyAmount::new(usd, issuer, BigDecimal::from(100));
        transfer_iou(&mut sandbox, &account(1), &account(2), &net).unwrap();

        // Sender paid 100 * 1.2 = 120; receiver got 100.
        assert!(iou_available(&sandbox, &account(1), &net.issue()).is_zero());
        assert_eq!(
            iou_available(&sandbox, &account(2), &net.issue()),
            BigDecimal::from(100)
        );
    }

    #[test]
    fn test_xrp_liquid_respects_reserve() {
        let mut ledger = InMemoryLedger::new();
        seed_account(&mut ledger, account(1), 15_000_000);
        let sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let config = Config::default();
        assert_eq!(
            xrp_liquid(&sandbox, &account(1), &config).unwrap(),
            XRPAmount(5_000_000)
        );
    }
}
