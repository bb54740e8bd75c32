//! A stackable write-through overlay above a ledger view.
//!
//! The flow engine explores liquidity in child sandboxes and only merges a
//! layer into its parent when a strand succeeds, so speculative execution
//! never touches the backing view. Deferred credits keep one strand of a
//! multi-strand payment from spending liquidity another strand is already
//! counting on.

use alloc::collections::{BTreeMap, BTreeSet};
use core::sync::atomic::{AtomicU64, Ordering};

use bigdecimal::{BigDecimal, Zero};

use crate::core::types::{AccountId, Currency, Hash256};
use crate::models::amount::Amount;
use crate::models::ledger::LedgerEntry;

use super::view::{LedgerView, ViewError, ViewResult};

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// One-sided credit totals between a canonical account pair, plus the
/// balances observed when each side first extended credit.
#[derive(Debug, Clone, Default)]
struct CreditEntry {
    low_to_high: BigDecimal,
    high_to_low: BigDecimal,
    orig_low: Option<BigDecimal>,
    orig_high: Option<BigDecimal>,
}

/// Credits extended during flow execution, keyed by the canonical
/// (low, high, currency) triple. Native credits use the zero account as
/// the counterparty.
#[derive(Debug, Clone, Default)]
pub struct DeferredCredits {
    table: BTreeMap<(AccountId, AccountId, Currency), CreditEntry>,
}

impl DeferredCredits {
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Record that `from` paid `amount` toward `to`, observing `from`'s
    /// balance before the payment.
    fn credit(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        currency: Currency,
        amount: BigDecimal,
        pre_credit_balance: BigDecimal,
    ) {
        let (low, high) = if from < to { (*from, *to) } else { (*to, *from) };
        let entry = self.table.entry((low, high, currency)).or_default();
        if *from == low {
            entry.low_to_high += amount;
            entry.orig_low.get_or_insert(pre_credit_balance);
        } else {
            entry.high_to_low += amount;
            entry.orig_high.get_or_insert(pre_credit_balance);
        }
    }

    /// The total `account` has already paid toward `counterparty` in this
    /// layer, with the balance observed at the first payment.
    fn debits_of(
        &self,
        account: &AccountId,
        counterparty: &AccountId,
        currency: &Currency,
    ) -> Option<(BigDecimal, Option<BigDecimal>)> {
        let (low, high) = if account < counterparty {
            (*account, *counterparty)
        } else {
            (*counterparty, *account)
        };
        let entry = self.table.get(&(low, high, *currency))?;
        if *account == low {
            Some((entry.low_to_high.clone(), entry.orig_low.clone()))
        } else {
            Some((entry.high_to_low.clone(), entry.orig_high.clone()))
        }
    }

    /// Fold a child's credits in: totals accumulate, the earlier original
    /// balances win.
    fn merge(&mut self, child: DeferredCredits) {
        for (key, incoming) in child.table {
            match self.table.get_mut(&key) {
                Some(existing) => {
                    existing.low_to_high += incoming.low_to_high;
                    existing.high_to_low += incoming.high_to_low;
                    if existing.orig_low.is_none() {
                        existing.orig_low = incoming.orig_low;
                    }
                    if existing.orig_high.is_none() {
                        existing.orig_high = incoming.orig_high;
                    }
                }
                None => {
                    self.table.insert(key, incoming);
                }
            }
        }
    }
}

/// The detachable contents of one sandbox level. Taking the layer ends the
/// child's borrow of its parent so the parent can absorb it.
#[derive(Debug)]
pub struct SandboxLayer {
    parent_id: u64,
    pub(crate) inserts: BTreeMap<Hash256, LedgerEntry>,
    pub(crate) mods: BTreeMap<Hash256, LedgerEntry>,
    pub(crate) deletes: BTreeSet<Hash256>,
    pub(crate) pre_images: BTreeMap<Hash256, LedgerEntry>,
    credits: DeferredCredits,
    owner_counts: BTreeMap<AccountId, u32>,
    drops_destroyed: u64,
}

impl SandboxLayer {
    fn new(parent_id: u64) -> Self {
        SandboxLayer {
            parent_id,
            inserts: BTreeMap::new(),
            mods: BTreeMap::new(),
            deletes: BTreeSet::new(),
            pre_images: BTreeMap::new(),
            credits: DeferredCredits::default(),
            owner_counts: BTreeMap::new(),
            drops_destroyed: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.mods.is_empty()
            && self.deletes.is_empty()
            && self.credits.is_empty()
            && self.drops_destroyed == 0
    }

    /// Replay the layer onto a backing view: deletions, then insertions,
    /// then modifications. Tolerant of replays so a second application of
    /// the same layer is a no-op.
    pub fn apply_to_view(&self, view: &mut dyn LedgerView) -> ViewResult<()> {
        for key in &self.deletes {
            match view.erase(key) {
                Ok(()) | Err(ViewError::NotFound) => {}
                Err(err) => return Err(err),
            }
        }
        for (key, entry) in &self.inserts {
            if view.exists(key) {
                view.update(*key, entry.clone())?;
            } else {
                view.insert(*key, entry.clone())?;
            }
        }
        for (key, entry) in &self.mods {
            if view.exists(key) {
                view.update(*key, entry.clone())?;
            } else {
                view.insert(*key, entry.clone())?;
            }
        }
        view.adjust_drops_destroyed(self.drops_destroyed);
        Ok(())
    }

    /// Rewrite threading fields on every entry this layer writes.
    pub fn thread_all(&mut self, txn_id: Hash256, ledger_seq: u32) {
        for entry in self.inserts.values_mut().chain(self.mods.values_mut()) {
            entry.thread(txn_id, ledger_seq);
        }
    }

    pub fn drops_destroyed(&self) -> u64 {
        self.drops_destroyed
    }
}

enum SandboxBase<'a> {
    View(&'a dyn LedgerView),
    Parent(&'a PaymentSandbox<'a>),
}

/// One level of the overlay stack. The root sits on the backing view;
/// children borrow their parent for the duration of their speculation.
pub struct PaymentSandbox<'a> {
    id: u64,
    base: SandboxBase<'a>,
    layer: SandboxLayer,
    txn_id: Hash256,
    ledger_seq: u32,
}

impl<'a> PaymentSandbox<'a> {
    pub fn root(view: &'a dyn LedgerView, txn_id: Hash256, ledger_seq: u32) -> Self {
        let id = NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed);
        PaymentSandbox {
            id,
            base: SandboxBase::View(view),
            layer: SandboxLayer::new(0),
            txn_id,
            ledger_seq,
        }
    }

    /// Open a child level above this one.
    pub fn branch(&self) -> PaymentSandbox<'_> {
        let id = NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed);
        PaymentSandbox {
            id,
            base: SandboxBase::Parent(self),
            layer: SandboxLayer::new(self.id),
            txn_id: self.txn_id,
            ledger_seq: self.ledger_seq,
        }
    }

    pub fn txn_id(&self) -> Hash256 {
        self.txn_id
    }

    pub fn ledger_seq(&self) -> u32 {
        self.ledger_seq
    }

    /// Detach the written layer, ending any borrow of the parent.
    pub fn into_layer(self) -> SandboxLayer {
        self.layer
    }

    /// Merge a child layer produced by [`Self::branch`] into this level.
    /// Absorbing a layer from any other sandbox is a programming error.
    pub fn absorb(&mut self, child: SandboxLayer) -> ViewResult<()> {
        if child.parent_id != self.id {
            return Err(ViewError::Internal(alloc::format!(
                "layer committed to a sandbox that is not its parent \
                 (expected {}, got {})",
                child.parent_id,
                self.id
            )));
        }
        for key in &child.deletes {
            self.erase(key)?;
        }
        for (key, entry) in child.inserts {
            self.insert(key, entry)?;
        }
        for (key, entry) in child.mods {
            self.update(key, entry)?;
        }
        self.layer.credits.merge(child.credits);
        for (account, count) in child.owner_counts {
            self.record_owner_count(&account, count);
        }
        self.layer.drops_destroyed = self
            .layer
            .drops_destroyed
            .saturating_add(child.drops_destroyed);
        Ok(())
    }

    fn read_base(&self, key: &Hash256) -> ViewResult<LedgerEntry> {
        match &self.base {
            SandboxBase::View(view) => view.read(key),
            SandboxBase::Parent(parent) => parent.read(key),
        }
    }

    fn exists_base(&self, key: &Hash256) -> bool {
        match &self.base {
            SandboxBase::View(view) => view.exists(key),
            SandboxBase::Parent(parent) => parent.exists(key),
        }
    }

    fn parent(&self) -> Option<&PaymentSandbox<'_>> {
        match &self.base {
            SandboxBase::Parent(parent) => Some(*parent),
            SandboxBase::View(_) => None,
        }
    }

    /// Record that `from` paid `amount` toward `to` so later liquidity
    /// queries in this transaction see the balance already spoken for.
    pub fn credit(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        currency: Currency,
        amount: BigDecimal,
        pre_credit_balance: BigDecimal,
    ) {
        self.layer
            .credits
            .credit(from, to, currency, amount, pre_credit_balance);
    }

    /// The spendable balance of `account` toward `counterparty`, given the
    /// balance the state currently reports: the chain's deferred debits
    /// are subtracted and the result never exceeds any balance observed
    /// when credit was first extended. Native balances clamp at zero.
    pub fn balance_hook(
        &self,
        account: &AccountId,
        counterparty: &AccountId,
        reported: &Amount,
    ) -> Amount {
        let currency = reported.issue().currency;
        let mut accumulated = BigDecimal::zero();
        let mut last_original: Option<BigDecimal> = None;
        let mut min_seen: Option<BigDecimal> = None;

        let mut level: Option<&PaymentSandbox<'_>> = Some(self);
        while let Some(sandbox) = level {
            if let Some((debits, original)) =
                sandbox
                    .layer
                    .credits
                    .debits_of(account, counterparty, &currency)
            {
                accumulated += debits;
                if let Some(original) = original {
                    let available = &original - &accumulated;
                    if min_seen.as_ref().map_or(true, |seen| available < *seen) {
                        min_seen = Some(available);
                    }
                    last_original = Some(original);
                }
            }
            level = sandbox.parent();
        }

        let mut value = reported.as_big();
        if let Some(original) = last_original {
            let bound = original - accumulated;
            if bound < value {
                value = bound;
            }
        }
        if let Some(seen) = min_seen {
            if seen < value {
                value = seen;
            }
        }
        if reported.is_xrp() && value < BigDecimal::zero() {
            value = BigDecimal::zero();
        }
        Amount::from_big(&reported.issue(), value).unwrap_or_else(|_| reported.clone())
    }

    /// Record the owner count set for an account in this layer.
    pub fn record_owner_count(&mut self, account: &AccountId, count: u32) {
        let slot = self.layer.owner_counts.entry(*account).or_insert(count);
        if count > *slot {
            *slot = count;
        }
    }

    /// The largest owner count seen for `account` across the chain; the
    /// source's reserve during flow is measured against the high-water
    /// mark, not a transiently lower count.
    pub fn owner_count_hook(&self, account: &AccountId, current: u32) -> u32 {
        let mut best = current;
        let mut level: Option<&PaymentSandbox<'_>> = Some(self);
        while let Some(sandbox) = level {
            if let Some(count) = sandbox.layer.owner_counts.get(account) {
                if *count > best {
                    best = *count;
                }
            }
            level = sandbox.parent();
        }
        best
    }
}

impl LedgerView for PaymentSandbox<'_> {
    fn read(&self, key: &Hash256) -> ViewResult<LedgerEntry> {
        if self.layer.deletes.contains(key) {
            return Err(ViewError::NotFound);
        }
        if let Some(entry) = self.layer.inserts.get(key) {
            return Ok(entry.clone());
        }
        if let Some(entry) = self.layer.mods.get(key) {
            return Ok(entry.clone());
        }
        self.read_base(key)
    }

    fn exists(&self, key: &Hash256) -> bool {
        if self.layer.deletes.contains(key) {
            return false;
        }
        if self.layer.inserts.contains_key(key) || self.layer.mods.contains_key(key) {
            return true;
        }
        self.exists_base(key)
    }

    fn insert(&mut self, key: Hash256, entry: LedgerEntry) -> ViewResult<()> {
        if self.layer.deletes.remove(&key) {
            // Deleted then recreated within this layer: net modification;
            // the pre-image was captured at deletion time.
            self.layer.mods.insert(key, entry);
            return Ok(());
        }
        if self.exists(&key) {
            return Err(ViewError::Internal(alloc::format!(
                "insert over existing entry {key}"
            )));
        }
        self.layer.inserts.insert(key, entry);
        Ok(())
    }

    fn update(&mut self, key: Hash256, entry: LedgerEntry) -> ViewResult<()> {
        if self.layer.deletes.contains(&key) {
            return Err(ViewError::NotFound);
        }
        if let Some(slot) = self.layer.inserts.get_mut(&key) {
            *slot = entry;
            return Ok(());
        }
        if !self.layer.mods.contains_key(&key) {
            let original = self.read_base(&key)?;
            self.layer.pre_images.entry(key).or_insert(original);
        }
        self.layer.mods.insert(key, entry);
        Ok(())
    }

    fn erase(&mut self, key: &Hash256) -> ViewResult<()> {
        if self.layer.deletes.contains(key) {
            return Err(ViewError::NotFound);
        }
        if self.layer.inserts.remove(key).is_some() {
            // Never reached the parent; nothing to mark deleted.
            return Ok(());
        }
        if !self.layer.pre_images.contains_key(key) {
            let original = self.read_base(key)?;
            self.layer.pre_images.insert(*key, original);
        }
        self.layer.mods.remove(key);
        self.layer.deletes.insert(*key);
        Ok(())
    }

    fn for_each(&self, f: &mut dyn FnMut(&Hash256, &LedgerEntry)) {
        match &self.base {
            SandboxBase::View(view) => view.for_each(&mut |key, entry| {
                if self.layer.deletes.contains(key) {
                    return;
                }
                match self.layer.mods.get(key) {
                    Some(modified) => f(key, modified),
                    None => f(key, entry),
                }
            }),
            SandboxBase::Parent(parent) => parent.for_each(&mut |key, entry| {
                if self.layer.deletes.contains(key) {
                    return;
                }
                match self.layer.mods.get(key) {
                    Some(modified) => f(key, modified),
                    None => f(key, entry),
                }
            }),
        }
        for (key, entry) in &self.layer.inserts {
            f(key, entry);
        }
    }

    fn adjust_drops_destroyed(&mut self, delta: u64) {
        self.layer.drops_destroyed = self.layer.drops_destroyed.saturating_add(delta);
    }

    fn drops_destroyed(&self) -> u64 {
        self.layer.drops_destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::view::InMemoryLedger;
    use crate::models::ledger::objects::AccountRoot;

    fn key(byte: u8) -> Hash256 {
        Hash256([byte; 32])
    }

    fn root_entry(sequence: u32) -> LedgerEntry {
        LedgerEntry::AccountRoot(AccountRoot {
            sequence,
            ..Default::default()
        })
    }

    fn seeded() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        ledger.insert(key(1), root_entry(1)).unwrap();
        ledger.insert(key(2), root_entry(2)).unwrap();
        ledger
    }

    #[test]
    fn test_read_through_and_overlay() {
        let ledger = seeded();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        assert!(sandbox.exists(&key(1)));
        sandbox.update(key(1), root_entry(9)).unwrap();
        assert_eq!(
            sandbox.read(&key(1)).unwrap().as_account_root().unwrap().sequence,
            9
        );
        // The backing view is untouched.
        assert_eq!(
            ledger.read(&key(1)).unwrap().as_account_root().unwrap().sequence,
            1
        );
    }

    #[test]
    fn test_pre_image_captured_once() {
        let ledger = seeded();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        sandbox.update(key(1), root_entry(5)).unwrap();
        sandbox.update(key(1), root_entry(6)).unwrap();
        let pre = sandbox.layer.pre_images.get(&key(1)).unwrap();
        assert_eq!(pre.as_account_root().unwrap().sequence, 1);
    }

    #[test]
    fn test_erase_hides_entry() {
        let ledger = seeded();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        sandbox.erase(&key(2)).unwrap();
        assert!(!sandbox.exists(&key(2)));
        assert_eq!(sandbox.read(&key(2)), Err(ViewError::NotFound));
        // Inserting again becomes a net modification.
        sandbox.insert(key(2), root_entry(7)).unwrap();
        assert!(sandbox.layer.mods.contains_key(&key(2)));
    }

    #[test]
    fn test_branch_absorb() {
        let ledger = seeded();
        let mut parent = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let mut child = parent.branch();
        child.update(key(1), root_entry(42)).unwrap();
        child.insert(key(3), root_entry(3)).unwrap();
        let layer = child.into_layer();
        parent.absorb(layer).unwrap();
        assert_eq!(
            parent.read(&key(1)).unwrap().as_account_root().unwrap().sequence,
            42
        );
        assert!(parent.exists(&key(3)));
        // The parent captured its own pre-image from the backing view.
        assert_eq!(
            parent
                .layer
                .pre_images
                .get(&key(1))
                .unwrap()
                .as_account_root()
                .unwrap()
                .sequence,
            1
        );
    }

    #[test]
    fn test_absorb_rejects_foreign_layer() {
        let ledger = seeded();
        let mut parent = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let stranger = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let layer = stranger.into_layer();
        assert!(parent.absorb(layer).is_err());
    }

    #[test]
    fn test_apply_to_view_is_idempotent() {
        let mut ledger = seeded();
        let layer = {
            let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
            sandbox.update(key(1), root_entry(10)).unwrap();
            sandbox.insert(key(4), root_entry(4)).unwrap();
            sandbox.erase(&key(2)).unwrap();
            sandbox.into_layer()
        };
        layer.apply_to_view(&mut ledger).unwrap();
        assert!(!ledger.exists(&key(2)));
        assert!(ledger.exists(&key(4)));
        layer.apply_to_view(&mut ledger).unwrap();
        assert_eq!(
            ledger.read(&key(1)).unwrap().as_account_root().unwrap().sequence,
            10
        );
    }

    #[test]
    fn test_balance_hook_caps_at_original() {
        use crate::core::types::Currency;
        use crate::models::amount::IssuedCurrencyAmount;
        use core::str::FromStr;

        let ledger = seeded();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let alice = AccountId([1; 20]);
        let issuer = AccountId([2; 20]);
        let usd = Currency::standard("USD").unwrap();

        // Alice starts with 100 and pays 60 toward the issuer.
        sandbox.credit(
            &alice,
            &issuer,
            usd,
            BigDecimal::from(60),
            BigDecimal::from(100),
        );

        // Even if the state were to report a replenished balance, the hook
        // holds her to what the original balance leaves over.
        let reported = Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
            usd,
            issuer,
            BigDecimal::from(100),
        ));
        let seen = sandbox.balance_hook(&alice, &issuer, &reported);
        assert_eq!(seen.as_big(), BigDecimal::from_str("40").unwrap());
    }

    #[test]
    fn test_owner_count_hook_keeps_high_water_mark() {
        let ledger = seeded();
        let mut sandbox = PaymentSandbox::root(&ledger, Hash256::ZERO, 1);
        let alice = AccountId([1; 20]);
        sandbox.record_owner_count(&alice, 5);
        sandbox.record_owner_count(&alice, 3);
        assert_eq!(sandbox.owner_count_hook(&alice, 2), 5);
        assert_eq!(sandbox.owner_count_hook(&alice, 9), 9);
    }
}
