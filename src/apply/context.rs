//! The state handed to an applier.

use crate::apply::config::Config;
use crate::core::keylet;
use crate::core::types::{AccountId, Hash256};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::account_root;
use crate::ledger::view::{LedgerView, ViewResult};
use crate::models::amount::Amount;
use crate::models::ledger::objects::AccountRoot;
use crate::models::ledger::LedgerEntry;
use crate::ter::TransactionResult;

/// Everything one applier invocation needs: the speculative view, the
/// ledger configuration, and the identity of the transaction being
/// applied. The source account lives in the view like any other entry;
/// the engine has already charged the fee and consumed the sequence.
pub struct ApplyContext<'a, 'b> {
    pub view: &'b mut PaymentSandbox<'a>,
    pub config: &'b Config,
    pub account: AccountId,
    pub txn_id: Hash256,
    /// The sequence (or ticket) the transaction consumed; entries created
    /// by this transaction are keyed off it.
    pub seq_consumed: u32,
    /// Set by the payment applier when partial delivery is possible.
    pub delivered_amount: Option<Amount>,
}

impl ApplyContext<'_, '_> {
    pub fn source_root(&self) -> ViewResult<AccountRoot> {
        account_root(self.view, &self.account)
    }

    pub fn write_source_root(&mut self, root: AccountRoot) -> ViewResult<()> {
        let key = keylet::account(&self.account).key;
        self.view.update(key, LedgerEntry::AccountRoot(root))
    }

    /// Post-change reserve check: after taking on new owned objects the
    /// balance must cover the floor.
    pub fn reserve_ok(&self, error: TransactionResult) -> Result<(), TransactionResult> {
        let root = self
            .source_root()
            .map_err(|_| TransactionResult::TefInternal)?;
        if root.balance.0 < self.config.reserve(root.owner_count) {
            return Err(error);
        }
        Ok(())
    }

    /// Pre-creation reserve check for taking on one more owned object.
    pub fn can_afford_new_object(&self, error: TransactionResult) -> Result<(), TransactionResult> {
        let root = self
            .source_root()
            .map_err(|_| TransactionResult::TefInternal)?;
        let owner_count = self.view.owner_count_hook(&self.account, root.owner_count);
        if root.balance.0 < self.config.reserve_to_create(owner_count) {
            return Err(error);
        }
        Ok(())
    }
}
