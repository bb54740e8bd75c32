//! The SetRegularKey applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::core::keylet;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::AccountRootFlag;
use crate::models::transactions::SetRegularKey;
use crate::ter::TransactionResult;

pub fn preflight(tx: &SetRegularKey, _rules: &Rules) -> TxResult {
    if tx.regular_key == Some(crate::core::types::AccountId::ZERO) {
        return Err(TransactionResult::TemInvalidAccountId);
    }
    Ok(())
}

pub fn preclaim(_tx: &SetRegularKey, _view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    Ok(())
}

pub fn apply(tx: &SetRegularKey, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let mut root = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;
    if tx.regular_key.is_none()
        && root.has_flag(AccountRootFlag::LsfDisableMaster)
        && !ctx.view.exists(&keylet::signer_list(&ctx.account).key)
    {
        // Removing the last usable key would lock the account out.
        return Err(TransactionResult::TecNoAlternativeKey);
    }
    root.regular_key = tx.regular_key;
    ctx.write_source_root(root)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
