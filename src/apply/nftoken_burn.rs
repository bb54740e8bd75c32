//! The NFTokenBurn applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::nftoken_pages::{find_token, remove_token};
use crate::apply::TxResult;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, update_account_root};
use crate::models::transactions::NFTokenBurn;
use crate::ter::TransactionResult;
use crate::utils::nftoken_id::parse_nftoken_id;

const LSF_BURNABLE: u16 = 0x0001;

pub fn preflight(_tx: &NFTokenBurn, _rules: &Rules) -> TxResult {
    Ok(())
}

pub fn preclaim(tx: &NFTokenBurn, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    let holder = tx.owner.unwrap_or(tx.common_fields.account);
    if find_token(view, &holder, &tx.nftoken_id).is_none() {
        return Err(TransactionResult::TecNoEntry);
    }
    if holder != tx.common_fields.account {
        // Only the issuer of a burnable token may burn out of another
        // account.
        let parts = parse_nftoken_id(&tx.nftoken_id);
        if parts.issuer != tx.common_fields.account || parts.flags & LSF_BURNABLE == 0 {
            return Err(TransactionResult::TecNoPermission);
        }
    }
    Ok(())
}

pub fn apply(tx: &NFTokenBurn, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let holder = tx.owner.unwrap_or(ctx.account);
    remove_token(ctx.view, &holder, &tx.nftoken_id)?;

    let parts = parse_nftoken_id(&tx.nftoken_id);
    if let Ok(mut issuer_root) = account_root(ctx.view, &parts.issuer) {
        issuer_root.burned_nftokens = Some(issuer_root.burned_nftokens.unwrap_or(0) + 1);
        update_account_root(ctx.view, issuer_root)
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    Ok(())
}
