//! The AccountSet applier: account flags and profile fields.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::constants::QUALITY_ONE;
use crate::core::keylet;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::AccountRootFlag;
use crate::models::transactions::{AccountSet, AccountSetFlag};
use crate::ter::TransactionResult;

const MAX_DOMAIN_BYTES: usize = 256;

fn as_account_set_flag(value: u32) -> Option<AccountSetFlag> {
    use strum::IntoEnumIterator;
    AccountSetFlag::iter().find(|flag| *flag as u32 == value)
}

pub fn preflight(tx: &AccountSet, _rules: &Rules) -> TxResult {
    if let (Some(set), Some(clear)) = (tx.set_flag, tx.clear_flag) {
        if set == clear {
            return Err(TransactionResult::TemInvalidFlag);
        }
    }
    for value in [tx.set_flag, tx.clear_flag].into_iter().flatten() {
        if as_account_set_flag(value).is_none() {
            return Err(TransactionResult::TemInvalidFlag);
        }
    }
    if let Some(rate) = tx.transfer_rate {
        if rate != 0 && !(QUALITY_ONE..=2 * QUALITY_ONE).contains(&rate) {
            return Err(TransactionResult::TemBadTransferRate);
        }
    }
    if let Some(tick) = tx.tick_size {
        if tick != 0 && !(3..=15).contains(&tick) {
            return Err(TransactionResult::TemBadTickSize);
        }
    }
    if let Some(domain) = &tx.domain {
        if domain.len() > 2 * MAX_DOMAIN_BYTES {
            return Err(TransactionResult::TelBadDomain);
        }
    }
    Ok(())
}

pub fn preclaim(_tx: &AccountSet, _view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    Ok(())
}

pub fn apply(tx: &AccountSet, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let mut root = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;

    if let Some(value) = tx.set_flag.and_then(as_account_set_flag) {
        match value {
            AccountSetFlag::AsfRequireDest => root.set_flag(AccountRootFlag::LsfRequireDestTag),
            AccountSetFlag::AsfRequireAuth => {
                // Cannot start requiring authorization once trust lines
                // exist unauthorized.
                if root.owner_count != 0
                    && !root.has_flag(AccountRootFlag::LsfRequireAuth)
                    && ctx.view.exists(&keylet::owner_dir(&ctx.account).key)
                {
                    return Err(TransactionResult::TecOwners);
                }
                root.set_flag(AccountRootFlag::LsfRequireAuth);
            }
            AccountSetFlag::AsfDisallowXRP => root.set_flag(AccountRootFlag::LsfDisallowXRP),
            AccountSetFlag::AsfDisableMaster => {
                let has_signer_list = ctx
                    .view
                    .exists(&keylet::signer_list(&ctx.account).key);
                if root.regular_key.is_none() && !has_signer_list {
                    return Err(TransactionResult::TecNoAlternativeKey);
                }
                root.set_flag(AccountRootFlag::LsfDisableMaster);
            }
            AccountSetFlag::AsfAccountTxnID => {}
            AccountSetFlag::AsfNoFreeze => root.set_flag(AccountRootFlag::LsfNoFreeze),
            AccountSetFlag::AsfGlobalFreeze => root.set_flag(AccountRootFlag::LsfGlobalFreeze),
            AccountSetFlag::AsfDefaultRipple => root.set_flag(AccountRootFlag::LsfDefaultRipple),
            AccountSetFlag::AsfDepositAuth => root.set_flag(AccountRootFlag::LsfDepositAuth),
            AccountSetFlag::AsfAuthorizedNFTokenMinter => {
                match &tx.nftoken_minter {
                    Some(minter) => root.nftoken_minter = Some(*minter),
                    None => return Err(TransactionResult::TemMalformed),
                }
            }
            AccountSetFlag::AsfAllowTrustLineClawback => {
                if root.owner_count != 0 {
                    return Err(TransactionResult::TecOwners);
                }
                root.set_flag(AccountRootFlag::LsfAllowTrustLineClawback);
            }
        }
    }

    if let Some(value) = tx.clear_flag.and_then(as_account_set_flag) {
        match value {
            AccountSetFlag::AsfRequireDest => root.clear_flag(AccountRootFlag::LsfRequireDestTag),
            AccountSetFlag::AsfRequireAuth => root.clear_flag(AccountRootFlag::LsfRequireAuth),
            AccountSetFlag::AsfDisallowXRP => root.clear_flag(AccountRootFlag::LsfDisallowXRP),
            AccountSetFlag::AsfDisableMaster => root.clear_flag(AccountRootFlag::LsfDisableMaster),
            AccountSetFlag::AsfAccountTxnID => {}
            // One-way switches stay set.
            AccountSetFlag::AsfNoFreeze | AccountSetFlag::AsfAllowTrustLineClawback => {
                return Err(TransactionResult::TecNoPermission)
            }
            AccountSetFlag::AsfGlobalFreeze => {
                if root.has_flag(AccountRootFlag::LsfNoFreeze) {
                    return Err(TransactionResult::TecNoPermission);
                }
                root.clear_flag(AccountRootFlag::LsfGlobalFreeze);
            }
            AccountSetFlag::AsfDefaultRipple => root.clear_flag(AccountRootFlag::LsfDefaultRipple),
            AccountSetFlag::AsfDepositAuth => root.clear_flag(AccountRootFlag::LsfDepositAuth),
            AccountSetFlag::AsfAuthorizedNFTokenMinter => root.nftoken_minter = None,
        }
    }

    if let Some(domain) = &tx.domain {
        root.domain = if domain.is_empty() {
            None
        } else {
            Some(domain.clone())
        };
    }
    if let Some(email_hash) = &tx.email_hash {
        root.email_hash = if email_hash.is_empty() {
            None
        } else {
            Some(email_hash.clone())
        };
    }
    if let Some(message_key) = &tx.message_key {
        root.message_key = if message_key.is_empty() {
            None
        } else {
            Some(message_key.clone())
        };
    }
    if let Some(rate) = tx.transfer_rate {
        root.transfer_rate = if rate == 0 || rate == QUALITY_ONE {
            None
        } else {
            Some(rate)
        };
    }
    if let Some(tick) = tx.tick_size {
        root.tick_size = if tick == 0 { None } else { Some(tick) };
    }

    ctx.write_source_root(root)
        .map_err(|_| TransactionResult::TefInternal)?;
    Ok(())
}
