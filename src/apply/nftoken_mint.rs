//! The NFTokenMint applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::nftoken_pages::insert_token;
use crate::apply::TxResult;
use crate::constants::NFTOKEN_MAX_TRANSFER_FEE;
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, update_account_root};
use crate::models::ledger::objects::NFToken;
use crate::models::transactions::{NFTokenMint, NFTokenMintFlag};
use crate::ter::TransactionResult;
use crate::utils::nftoken_id::{assemble_nftoken_id, NFTokenIdParts};

pub fn preflight(tx: &NFTokenMint, _rules: &Rules) -> TxResult {
    if let Some(fee) = tx.transfer_fee {
        if fee > NFTOKEN_MAX_TRANSFER_FEE {
            return Err(TransactionResult::TemBadNFTokenTransferFee);
        }
        if fee > 0 && !tx.has_flag(NFTokenMintFlag::TfTransferable) {
            return Err(TransactionResult::TemMalformed);
        }
    }
    if tx.issuer == Some(tx.common_fields.account) {
        return Err(TransactionResult::TemMalformed);
    }
    Ok(())
}

pub fn preclaim(tx: &NFTokenMint, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    if let Some(issuer) = &tx.issuer {
        let root = account_root(view, issuer).map_err(|_| TransactionResult::TecNoIssuer)?;
        if root.nftoken_minter != Some(tx.common_fields.account) {
            return Err(TransactionResult::TecNoPermission);
        }
    }
    Ok(())
}

pub fn apply(tx: &NFTokenMint, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let issuer = tx.issuer.unwrap_or(ctx.account);
    let mut issuer_root =
        account_root(ctx.view, &issuer).map_err(|_| TransactionResult::TefInternal)?;
    let sequence = issuer_root.minted_nftokens.unwrap_or(0);
    issuer_root.minted_nftokens = Some(
        sequence
            .checked_add(1)
            .ok_or(TransactionResult::TecMaxSequenceReached)?,
    );
    update_account_root(ctx.view, issuer_root).map_err(|_| TransactionResult::TefInternal)?;

    let token_id = assemble_nftoken_id(&NFTokenIdParts {
        flags: (tx.common_fields.flags & 0xFFFF) as u16,
        transfer_fee: tx.transfer_fee.unwrap_or(0),
        issuer,
        taxon: tx.nftoken_taxon,
        sequence,
    });

    insert_token(
        ctx.view,
        &ctx.account,
        NFToken {
            nftoken_id: token_id,
            uri: tx.uri.clone(),
        },
    )?;

    // A page may have been created; the balance must still cover it.
    ctx.reserve_ok(TransactionResult::TecInsufficientReserve)?;
    Ok(())
}
