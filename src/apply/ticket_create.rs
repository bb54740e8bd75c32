//! The TicketCreate applier.

use crate::apply::config::{Config, Rules};
use crate::apply::context::ApplyContext;
use crate::apply::TxResult;
use crate::constants::TICKET_BATCH_MAX;
use crate::core::keylet;
use crate::ledger::directory::{dir_insert, DirectoryKind};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, adjust_owner_count};
use crate::ledger::view::LedgerView;
use crate::models::ledger::objects::Ticket;
use crate::models::ledger::LedgerEntry;
use crate::models::transactions::TicketCreate;
use crate::ter::TransactionResult;

pub fn preflight(tx: &TicketCreate, _rules: &Rules) -> TxResult {
    if tx.ticket_count == 0 || tx.ticket_count > TICKET_BATCH_MAX {
        return Err(TransactionResult::TemMalformed);
    }
    Ok(())
}

pub fn preclaim(tx: &TicketCreate, view: &PaymentSandbox<'_>, _config: &Config) -> TxResult {
    let root = account_root(view, &tx.common_fields.account)
        .map_err(|_| TransactionResult::TefInternal)?;
    if root.sequence.checked_add(tx.ticket_count).is_none() {
        return Err(TransactionResult::TecMaxSequenceReached);
    }
    Ok(())
}

pub fn apply(tx: &TicketCreate, ctx: &mut ApplyContext<'_, '_>) -> TxResult {
    let mut root = ctx
        .source_root()
        .map_err(|_| TransactionResult::TefInternal)?;

    // Every ticket is an owned object; the whole batch must fit under
    // the reserve.
    let owner_count = ctx.view.owner_count_hook(&ctx.account, root.owner_count);
    let needed = ctx
        .config
        .reserve_to_create(owner_count + tx.ticket_count - 1);
    if root.balance.0 < needed {
        return Err(TransactionResult::TecInsufficientReserve);
    }

    // Tickets take the sequence numbers following the one this
    // transaction consumed; the account skips past them.
    let first = root.sequence;
    root.sequence = root.sequence.saturating_add(tx.ticket_count);
    ctx.write_source_root(root)
        .map_err(|_| TransactionResult::TefInternal)?;

    for offset in 0..tx.ticket_count {
        let ticket_sequence = first + offset;
        let keylet = keylet::ticket(&ctx.account, ticket_sequence);
        let mut ticket = Ticket {
            account: ctx.account,
            ticket_sequence,
            ..Default::default()
        };
        ticket.owner_node = dir_insert(
            ctx.view,
            keylet::owner_dir(&ctx.account).key,
            &DirectoryKind::Owner(ctx.account),
            keylet.key,
        )
        .map_err(|_| TransactionResult::TefInternal)?;
        ctx.view
            .insert(keylet.key, LedgerEntry::Ticket(ticket))
            .map_err(|_| TransactionResult::TefInternal)?;
        adjust_owner_count(ctx.view, &ctx.account, 1)
            .map_err(|_| TransactionResult::TefInternal)?;
    }
    Ok(())
}
