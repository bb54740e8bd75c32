//! The native endpoints of a strand: the paying account at the head, the
//! receiving account at the tail. Input equals output; the head is capped
//! by the payer's liquid balance above reserve.

use crate::core::types::{AccountId, Currency, Quality};
use crate::ledger::sandbox::PaymentSandbox;
use crate::ledger::transfer::{account_root, update_account_root, xrp_liquid};
use crate::ledger::view::ViewError;
use crate::models::amount::{Amount, XRPAmount};

use super::super::{ExecCtx, FlowError, FlowResult};
use super::XrpEndpointStep;

fn expect_xrp(amount: &Amount) -> FlowResult<XRPAmount> {
    match amount {
        Amount::XRPAmount(drops) => Ok(*drops),
        Amount::IssuedCurrencyAmount(_) => Err(FlowError::View(ViewError::Internal(
            alloc::string::String::from("xrp endpoint fed an issued amount"),
        ))),
    }
}

impl XrpEndpointStep {
    pub fn new(account: AccountId, is_last: bool) -> Self {
        XrpEndpointStep {
            account,
            is_last,
            cache: None,
        }
    }

    pub fn quality_upper_bound(
        &self,
        sandbox: &PaymentSandbox<'_>,
        ctx: &ExecCtx<'_>,
    ) -> Option<Quality> {
        if !self.is_last {
            let liquid = xrp_liquid(sandbox, &self.account, ctx.config).ok()?;
            if liquid.is_zero() {
                return None;
            }
        }
        Some(Quality::ONE)
    }

    pub fn rev(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        out_requested: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        let requested = expect_xrp(out_requested)?;
        let limited = if self.is_last {
            requested
        } else {
            requested.min(xrp_liquid(sandbox, &self.account, ctx.config)?)
        };
        Ok((
            Amount::XRPAmount(limited),
            Amount::XRPAmount(limited),
        ))
    }

    pub fn fwd(
        &mut self,
        sandbox: &mut PaymentSandbox<'_>,
        ctx: &mut ExecCtx<'_>,
        in_available: &Amount,
    ) -> FlowResult<(Amount, Amount)> {
        let mut moved = expect_xrp(in_available)?;
        if let Some(cache) = &self.cache {
            moved = moved.min(expect_xrp(&cache.cached_in)?);
        }
        if self.is_last {
            let mut root = account_root(sandbox, &self.account)?;
            root.balance = root
                .balance
                .checked_add(moved)
                .map_err(|_| ViewError::Internal(alloc::string::String::from("balance overflow")))?;
            update_account_root(sandbox, root)?;
        } else {
            moved = moved.min(xrp_liquid(sandbox, &self.account, ctx.config)?);
            let mut root = account_root(sandbox, &self.account)?;
            let pre_balance = root.balance;
            root.balance = root
                .balance
                .checked_sub(moved)
                .map_err(|_| ViewError::Internal(alloc::string::String::from("balance underflow")))?;
            update_account_root(sandbox, root)?;
            sandbox.credit(
                &self.account,
                &AccountId::ZERO,
                Currency::XRP,
                moved.as_big(),
                pre_balance.as_big(),
            );
        }
        Ok((Amount::XRPAmount(moved), Amount::XRPAmount(moved)))
    }
}
