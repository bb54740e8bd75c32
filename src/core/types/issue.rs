//! A currency and its issuer, the unit a step or book trades in.

use core::fmt;

use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{AccountId, Currency};

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, new,
)]
pub struct Issue {
    pub currency: Currency,
    pub issuer: AccountId,
}

impl Issue {
    /// The native asset: zero currency, zero issuer.
    pub const XRP: Issue = Issue {
        currency: Currency::XRP,
        issuer: AccountId::ZERO,
    };

    pub fn is_xrp(&self) -> bool {
        self.currency.is_xrp()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_xrp() {
            f.write_str("XRP")
        } else {
            write!(f, "{}/{}", self.currency, self.issuer)
        }
    }
}

impl fmt::Debug for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Issue({self})")
    }
}
