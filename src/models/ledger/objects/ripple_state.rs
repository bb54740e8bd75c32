use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Hash256, Issue};
use crate::models::amount::IssuedCurrencyAmount;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum RippleStateFlag {
    /// This RippleState object contributes to the low account's owner
    /// reserve.
    LsfLowReserve = 0x00010000,
    /// This RippleState object contributes to the high account's owner
    /// reserve.
    LsfHighReserve = 0x00020000,
    /// The low account has authorized the high account to hold its issue.
    LsfLowAuth = 0x00040000,
    /// The high account has authorized the low account to hold its issue.
    LsfHighAuth = 0x00080000,
    /// The low account has disabled rippling through this trust line.
    LsfLowNoRipple = 0x00100000,
    /// The high account has disabled rippling through this trust line.
    LsfHighNoRipple = 0x00200000,
    /// The low account has frozen the trust line.
    LsfLowFreeze = 0x00400000,
    /// The high account has frozen the trust line.
    LsfHighFreeze = 0x00800000,
    /// The low account has deep-frozen the trust line: the high account
    /// can neither send nor receive.
    LsfLowDeepFreeze = 0x02000000,
    /// The high account has deep-frozen the trust line.
    LsfHighDeepFreeze = 0x04000000,
}

/// A trust line: the bilateral credit relationship between two accounts in
/// one currency. The lexicographically smaller account id is the "low"
/// side; the shared balance is held from the low side's perspective, so a
/// positive balance means the high account owes the low account.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RippleState {
    pub flags: u32,
    /// The shared balance from the low account's perspective. The issuer
    /// tag on this amount is the neutral account.
    pub balance: IssuedCurrencyAmount,
    /// The limit set by the low account; its issuer tag is the low account.
    pub low_limit: IssuedCurrencyAmount,
    /// The limit set by the high account; its issuer tag is the high
    /// account.
    pub high_limit: IssuedCurrencyAmount,
    #[serde(with = "crate::_serde::hex_u64")]
    pub low_node: u64,
    #[serde(with = "crate::_serde::hex_u64")]
    pub high_node: u64,
    pub low_quality_in: Option<u32>,
    pub low_quality_out: Option<u32>,
    pub high_quality_in: Option<u32>,
    pub high_quality_out: Option<u32>,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl RippleState {
    pub fn low_account(&self) -> AccountId {
        self.low_limit.issuer
    }

    pub fn high_account(&self) -> AccountId {
        self.high_limit.issuer
    }

    pub fn currency(&self) -> crate::core::types::Currency {
        self.low_limit.currency
    }

    /// The issue this line carries as seen by `holder`: the counterparty
    /// is the issuer.
    pub fn issue_for(&self, holder: &AccountId) -> Issue {
        let issuer = if *holder == self.low_account() {
            self.high_account()
        } else {
            self.low_account()
        };
        Issue::new(self.currency(), issuer)
    }

    /// The balance from `side`'s perspective.
    pub fn balance_for(&self, side: &AccountId) -> IssuedCurrencyAmount {
        if *side == self.low_account() {
            self.balance.clone()
        } else {
            self.balance.negated()
        }
    }

    pub fn has_flag(&self, flag: RippleStateFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    pub fn set_flag(&mut self, flag: RippleStateFlag) {
        self.flags |= flag as u32;
    }

    pub fn clear_flag(&mut self, flag: RippleStateFlag) {
        self.flags &= !(flag as u32);
    }

    /// Side-selected flags, low first.
    pub fn side_flag(
        &self,
        side: &AccountId,
        low: RippleStateFlag,
        high: RippleStateFlag,
    ) -> bool {
        if *side == self.low_account() {
            self.has_flag(low)
        } else {
            self.has_flag(high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Currency;
    use bigdecimal::BigDecimal;
    use core::str::FromStr;

    fn line() -> RippleState {
        let low: AccountId = "rrrrrrrrrrrrrrrrrrrrBZbvji".parse().unwrap();
        let high: AccountId = "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap();
        let usd = Currency::standard("USD").unwrap();
        RippleState {
            balance: IssuedCurrencyAmount::new(
                usd,
                AccountId::ONE,
                BigDecimal::from_str("-10").unwrap(),
            ),
            low_limit: IssuedCurrencyAmount::new(usd, low, BigDecimal::from(0u32)),
            high_limit: IssuedCurrencyAmount::new(usd, high, BigDecimal::from(110u32)),
            ..Default::default()
        }
    }

    #[test]
    fn test_side_accessors() {
        let state = line();
        let low = state.low_account();
        let high = state.high_account();
        assert!(low < high);
        assert_eq!(state.balance_for(&low).value, BigDecimal::from(-10));
        assert_eq!(state.balance_for(&high).value, BigDecimal::from(10));
        assert_eq!(state.issue_for(&low).issuer, high);
        assert_eq!(state.issue_for(&high).issuer, low);
    }

    #[test]
    fn test_serialize_node_hints_as_hex() {
        let state = line();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["LowNode"], "0000000000000000");
        assert_eq!(json["Balance"]["value"], "-10");
    }
}
