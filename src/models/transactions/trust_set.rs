use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::amount::IssuedCurrencyAmount;

use super::CommonFields;

/// Transactions of the TrustSet type support additional values in the
/// Flags field. This enum represents those options.
///
/// See TrustSet flags:
/// `<https://xrpl.org/docs/references/protocol/transactions/types/trustset>`
#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum TrustSetFlag {
    /// Authorize the other party to hold currency issued by this account.
    /// (No effect unless using the asfRequireAuth AccountSet flag.) Cannot
    /// be unset.
    TfSetfAuth = 0x00010000,
    /// Enable the No Ripple flag, which blocks rippling between two trust
    /// lines of the same currency if this flag is enabled on both.
    TfSetNoRipple = 0x00020000,
    /// Disable the No Ripple flag, allowing rippling on this trust line.
    TfClearNoRipple = 0x00040000,
    /// Freeze the trust line.
    TfSetFreeze = 0x00100000,
    /// Unfreeze the trust line.
    TfClearFreeze = 0x00200000,
    /// Deep-freeze the trust line, blocking receives as well as sends.
    TfSetDeepFreeze = 0x00400000,
    /// Clear a deep freeze.
    TfClearDeepFreeze = 0x00800000,
}

/// Create or modify a trust line linking two accounts.
///
/// See TrustSet:
/// `<https://xrpl.org/docs/references/protocol/transactions/types/trustset>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TrustSet {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// Object defining the trust line to create or modify, in the format
    /// of a Currency Amount. The issuer field names the counterparty; the
    /// limit's semantic owner is the transaction source.
    pub limit_amount: IssuedCurrencyAmount,
    /// Value incoming balances on this trust line at the ratio of this
    /// number per 1,000,000,000 units. A value of 0 is shorthand for
    /// treating balances at face value.
    pub quality_in: Option<u32>,
    /// Value outgoing balances on this trust line at the ratio of this
    /// number per 1,000,000,000 units. A value of 0 is shorthand for
    /// treating balances at face value.
    pub quality_out: Option<u32>,
}

impl TrustSet {
    pub fn has_flag(&self, flag: TrustSetFlag) -> bool {
        self.common_fields.has_flag_bits(flag as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_serde() {
        let json = r#"{
            "TransactionType": "TrustSet",
            "Account": "ra5nK24KXen9AHvsdFTKHSANinZseWnPcX",
            "Fee": "12",
            "Flags": 262144,
            "Sequence": 12,
            "LimitAmount": {
                "currency": "USD",
                "issuer": "rsP3mgGb2tcYUrxiLFiHJiQXhsziegtwBc",
                "value": "100"
            }
        }"#;
        let tx: crate::models::transactions::AnyTransaction = serde_json::from_str(json).unwrap();
        let trust_set = match tx {
            crate::models::transactions::AnyTransaction::TrustSet(trust_set) => trust_set,
            other => panic!("wrong type: {other:?}"),
        };
        assert!(trust_set.has_flag(TrustSetFlag::TfClearNoRipple));
        assert_eq!(trust_set.limit_amount.value, BigDecimal::from(100));
        assert!(trust_set.quality_in.is_none());
    }
}
