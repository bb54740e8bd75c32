use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Currency, Hash256};
use crate::models::amount::Amount;

use super::CommonFields;

/// Transactions of the Payment type support additional values in the
/// Flags field. This enum represents those options.
#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum PaymentFlag {
    /// Do not use the default path; only use paths included in the Paths
    /// field.
    TfNoRippleDirect = 0x00010000,
    /// If the specified Amount cannot be sent without spending more than
    /// SendMax, reduce the received amount instead of failing outright.
    TfPartialPayment = 0x00020000,
    /// Only take paths where all the conversions have an input:output
    /// ratio that is equal or better than the ratio of Amount:SendMax.
    TfLimitQuality = 0x00040000,
}

/// One element of a payment path: an account to ripple through, or an
/// issue to convert into over a book.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

/// Transfers value from one account to another.
///
/// See Payment:
/// `<https://xrpl.org/payment.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// The amount delivered to the destination; with partial payments this
    /// is the most the destination can receive.
    pub amount: Amount,
    pub destination: AccountId,
    pub destination_tag: Option<u32>,
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Hash256>,
    /// Highest amount of source currency this transaction may spend.
    pub send_max: Option<Amount>,
    /// Minimum delivery for a partial payment to succeed.
    pub deliver_min: Option<Amount>,
    /// Payment path candidates, in addition to the implicit default path.
    pub paths: Option<Vec<Vec<PathStep>>>,
}

impl Payment {
    pub fn has_flag(&self, flag: PaymentFlag) -> bool {
        self.common_fields.has_flag_bits(flag as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::amount::XRPAmount;

    #[test]
    fn test_serde() {
        let json = r#"{
            "TransactionType": "Payment",
            "Account": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "Destination": "rrrrrrrrrrrrrrrrrrrrBZbvji",
            "Amount": "20000000",
            "Fee": "10",
            "Sequence": 1,
            "Flags": 131072
        }"#;
        let tx: crate::models::transactions::AnyTransaction = serde_json::from_str(json).unwrap();
        let payment = match tx {
            crate::models::transactions::AnyTransaction::Payment(payment) => payment,
            other => panic!("wrong type: {other:?}"),
        };
        assert!(payment.has_flag(PaymentFlag::TfPartialPayment));
        assert!(!payment.has_flag(PaymentFlag::TfNoRippleDirect));
        assert_eq!(payment.amount, Amount::XRPAmount(XRPAmount(20_000_000)));
        assert!(payment.paths.is_none());
    }

    #[test]
    fn test_path_step_shape() {
        let json = r#"{"currency":"USD","issuer":"rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn"}"#;
        let step: PathStep = serde_json::from_str(json).unwrap();
        assert!(step.account.is_none());
        assert!(step.currency.is_some());
    }
}
