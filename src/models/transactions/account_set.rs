use alloc::string::String;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::AccountId;

use super::CommonFields;

/// The account-settings switches an AccountSet may set or clear, passed in
/// the `SetFlag`/`ClearFlag` fields as small integers.
#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum AccountSetFlag {
    AsfRequireDest = 1,
    AsfRequireAuth = 2,
    AsfDisallowXRP = 3,
    AsfDisableMaster = 4,
    AsfAccountTxnID = 5,
    AsfNoFreeze = 6,
    AsfGlobalFreeze = 7,
    AsfDefaultRipple = 8,
    AsfDepositAuth = 9,
    AsfAuthorizedNFTokenMinter = 10,
    AsfAllowTrustLineClawback = 16,
}

/// Modifies the options and profile fields of an account.
///
/// See AccountSet:
/// `<https://xrpl.org/accountset.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSet {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    pub set_flag: Option<u32>,
    pub clear_flag: Option<u32>,
    /// Hex of the domain; the empty string clears it.
    pub domain: Option<String>,
    pub email_hash: Option<String>,
    pub message_key: Option<String>,
    /// Zero clears; otherwise parts per billion, at least face value and
    /// at most double.
    pub transfer_rate: Option<u32>,
    /// Zero clears; otherwise 3..=15 significant digits.
    pub tick_size: Option<u8>,
    #[serde(rename = "NFTokenMinter")]
    pub nftoken_minter: Option<AccountId>,
}
