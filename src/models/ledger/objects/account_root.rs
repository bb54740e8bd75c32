use alloc::string::String;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::XRPAmount;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum AccountRootFlag {
    /// This account requires destination tags on inbound payments.
    LsfRequireDestTag = 0x00020000,
    /// This account must authorize holders of its issuances.
    LsfRequireAuth = 0x00040000,
    /// This account discourages inbound XRP payments.
    LsfDisallowXRP = 0x00080000,
    /// The master key pair is disabled.
    LsfDisableMaster = 0x00100000,
    /// This account has permanently given up the ability to freeze.
    LsfNoFreeze = 0x00200000,
    /// All of this account's issuances are frozen.
    LsfGlobalFreeze = 0x00400000,
    /// New trust lines default to rippling enabled.
    LsfDefaultRipple = 0x00800000,
    /// Funds may only arrive through preauthorized channels.
    LsfDepositAuth = 0x01000000,
    /// This account may claw back its issuances. Cannot be unset.
    LsfAllowTrustLineClawback = 0x80000000,
}

/// The settings, XRP balance, and bookkeeping of one account.
///
/// See AccountRoot:
/// `<https://xrpl.org/accountroot.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRoot {
    /// The address this entry describes.
    pub account: AccountId,
    /// Drops held, including the reserved portion.
    pub balance: XRPAmount,
    /// The next valid transaction sequence for this account.
    pub sequence: u32,
    /// The number of owned ledger objects counted toward the reserve.
    pub owner_count: u32,
    pub flags: u32,
    pub regular_key: Option<AccountId>,
    pub domain: Option<String>,
    pub email_hash: Option<String>,
    pub message_key: Option<String>,
    /// Fee charged, in parts per billion, when this account's issuances
    /// move between two non-issuer parties.
    pub transfer_rate: Option<u32>,
    /// Significant digits offers trading this account's issuances round to.
    pub tick_size: Option<u8>,
    /// Account authorized to mint NFTokens on this account's behalf.
    #[serde(rename = "NFTokenMinter")]
    pub nftoken_minter: Option<AccountId>,
    #[serde(rename = "MintedNFTokens")]
    pub minted_nftokens: Option<u32>,
    #[serde(rename = "BurnedNFTokens")]
    pub burned_nftokens: Option<u32>,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Hash256,
    pub previous_txn_lgr_seq: u32,
}

impl AccountRoot {
    pub fn has_flag(&self, flag: AccountRootFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    pub fn set_flag(&mut self, flag: AccountRootFlag) {
        self.flags |= flag as u32;
    }

    pub fn clear_flag(&mut self, flag: AccountRootFlag) {
        self.flags &= !(flag as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_twiddling() {
        let mut root = AccountRoot::default();
        assert!(!root.has_flag(AccountRootFlag::LsfRequireAuth));
        root.set_flag(AccountRootFlag::LsfRequireAuth);
        root.set_flag(AccountRootFlag::LsfGlobalFreeze);
        assert!(root.has_flag(AccountRootFlag::LsfRequireAuth));
        root.clear_flag(AccountRootFlag::LsfRequireAuth);
        assert!(!root.has_flag(AccountRootFlag::LsfRequireAuth));
        assert!(root.has_flag(AccountRootFlag::LsfGlobalFreeze));
    }

    #[test]
    fn test_serde_omits_empty_optionals() {
        let root = AccountRoot {
            balance: XRPAmount(100_000_000),
            sequence: 5,
            ..Default::default()
        };
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["Balance"], "100000000");
        assert_eq!(json["Sequence"], 5);
        assert!(json.get("RegularKey").is_none());
        assert!(json.get("TransferRate").is_none());
    }
}
