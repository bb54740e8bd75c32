pub mod account_delete;
pub mod account_set;
pub mod check_cancel;
pub mod check_cash;
pub mod check_create;
pub mod deposit_preauth;
pub mod metadata;
pub mod nftoken_accept_offer;
pub mod nftoken_burn;
pub mod nftoken_cancel_offer;
pub mod nftoken_create_offer;
pub mod nftoken_mint;
pub mod offer_cancel;
pub mod offer_create;
pub mod payment;
pub mod payment_channel_claim;
pub mod payment_channel_create;
pub mod payment_channel_fund;
pub mod set_regular_key;
pub mod signer_list_set;
pub mod ticket_create;
pub mod trust_set;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use sha2::{Digest, Sha512};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::{AccountId, Hash256};
use crate::models::amount::XRPAmount;

pub use account_delete::AccountDelete;
pub use account_set::{AccountSet, AccountSetFlag};
pub use check_cancel::CheckCancel;
pub use check_cash::CheckCash;
pub use check_create::CheckCreate;
pub use deposit_preauth::DepositPreauth;
pub use nftoken_accept_offer::NFTokenAcceptOffer;
pub use nftoken_burn::NFTokenBurn;
pub use nftoken_cancel_offer::NFTokenCancelOffer;
pub use nftoken_create_offer::{NFTokenCreateOffer, NFTokenCreateOfferFlag};
pub use nftoken_mint::{NFTokenMint, NFTokenMintFlag};
pub use offer_cancel::OfferCancel;
pub use offer_create::{OfferCreate, OfferCreateFlag};
pub use payment::{PathStep, Payment, PaymentFlag};
pub use payment_channel_claim::{PaymentChannelClaim, PaymentChannelClaimFlag};
pub use payment_channel_create::PaymentChannelCreate;
pub use payment_channel_fund::PaymentChannelFund;
pub use set_regular_key::SetRegularKey;
pub use signer_list_set::{SignerEntry, SignerListSet};
pub use ticket_create::TicketCreate;
pub use trust_set::{TrustSet, TrustSetFlag};

const TRANSACTION_HASH_PREFIX: u32 = 0x54584E00;

/// Enum containing the different Transaction types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, AsRefStr, EnumIter, PartialEq, Eq)]
pub enum TransactionType {
    AccountDelete,
    AccountSet,
    CheckCancel,
    CheckCash,
    CheckCreate,
    DepositPreauth,
    NFTokenAcceptOffer,
    NFTokenBurn,
    NFTokenCancelOffer,
    NFTokenCreateOffer,
    NFTokenMint,
    OfferCancel,
    OfferCreate,
    Payment,
    PaymentChannelClaim,
    PaymentChannelCreate,
    PaymentChannelFund,
    SetRegularKey,
    SignerListSet,
    TicketCreate,
    TrustSet,
}

/// The base fields shared by all transaction models.
///
/// See Transaction Common Fields:
/// `<https://xrpl.org/transaction-common-fields.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CommonFields {
    /// The unique address of the account that initiated the transaction.
    pub account: AccountId,
    /// Drops destroyed to apply this transaction.
    pub fee: Option<XRPAmount>,
    /// Set of bit-flags for this transaction.
    #[serde(default)]
    pub flags: u32,
    /// Highest ledger index this transaction can appear in.
    pub last_ledger_sequence: Option<u32>,
    /// The sequence number of the account sending the transaction, or zero
    /// when a ticket is used instead.
    pub sequence: Option<u32>,
    pub source_tag: Option<u32>,
    /// The ticket consumed in place of a sequence number.
    pub ticket_sequence: Option<u32>,
}

impl CommonFields {
    pub fn has_flag_bits(&self, bits: u32) -> bool {
        self.flags & bits != 0
    }
}

/// One transaction of any supported type, tagged by `TransactionType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum AnyTransaction {
    AccountDelete(AccountDelete),
    AccountSet(AccountSet),
    CheckCancel(CheckCancel),
    CheckCash(CheckCash),
    CheckCreate(CheckCreate),
    DepositPreauth(DepositPreauth),
    NFTokenAcceptOffer(NFTokenAcceptOffer),
    NFTokenBurn(NFTokenBurn),
    NFTokenCancelOffer(NFTokenCancelOffer),
    NFTokenCreateOffer(NFTokenCreateOffer),
    NFTokenMint(NFTokenMint),
    OfferCancel(OfferCancel),
    OfferCreate(OfferCreate),
    Payment(Payment),
    PaymentChannelClaim(PaymentChannelClaim),
    PaymentChannelCreate(PaymentChannelCreate),
    PaymentChannelFund(PaymentChannelFund),
    SetRegularKey(SetRegularKey),
    SignerListSet(SignerListSet),
    TicketCreate(TicketCreate),
    TrustSet(TrustSet),
}

impl AnyTransaction {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            AnyTransaction::AccountDelete(_) => TransactionType::AccountDelete,
            AnyTransaction::AccountSet(_) => TransactionType::AccountSet,
            AnyTransaction::CheckCancel(_) => TransactionType::CheckCancel,
            AnyTransaction::CheckCash(_) => TransactionType::CheckCash,
            AnyTransaction::CheckCreate(_) => TransactionType::CheckCreate,
            AnyTransaction::DepositPreauth(_) => TransactionType::DepositPreauth,
            AnyTransaction::NFTokenAcceptOffer(_) => TransactionType::NFTokenAcceptOffer,
            AnyTransaction::NFTokenBurn(_) => TransactionType::NFTokenBurn,
            AnyTransaction::NFTokenCancelOffer(_) => TransactionType::NFTokenCancelOffer,
            AnyTransaction::NFTokenCreateOffer(_) => TransactionType::NFTokenCreateOffer,
            AnyTransaction::NFTokenMint(_) => TransactionType::NFTokenMint,
            AnyTransaction::OfferCancel(_) => TransactionType::OfferCancel,
            AnyTransaction::OfferCreate(_) => TransactionType::OfferCreate,
            AnyTransaction::Payment(_) => TransactionType::Payment,
            AnyTransaction::PaymentChannelClaim(_) => TransactionType::PaymentChannelClaim,
            AnyTransaction::PaymentChannelCreate(_) => TransactionType::PaymentChannelCreate,
            AnyTransaction::PaymentChannelFund(_) => TransactionType::PaymentChannelFund,
            AnyTransaction::SetRegularKey(_) => TransactionType::SetRegularKey,
            AnyTransaction::SignerListSet(_) => TransactionType::SignerListSet,
            AnyTransaction::TicketCreate(_) => TransactionType::TicketCreate,
            AnyTransaction::TrustSet(_) => TransactionType::TrustSet,
        }
    }

    pub fn common(&self) -> &CommonFields {
        match self {
            AnyTransaction::AccountDelete(tx) => &tx.common_fields,
            AnyTransaction::AccountSet(tx) => &tx.common_fields,
            AnyTransaction::CheckCancel(tx) => &tx.common_fields,
            AnyTransaction::CheckCash(tx) => &tx.common_fields,
            AnyTransaction::CheckCreate(tx) => &tx.common_fields,
            AnyTransaction::DepositPreauth(tx) => &tx.common_fields,
            AnyTransaction::NFTokenAcceptOffer(tx) => &tx.common_fields,
            AnyTransaction::NFTokenBurn(tx) => &tx.common_fields,
            AnyTransaction::NFTokenCancelOffer(tx) => &tx.common_fields,
            AnyTransaction::NFTokenCreateOffer(tx) => &tx.common_fields,
            AnyTransaction::NFTokenMint(tx) => &tx.common_fields,
            AnyTransaction::OfferCancel(tx) => &tx.common_fields,
            AnyTransaction::OfferCreate(tx) => &tx.common_fields,
            AnyTransaction::Payment(tx) => &tx.common_fields,
            AnyTransaction::PaymentChannelClaim(tx) => &tx.common_fields,
            AnyTransaction::PaymentChannelCreate(tx) => &tx.common_fields,
            AnyTransaction::PaymentChannelFund(tx) => &tx.common_fields,
            AnyTransaction::SetRegularKey(tx) => &tx.common_fields,
            AnyTransaction::SignerListSet(tx) => &tx.common_fields,
            AnyTransaction::TicketCreate(tx) => &tx.common_fields,
            AnyTransaction::TrustSet(tx) => &tx.common_fields,
        }
    }

    /// The identifying hash: the transaction-namespace prefix followed by
    /// the canonical serialization, sha512-halved.
    pub fn hash(&self) -> Hash256 {
        let mut hasher = Sha512::new();
        hasher.update(TRANSACTION_HASH_PREFIX.to_be_bytes());
        let serialized =
            serde_json::to_vec(self).unwrap_or_default();
        hasher.update(&serialized);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest[..32]);
        Hash256(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_dispatch() {
        let json = r#"{
            "TransactionType": "OfferCancel",
            "Account": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "Fee": "12",
            "Sequence": 7,
            "OfferSequence": 6
        }"#;
        let tx: AnyTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.transaction_type(), TransactionType::OfferCancel);
        assert_eq!(tx.common().sequence, Some(7));
        assert_eq!(tx.common().fee, Some(XRPAmount(12)));
    }

    #[test]
    fn test_hash_is_stable_and_distinct() {
        let json = r#"{
            "TransactionType": "OfferCancel",
            "Account": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "Sequence": 7,
            "OfferSequence": 6
        }"#;
        let tx: AnyTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.hash(), tx.hash());
        let mut other: AnyTransaction = serde_json::from_str(json).unwrap();
        if let AnyTransaction::OfferCancel(inner) = &mut other {
            inner.common_fields.sequence = Some(8);
        }
        assert_ne!(tx.hash(), other.hash());
    }
}
