//! Transaction engine result codes.
//!
//! The integer partition is wire-compatible: success is zero, claimed-cost
//! results occupy 100..=199, failures -199..=-100, malformed -299..=-200,
//! local errors -399..=-300 and retryable results -99..=-1. Names are the
//! stable wire strings.

use core::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, IntoStaticStr};

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, IntoStaticStr)]
pub enum TransactionResult {
    #[strum(serialize = "tesSUCCESS")]
    TesSuccess = 0,

    // Claimed cost: the fee is charged, no other state change survives.
    #[strum(serialize = "tecCLAIM")]
    TecClaim = 100,
    #[strum(serialize = "tecPATH_PARTIAL")]
    TecPathPartial = 101,
    #[strum(serialize = "tecUNFUNDED_OFFER")]
    TecUnfundedOffer = 103,
    #[strum(serialize = "tecUNFUNDED_PAYMENT")]
    TecUnfundedPayment = 104,
    #[strum(serialize = "tecDIR_FULL")]
    TecDirFull = 121,
    #[strum(serialize = "tecINSUF_RESERVE_LINE")]
    TecInsufReserveLine = 122,
    #[strum(serialize = "tecINSUF_RESERVE_OFFER")]
    TecInsufReserveOffer = 123,
    #[strum(serialize = "tecNO_DST")]
    TecNoDst = 124,
    #[strum(serialize = "tecNO_DST_INSUF_XRP")]
    TecNoDstInsufXrp = 125,
    #[strum(serialize = "tecNO_LINE_REDUNDANT")]
    TecNoLineRedundant = 127,
    #[strum(serialize = "tecPATH_DRY")]
    TecPathDry = 128,
    #[strum(serialize = "tecUNFUNDED")]
    TecUnfunded = 129,
    #[strum(serialize = "tecNO_ALTERNATIVE_KEY")]
    TecNoAlternativeKey = 130,
    #[strum(serialize = "tecNO_REGULAR_KEY")]
    TecNoRegularKey = 131,
    #[strum(serialize = "tecOWNERS")]
    TecOwners = 132,
    #[strum(serialize = "tecNO_ISSUER")]
    TecNoIssuer = 133,
    #[strum(serialize = "tecNO_AUTH")]
    TecNoAuth = 134,
    #[strum(serialize = "tecNO_LINE")]
    TecNoLine = 135,
    #[strum(serialize = "tecINSUFF_FEE")]
    TecInsuffFee = 136,
    #[strum(serialize = "tecFROZEN")]
    TecFrozen = 137,
    #[strum(serialize = "tecNO_TARGET")]
    TecNoTarget = 138,
    #[strum(serialize = "tecNO_PERMISSION")]
    TecNoPermission = 139,
    #[strum(serialize = "tecNO_ENTRY")]
    TecNoEntry = 140,
    #[strum(serialize = "tecINSUFFICIENT_RESERVE")]
    TecInsufficientReserve = 141,
    #[strum(serialize = "tecNEED_MASTER_KEY")]
    TecNeedMasterKey = 142,
    #[strum(serialize = "tecDST_TAG_NEEDED")]
    TecDstTagNeeded = 143,
    #[strum(serialize = "tecINTERNAL")]
    TecInternal = 144,
    #[strum(serialize = "tecEXPIRED")]
    TecExpired = 148,
    #[strum(serialize = "tecDUPLICATE")]
    TecDuplicate = 149,
    #[strum(serialize = "tecKILLED")]
    TecKilled = 150,
    #[strum(serialize = "tecHAS_OBLIGATIONS")]
    TecHasObligations = 151,
    #[strum(serialize = "tecTOO_SOON")]
    TecTooSoon = 152,
    #[strum(serialize = "tecMAX_SEQUENCE_REACHED")]
    TecMaxSequenceReached = 154,
    #[strum(serialize = "tecNO_SUITABLE_NFTOKEN_PAGE")]
    TecNoSuitableNFTokenPage = 155,
    #[strum(serialize = "tecNFTOKEN_BUY_SELL_MISMATCH")]
    TecNFTokenBuySellMismatch = 156,
    #[strum(serialize = "tecNFTOKEN_OFFER_TYPE_MISMATCH")]
    TecNFTokenOfferTypeMismatch = 157,
    #[strum(serialize = "tecCANT_ACCEPT_OWN_NFTOKEN_OFFER")]
    TecCantAcceptOwnNFTokenOffer = 158,
    #[strum(serialize = "tecINSUFFICIENT_FUNDS")]
    TecInsufficientFunds = 159,
    #[strum(serialize = "tecOBJECT_NOT_FOUND")]
    TecObjectNotFound = 160,
    #[strum(serialize = "tecINSUFFICIENT_PAYMENT")]
    TecInsufficientPayment = 161,

    // Failure: structurally valid but cannot apply in this ledger.
    #[strum(serialize = "tefFAILURE")]
    TefFailure = -199,
    #[strum(serialize = "tefALREADY")]
    TefAlready = -198,
    #[strum(serialize = "tefBAD_AUTH")]
    TefBadAuth = -196,
    #[strum(serialize = "tefINTERNAL")]
    TefInternal = -194,
    #[strum(serialize = "tefNO_AUTH_REQUIRED")]
    TefNoAuthRequired = -193,
    #[strum(serialize = "tefPAST_SEQ")]
    TefPastSeq = -192,
    #[strum(serialize = "tefMAX_LEDGER")]
    TefMaxLedger = -186,
    #[strum(serialize = "tefNO_TICKET")]
    TefNoTicket = -182,

    // Malformed: never applied, never charged.
    #[strum(serialize = "temMALFORMED")]
    TemMalformed = -299,
    #[strum(serialize = "temBAD_AMOUNT")]
    TemBadAmount = -298,
    #[strum(serialize = "temBAD_CURRENCY")]
    TemBadCurrency = -297,
    #[strum(serialize = "temBAD_EXPIRATION")]
    TemBadExpiration = -296,
    #[strum(serialize = "temBAD_FEE")]
    TemBadFee = -295,
    #[strum(serialize = "temBAD_ISSUER")]
    TemBadIssuer = -294,
    #[strum(serialize = "temBAD_LIMIT")]
    TemBadLimit = -293,
    #[strum(serialize = "temBAD_OFFER")]
    TemBadOffer = -292,
    #[strum(serialize = "temBAD_PATH")]
    TemBadPath = -291,
    #[strum(serialize = "temBAD_PATH_LOOP")]
    TemBadPathLoop = -290,
    #[strum(serialize = "temBAD_SEND_XRP_MAX")]
    TemBadSendXrpMax = -287,
    #[strum(serialize = "temBAD_SEND_XRP_NO_DIRECT")]
    TemBadSendXrpNoDirect = -286,
    #[strum(serialize = "temBAD_SEND_XRP_PARTIAL")]
    TemBadSendXrpPartial = -285,
    #[strum(serialize = "temBAD_SEQUENCE")]
    TemBadSequence = -283,
    #[strum(serialize = "temBAD_SIGNATURE")]
    TemBadSignature = -282,
    #[strum(serialize = "temBAD_SRC_ACCOUNT")]
    TemBadSrcAccount = -281,
    #[strum(serialize = "temBAD_TRANSFER_RATE")]
    TemBadTransferRate = -280,
    #[strum(serialize = "temDST_IS_SRC")]
    TemDstIsSrc = -279,
    #[strum(serialize = "temDST_NEEDED")]
    TemDstNeeded = -278,
    #[strum(serialize = "temINVALID")]
    TemInvalid = -277,
    #[strum(serialize = "temINVALID_FLAG")]
    TemInvalidFlag = -276,
    #[strum(serialize = "temREDUNDANT")]
    TemRedundant = -275,
    #[strum(serialize = "temRIPPLE_EMPTY")]
    TemRippleEmpty = -274,
    #[strum(serialize = "temDISABLED")]
    TemDisabled = -273,
    #[strum(serialize = "temBAD_TICK_SIZE")]
    TemBadTickSize = -272,
    #[strum(serialize = "temINVALID_ACCOUNT_ID")]
    TemInvalidAccountId = -268,
    #[strum(serialize = "temCANNOT_PREAUTH_SELF")]
    TemCannotPreauthSelf = -267,
    #[strum(serialize = "temBAD_QUORUM")]
    TemBadQuorum = -263,
    #[strum(serialize = "temBAD_WEIGHT")]
    TemBadWeight = -262,
    #[strum(serialize = "temBAD_SIGNER")]
    TemBadSigner = -261,
    #[strum(serialize = "temBAD_NFTOKEN_TRANSFER_FEE")]
    TemBadNFTokenTransferFee = -260,

    // Local: this node declines to relay.
    #[strum(serialize = "telLOCAL_ERROR")]
    TelLocalError = -399,
    #[strum(serialize = "telBAD_DOMAIN")]
    TelBadDomain = -398,
    #[strum(serialize = "telBAD_PUBLIC_KEY")]
    TelBadPublicKey = -396,
    #[strum(serialize = "telINSUF_FEE_P")]
    TelInsufFeeP = -394,
    #[strum(serialize = "telNO_DST_PARTIAL")]
    TelNoDstPartial = -393,

    // Retry: could apply in a later ledger.
    #[strum(serialize = "terRETRY")]
    TerRetry = -99,
    #[strum(serialize = "terINSUF_FEE_B")]
    TerInsufFeeB = -96,
    #[strum(serialize = "terNO_ACCOUNT")]
    TerNoAccount = -95,
    #[strum(serialize = "terNO_AUTH")]
    TerNoAuth = -94,
    #[strum(serialize = "terNO_LINE")]
    TerNoLine = -93,
    #[strum(serialize = "terOWNERS")]
    TerOwners = -92,
    #[strum(serialize = "terPRE_SEQ")]
    TerPreSeq = -91,
    #[strum(serialize = "terPRE_TICKET")]
    TerPreTicket = -88,
}

impl TransactionResult {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        (*self).into()
    }

    pub fn is_tes(&self) -> bool {
        self.code() == 0
    }

    pub fn is_tec(&self) -> bool {
        (100..=199).contains(&self.code())
    }

    /// Applied results make it into a ledger: success, or claimed cost.
    pub fn is_applied(&self) -> bool {
        self.is_tes() || self.is_tec()
    }

    pub fn should_retry(&self) -> bool {
        (-99..=-1).contains(&self.code())
    }
}

impl fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl Serialize for TransactionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for TransactionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = alloc::borrow::Cow::<str>::deserialize(deserializer)?;
        TransactionResult::iter()
            .find(|variant| variant.as_ref() == raw)
            .ok_or_else(|| de::Error::custom("unknown transaction result"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition() {
        assert!(TransactionResult::TesSuccess.is_applied());
        assert!(TransactionResult::TecPathPartial.is_applied());
        assert!(!TransactionResult::TefPastSeq.is_applied());
        assert!(TransactionResult::TerPreSeq.should_retry());
        assert!(!TransactionResult::TecKilled.should_retry());
        assert_eq!(TransactionResult::TesSuccess.code(), 0);
        assert_eq!(TransactionResult::TecPathPartial.code(), 101);
        assert_eq!(TransactionResult::TemMalformed.code(), -299);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            TransactionResult::TecUnfundedPayment.as_ref(),
            "tecUNFUNDED_PAYMENT"
        );
        assert_eq!(
            serde_json::to_string(&TransactionResult::TesSuccess).unwrap(),
            r#""tesSUCCESS""#
        );
        let back: TransactionResult = serde_json::from_str(r#""tecKILLED""#).unwrap();
        assert_eq!(back, TransactionResult::TecKilled);
    }
}
