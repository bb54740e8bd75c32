use alloc::string::String;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::types::AccountId;

use super::CommonFields;

#[derive(
    Debug, Eq, PartialEq, Clone, Copy, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter,
)]
#[repr(u32)]
pub enum NFTokenMintFlag {
    /// The issuer may burn the token while a non-issuer holds it.
    TfBurnable = 0x00000001,
    /// The token may only ever be traded for XRP.
    TfOnlyXRP = 0x00000002,
    /// Automatic trust lines for transfer fees.
    TfTrustLine = 0x00000004,
    /// The token may be transferred between non-issuer holders.
    TfTransferable = 0x00000008,
}

/// Mints a new NFToken onto the issuer's (or an authorized minter's)
/// token pages.
///
/// See NFTokenMint:
/// `<https://xrpl.org/nftokenmint.html>`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenMint {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// Arbitrary 32-bit grouping chosen by the issuer; ciphered into the
    /// token id.
    #[serde(rename = "NFTokenTaxon")]
    pub nftoken_taxon: u32,
    /// When minting on behalf of another account, that account.
    pub issuer: Option<AccountId>,
    /// Resale fee in 1/100_000 units, at most 50_000.
    pub transfer_fee: Option<u16>,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
}

impl NFTokenMint {
    pub fn has_flag(&self, flag: NFTokenMintFlag) -> bool {
        self.common_fields.has_flag_bits(flag as u32)
    }
}
