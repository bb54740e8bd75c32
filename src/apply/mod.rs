//! The apply pipeline: preflight, preclaim, and the per-transaction
//! appliers, orchestrated by the engine.

pub mod account_delete;
pub mod account_set;
pub mod check_cancel;
pub mod check_cash;
pub mod check_create;
pub mod config;
pub mod context;
pub mod deposit_preauth;
pub mod engine;
pub mod nftoken_accept_offer;
pub mod nftoken_burn;
pub mod nftoken_cancel_offer;
pub mod nftoken_create_offer;
pub mod nftoken_mint;
pub mod nftoken_pages;
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

pub use config::{Config, Feature, Rules};
pub use context::ApplyContext;
pub use engine::apply_transaction;

use crate::ter::TransactionResult;

/// Appliers answer with a result code through `Err`; `Ok` is success.
pub type TxResult = Result<(), TransactionResult>;
