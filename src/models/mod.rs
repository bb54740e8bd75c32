//! Top-level modules for the models package.

pub mod amount;
pub mod ledger;
#[allow(clippy::too_many_arguments)]
pub mod transactions;

pub use amount::Amount;
