//! Ledger state: the view abstraction, the payment sandbox overlay, the
//! directory engine, value-movement helpers and metadata synthesis.

pub mod directory;
pub mod meta;
pub mod sandbox;
pub mod transfer;
pub mod view;

pub use sandbox::PaymentSandbox;
pub use view::{InMemoryLedger, LedgerView, ViewError, ViewResult};
