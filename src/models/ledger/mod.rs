pub mod objects;

pub use objects::{LedgerEntry, LedgerEntryType};
