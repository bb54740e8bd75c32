//! Core codecs and primitive ledger types.

pub mod addresscodec;
pub mod binarycodec;
pub mod exceptions;
pub mod keylet;
pub mod types;
