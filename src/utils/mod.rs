//! Assorted helpers.

pub mod nftoken_id;
