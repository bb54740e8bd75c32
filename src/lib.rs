#![no_std]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

pub mod _serde;
pub mod apply;
pub mod constants;
pub mod core;
pub mod flow;
pub mod ledger;
pub mod models;
pub mod ter;
pub mod utils;
