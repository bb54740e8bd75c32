//! General core exceptions.

use alloc::string::String;
use thiserror_no_std::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum XRPLCoreException {
    #[error("invalid classic address")]
    InvalidClassicAddress,
    #[error("unexpected payload length: expected {expected}, found {found}")]
    UnexpectedPayloadLength { expected: usize, found: usize },
    #[error("invalid currency code: {0}")]
    InvalidCurrencyCode(String),
    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

pub type XRPLCoreResult<T> = Result<T, XRPLCoreException>;
