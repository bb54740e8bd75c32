use thiserror_no_std::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum XRPLAmountException {
    #[error("native and issued amounts cannot mix")]
    KindMismatch,
    #[error("issued amounts have different issues")]
    IssueMismatch,
    #[error("drops arithmetic overflow")]
    DropsOverflow,
    #[error("issued value exponent out of range")]
    ValueOverflow,
    #[error("amount must not be negative here")]
    Negative,
}

pub type XRPLAmountResult<T> = Result<T, XRPLAmountException>;
