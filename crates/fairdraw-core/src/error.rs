//! Error types shared by every generator operation.

use std::io;

use thiserror::Error;

/// Errors returned by generator, sampler and selection operations.
///
/// Parameter errors are detected before any entropy is read. Source failures
/// carry the underlying I/O error unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// A probability, shape, rate, weight set or size is outside its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A bounded draw was requested with an upper bound of zero.
    #[error("bound must be > 0")]
    InvalidBound,

    /// An inclusive range had `min > max`.
    #[error("invalid range: min {min} > max {max}")]
    InvalidRange { min: i64, max: i64 },

    /// The drawn value cannot be represented in the requested integer width.
    #[error("result out of range for target type")]
    ResultOutOfRange,

    /// The entropy source failed to fill a buffer.
    #[error("entropy source failure: {0}")]
    EntropySource(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }

    /// True for the parameter-validation variants (no entropy was consumed).
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter(_) | Error::InvalidBound | Error::InvalidRange { .. }
        )
    }
}

/// Result type for fairdraw operations.
pub type Result<T> = std::result::Result<T, Error>;
