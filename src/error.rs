//! Unified error type for es32w-advdata.
//!
//! We avoid `alloc` - all error variants are fieldless and `Copy`.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Result type used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Codec
    /// A required payload was missing while its declared size was nonzero,
    /// or a validated field (e.g. connection interval) was out of range.
    InvalidParameter,

    /// The next AD record would overflow the output buffer.
    DataSizeExceeded,

    // Advertising sets
    /// All advertising-set slots are in use.
    NoFreeAdvSet,

    /// No advertising set exists with the given handle.
    UnknownAdvSet,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter => write!(f, "Invalid parameter"),
            Error::DataSizeExceeded => write!(f, "Advertising data size exceeded"),
            Error::NoFreeAdvSet => write!(f, "No free advertising set"),
            Error::UnknownAdvSet => write!(f, "Unknown advertising set"),
        }
    }
}
