//! Error taxonomy shared by every codec in the crate.
//!
//! None of these interrupt control flow on their own: decoders hand back a
//! sentinel plus an explicit flag or `Result`, and the validation layer
//! collapses any of them into a single "invalid" outcome.

use thiserror::Error;

/// Consensus codec errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Compact bits carry the sign flag or expand past 256 bits.
    #[error("compact target is negative or overflows 256 bits")]
    Overflow,
    /// A byte stream ran out before the structure was fully read.
    #[error("insufficient data in byte stream")]
    InsufficientData,
    /// A script number carries padding that does not flip the sign.
    #[error("script number is not minimally encoded")]
    NonMinimalEncoding,
    /// A script number is wider than the permitted width.
    #[error("script number of {size} bytes exceeds the {max} byte limit")]
    SizeExceeded { size: usize, max: usize },
    /// Strict boolean bytes other than empty or `0x01`.
    #[error("non-canonical boolean encoding")]
    InvalidBoolean,
    /// A display-order hash string is not 64 hex characters.
    #[error("invalid hash hex")]
    InvalidHash,
}

/// Result alias for consensus codec operations.
pub type Result<T> = core::result::Result<T, Error>;
