//! # Derivation Errors
//!
//! Three outcome classes, kept apart on purpose:
//!
//! - [`RndError::InvariantViolation`]: a caller bug (seed length, key sizes).
//!   Never swallow it; continuing would produce a plausible but corrupt key.
//! - [`FormatError`]: malformed input, recoverable per call. A ledger scanner
//!   decides whether to skip the address.
//! - `NotMine`: not an error at all, see [`crate::domain::attributes::Ownership`].

use shared_crypto::CryptoError;
use thiserror::Error;

/// Result alias for derivation operations.
pub type RndResult<T> = Result<T, RndError>;

/// Decoding failures for paths, attributes and address payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The bytes are not valid CBOR for the expected shape
    #[error("Malformed CBOR: {0}")]
    Cbor(String),

    /// A derivation path must be an indefinite-length list
    #[error("Expected an indefinite-length list")]
    ExpectedIndefiniteList,

    /// A list or tuple had the wrong number of elements
    #[error("Invalid length: expected {expected} elements, got {actual}")]
    InvalidLength {
        /// Required element count
        expected: usize,
        /// Element count found
        actual: usize,
    },

    /// An unsigned integer does not fit the target width
    #[error("Integer {value} does not fit in {target}")]
    IntegerOutOfRange {
        /// Target type name
        target: &'static str,
        /// Decoded value
        value: u64,
    },

    /// Bytes remained after a complete value was decoded
    #[error("Leftover bytes after decoding")]
    LeftoverBytes,

    /// The attribute map has no entry for the tag
    #[error("Missing address attribute {0}")]
    MissingAttribute(u8),

    /// Attribute maps must use a definite length
    #[error("Attribute map must have a definite length")]
    NonCanonicalMap,

    /// The attribute map holds the tag more than once
    #[error("Duplicate address attribute {0}")]
    DuplicateAttribute(u8),

    /// Only public key addresses are supported
    #[error("Unsupported address type {0}: only public key addresses (0) are supported")]
    UnsupportedAddressType(u8),
}

impl From<cbor_event::Error> for FormatError {
    fn from(e: cbor_event::Error) -> Self {
        FormatError::Cbor(format!("{:?}", e))
    }
}

/// Errors from key derivation and codec operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RndError {
    /// Caller bug: input violates a precondition of the legacy format
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Index outside the range of its kind
    #[error("Index {value:#x} is not a valid {kind} index")]
    IndexOutOfRange {
        /// "hardened" or "soft"
        kind: &'static str,
        /// Rejected value
        value: u32,
    },

    /// Scan configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed encoded input
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Failure inside a cryptographic primitive
    #[error("Cryptography error: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<cbor_event::Error> for RndError {
    fn from(e: cbor_event::Error) -> Self {
        RndError::Format(e.into())
    }
}
