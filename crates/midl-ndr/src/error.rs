//! NDR error types

use thiserror::Error;

/// NDR encoding/decoding errors
///
/// Every variant is fatal to the operation being marshaled; callers never
/// resume a decode after an error.
#[derive(Debug, Error)]
pub enum NdrError {
    /// Buffer underflow - not enough data
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    /// A conformant count announced more elements than bytes remain
    #[error("buffer overflow for size {count}: only {remaining} bytes remain")]
    SizeExceedsInput { count: usize, remaining: usize },

    /// Array length does not agree with its size_is count
    #[error("array size mismatch: expected {expected}, got {got}")]
    ArraySizeMismatch { expected: usize, got: usize },

    /// Conformance mismatch
    #[error("conformance mismatch: max_count={max_count}, actual_count={actual_count}")]
    ConformanceMismatch { max_count: u32, actual_count: u32 },

    /// Invalid discriminant for union
    #[error("invalid union discriminant: {0}")]
    InvalidDiscriminant(i32),

    /// Invalid string - not null terminated or invalid encoding
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// A field violates its declared range
    #[error("{field} is out of range: {value} > {max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A length does not fit the wire integer type
    #[error("integer overflow")]
    IntegerOverflow,

    /// UTF-16 decoding error
    #[error("UTF-16 error: {0}")]
    Utf16Error(#[from] std::char::DecodeUtf16Error),
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
