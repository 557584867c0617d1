//! # Error Types
//!
//! [`PixError`] covers both directions: building a payload from form fields
//! and parsing a payload back. Encoding never emits a partial string; any
//! failure is reported before the CRC is appended.

use thiserror::Error;

/// Failure while encoding or decoding a BR Code payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    /// A required field is missing or empty after normalization.
    #[error("incomplete payload: {field} is required")]
    IncompletePayload {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The Pix key does not look like any of the registered key types.
    #[error("invalid Pix key {key:?}: {reason}")]
    InvalidKey {
        /// Key as supplied.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A TLV value does not fit the two-digit length prefix or its field cap.
    #[error("tag {tag} value too long ({len} characters)")]
    FieldTooLong {
        /// Tag (or nested tag path) of the field.
        tag: String,
        /// Length of the offending value.
        len: usize,
    },

    /// The amount is not a decimal with at most two fraction digits.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A payload being parsed is not well-formed TLV, or a field value is
    /// outside its allowed alphabet.
    #[error("malformed BR Code: {0}")]
    Malformed(String),

    /// The trailing checksum does not match the payload.
    #[error("CRC mismatch: expected {expected}, found {found}")]
    CrcMismatch {
        /// Checksum recomputed over the payload.
        expected: String,
        /// Checksum present in the payload.
        found: String,
    },
}
