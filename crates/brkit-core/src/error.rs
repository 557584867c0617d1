//! # Error Types
//!
//! Every expected failure of the check-digit engine is a variant of
//! [`DocumentError`]. Invalid user input is an ordinary return value, not a
//! panic, so callers can surface the reason next to the offending field.

use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentType;

/// Reason a document number was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum DocumentError {
    /// The normalized digit string has the wrong length for its type.
    #[error("{kind} must have {expected} digits, got {actual}")]
    LengthMismatch {
        /// Document type being validated.
        kind: DocumentType,
        /// Accepted length(s), rendered for display (e.g. `"44, 47 or 48"`).
        expected: String,
        /// Length after stripping non-digits.
        actual: usize,
    },

    /// Every digit is identical (`00000000000`, `11111111111`, ...).
    #[error("{kind} made of a single repeated digit is not a valid number")]
    TrivialSequence {
        /// Document type being validated.
        kind: DocumentType,
    },

    /// The trailing check digit(s) do not match the recomputed ones.
    #[error("{kind} check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch {
        /// Document type being validated.
        kind: DocumentType,
        /// Check digit(s) recomputed from the base digits.
        expected: String,
        /// Check digit(s) present in the input.
        found: String,
    },

    /// A boleto barcode or typed line is structurally unusable.
    #[error("boleto structural error: {0}")]
    StructuralError(String),

    /// A document type name could not be resolved.
    #[error("unknown document type: {0:?}")]
    UnknownDocumentType(String),
}

impl DocumentError {
    /// Short machine-readable name of the failure, stable across releases.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "LengthMismatch",
            Self::TrivialSequence { .. } => "TrivialSequence",
            Self::CheckDigitMismatch { .. } => "CheckDigitMismatch",
            Self::StructuralError(_) => "StructuralError",
            Self::UnknownDocumentType(_) => "UnknownDocumentType",
        }
    }
}
