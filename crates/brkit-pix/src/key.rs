//! # Pix Key Classification
//!
//! A Pix key is one of five registered shapes. [`PixKey::parse`] classifies
//! free-form input and applies a best-effort plausibility check:
//!
//! | Kind | Accepted input | Stored as |
//! |------|----------------|-----------|
//! | CPF | 11 digits, punctuation allowed, valid check digits | bare digits |
//! | CNPJ | 14 digits, punctuation allowed, valid check digits | bare digits |
//! | Email | conservative address shape, at most 77 characters | lowercase |
//! | Phone | `+55` followed by 10 or 11 digits | `+55...` |
//! | Random (EVP) | hyphenated UUID or 32 alphanumerics | as given |
//!
//! Classification does not contact the DICT directory; a plausible key may
//! still be unregistered.

use std::fmt;

use brkit_core::{validate, DocumentType};
use regex::Regex;
use serde::Serialize;

use crate::error::PixError;

/// Longest key the Merchant Account Information template can carry.
pub const MAX_KEY_LEN: usize = 77;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";
const PHONE_PATTERN: &str = r"^\+55\d{10,11}$";
const UUID_PATTERN: &str =
    r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$";
const RANDOM_PATTERN: &str = r"^[A-Za-z0-9]{32}$";
const DOCUMENT_PATTERN: &str = r"^[\d.\-/ ]+$";

/// Registered Pix key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyKind {
    /// Individual taxpayer number.
    Cpf,
    /// Company registry number.
    Cnpj,
    /// Email address.
    Email,
    /// Brazilian mobile number in E.164.
    Phone,
    /// Random key issued by the directory (EVP).
    Random,
}

impl fmt::Display for PixKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Random => "random",
        })
    }
}

/// A classified, plausibility-checked Pix key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PixKey {
    /// CPF digits.
    Cpf(String),
    /// CNPJ digits.
    Cnpj(String),
    /// Lowercased email address.
    Email(String),
    /// `+55` phone number.
    Phone(String),
    /// EVP random key.
    Random(String),
}

fn matches(pattern: &str, input: &str) -> Result<bool, PixError> {
    Regex::new(pattern)
        .map(|re| re.is_match(input))
        .map_err(|e| PixError::Malformed(format!("key pattern failed to compile: {e}")))
}

fn invalid(key: &str, reason: impl Into<String>) -> PixError {
    PixError::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}

impl PixKey {
    /// Classify and check `input`.
    ///
    /// # Errors
    ///
    /// [`PixError::IncompletePayload`] for an empty key;
    /// [`PixError::InvalidKey`] when the input matches no key shape or fails
    /// its shape's check (for example a CPF with wrong check digits).
    pub fn parse(input: &str) -> Result<Self, PixError> {
        let key = input.trim();
        if key.is_empty() {
            return Err(PixError::IncompletePayload { field: "key" });
        }
        if key.chars().count() > MAX_KEY_LEN {
            return Err(invalid(key, format!("longer than {MAX_KEY_LEN} characters")));
        }

        if key.starts_with('+') {
            return if matches(PHONE_PATTERN, key)? {
                Ok(Self::Phone(key.to_string()))
            } else {
                Err(invalid(key, "phone keys are +55 followed by 10 or 11 digits"))
            };
        }

        if key.contains('@') {
            return if matches(EMAIL_PATTERN, key)? {
                Ok(Self::Email(key.to_ascii_lowercase()))
            } else {
                Err(invalid(key, "not a plausible email address"))
            };
        }

        if matches(UUID_PATTERN, key)? || matches(RANDOM_PATTERN, key)? {
            return Ok(Self::Random(key.to_string()));
        }

        if matches(DOCUMENT_PATTERN, key)? {
            let digits = brkit_core::normalize_digits(key);
            let kind = match digits.len() {
                11 => DocumentType::Cpf,
                14 => DocumentType::Cnpj,
                n => return Err(invalid(key, format!("{n} digits is neither a CPF nor a CNPJ"))),
            };
            let digits = validate(&digits, kind).map_err(|e| invalid(key, e.to_string()))?;
            return Ok(match kind {
                DocumentType::Cpf => Self::Cpf(digits),
                _ => Self::Cnpj(digits),
            });
        }

        Err(invalid(key, "does not match any Pix key type"))
    }

    /// Key type.
    pub fn kind(&self) -> PixKeyKind {
        match self {
            Self::Cpf(_) => PixKeyKind::Cpf,
            Self::Cnpj(_) => PixKeyKind::Cnpj,
            Self::Email(_) => PixKeyKind::Email,
            Self::Phone(_) => PixKeyKind::Phone,
            Self::Random(_) => PixKeyKind::Random,
        }
    }

    /// Value carried in Merchant Account Information sub-tag `01`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cpf(v) | Self::Cnpj(v) | Self::Email(v) | Self::Phone(v) | Self::Random(v) => v,
        }
    }
}

impl fmt::Display for PixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PixKey {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
