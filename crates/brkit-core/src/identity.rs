//! # Validated Document Newtypes
//!
//! [`Cpf`], [`Cnpj`], [`Pis`] and [`Cnh`] can only be constructed from a
//! number whose check digits verify. They store the canonical digit string
//! and render the display mask through `Display`.
//!
//! Deserialization runs the same validation as `new()`, so an invalid number
//! inside a JSON or YAML document is rejected at parse time instead of
//! travelling further as a bare string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{format, validate, DocumentType};
use crate::error::DocumentError;
use crate::region::FiscalRegion;

/// Implement `Deserialize` for a newtype by routing through its `new()`.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Shared constructor, accessors and trait impls for a document newtype.
macro_rules! document_newtype {
    ($ty:ident, $kind:expr) => {
        impl_validating_deserialize!($ty);

        impl $ty {
            /// Document type held by this newtype.
            pub const KIND: DocumentType = $kind;

            /// Validate and store the canonical digits.
            ///
            /// Punctuation and whitespace are ignored.
            ///
            /// # Errors
            ///
            /// Any [`DocumentError`] reported by [`validate`].
            pub fn new(value: impl AsRef<str>) -> Result<Self, DocumentError> {
                validate(value.as_ref(), Self::KIND).map(Self)
            }

            /// Canonical digits without punctuation.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Display mask.
            pub fn formatted(&self) -> String {
                // Length was checked on construction.
                format(&self.0, Self::KIND).unwrap_or_else(|_| self.0.clone())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.formatted())
            }
        }

        impl FromStr for $ty {
            type Err = DocumentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Individual taxpayer number (`000.000.000-00`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cpf(String);

document_newtype!(Cpf, DocumentType::Cpf);

impl Cpf {
    /// Fiscal region that issued this CPF.
    pub fn region(&self) -> Option<FiscalRegion> {
        FiscalRegion::of_cpf(&self.0)
    }
}

/// Company registry number (`00.000.000/0000-00`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cnpj(String);

document_newtype!(Cnpj, DocumentType::Cnpj);

impl Cnpj {
    /// Eight-digit company root shared by every branch.
    pub fn root(&self) -> &str {
        &self.0[..8]
    }

    /// Four-digit branch number; `0001` is the headquarters.
    pub fn branch(&self) -> &str {
        &self.0[8..12]
    }

    /// `true` for the headquarters establishment.
    pub fn is_headquarters(&self) -> bool {
        self.branch() == "0001"
    }
}

/// PIS/PASEP/NIT worker registry number (`000.00000.00-0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pis(String);

document_newtype!(Pis, DocumentType::Pis);

/// Driver's license registry number (eleven plain digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cnh(String);

document_newtype!(Cnh, DocumentType::Cnh);
