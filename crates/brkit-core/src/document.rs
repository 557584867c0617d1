//! # Document Validation and Formatting
//!
//! Entry points of the check-digit engine for free-form user text:
//!
//! 1. Normalize: strip every non-digit character.
//! 2. Reject a wrong length ([`DocumentError::LengthMismatch`]).
//! 3. Reject a single repeated digit ([`DocumentError::TrivialSequence`]) for
//!    registry numbers. Boleto barcodes are exempt.
//! 4. Recompute the check digit(s) over the leading digits and compare with
//!    the trailing ones ([`DocumentError::CheckDigitMismatch`]).
//!
//! Boleto codes carry their check digits in the middle of the string, so step
//! 4 is delegated to [`crate::boleto`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::boleto;
use crate::digits::{
    compute_check_digits, digits_to_string, is_trivial_sequence, normalize_digits, parse_digits,
    CheckDigitSpec,
};
use crate::error::DocumentError;

/// Kind of document handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Cadastro de Pessoas Físicas (individual taxpayer).
    Cpf,
    /// Cadastro Nacional da Pessoa Jurídica (company).
    Cnpj,
    /// PIS/PASEP/NIT worker registry number.
    Pis,
    /// Carteira Nacional de Habilitação (driver's license registry number).
    Cnh,
    /// Payment slip barcode or typed line.
    Boleto,
}

impl DocumentType {
    /// All supported document types.
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Cpf,
        DocumentType::Cnpj,
        DocumentType::Pis,
        DocumentType::Cnh,
        DocumentType::Boleto,
    ];

    /// Accepted normalized lengths.
    pub fn lengths(self) -> &'static [usize] {
        match self {
            Self::Cpf | Self::Pis | Self::Cnh => &[11],
            Self::Cnpj => &[14],
            Self::Boleto => &[44, 47, 48],
        }
    }

    /// Number of trailing check digits for registry numbers.
    ///
    /// Boleto codes embed their digits at fixed inner positions; the general
    /// barcode digit counts as one.
    pub fn check_digit_count(self) -> usize {
        match self {
            Self::Cpf | Self::Cnpj | Self::Cnh => 2,
            Self::Pis | Self::Boleto => 1,
        }
    }

    /// The modulus-based spec for this type, if it follows the generic scheme.
    ///
    /// CNH uses a carried discount between its two digits and has no
    /// [`CheckDigitSpec`].
    pub fn spec(self) -> Option<&'static CheckDigitSpec> {
        match self {
            Self::Cpf => Some(&CheckDigitSpec::CPF),
            Self::Cnpj => Some(&CheckDigitSpec::CNPJ),
            Self::Pis => Some(&CheckDigitSpec::PIS),
            Self::Boleto => Some(&CheckDigitSpec::BOLETO),
            Self::Cnh => None,
        }
    }

    /// Compute the check digit(s) for a base-digit sequence of this type.
    ///
    /// For boleto, `base` is the 43 barcode digits other than position 5 and
    /// the result is the general check digit.
    pub fn check_digits(self, base: &[u8]) -> Vec<u8> {
        match self.spec() {
            Some(spec) => compute_check_digits(base, spec),
            None => cnh_check_digits(base).to_vec(),
        }
    }

    /// Lowercase identifier used on the command line and in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
            Self::Pis => "pis",
            Self::Cnh => "cnh",
            Self::Boleto => "boleto",
        }
    }

    fn expected_lengths(self) -> String {
        match self.lengths().split_last() {
            Some((last, head)) if !head.is_empty() => {
                let head: Vec<String> = head.iter().map(usize::to_string).collect();
                format!("{} or {last}", head.join(", "))
            }
            Some((last, _)) => last.to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Pis => "PIS/PASEP",
            Self::Cnh => "CNH",
            Self::Boleto => "boleto",
        };
        f.write_str(label)
    }
}

impl FromStr for DocumentType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpf" => Ok(Self::Cpf),
            "cnpj" => Ok(Self::Cnpj),
            "pis" | "pasep" | "nit" | "pis/pasep" => Ok(Self::Pis),
            "cnh" => Ok(Self::Cnh),
            "boleto" | "barcode" => Ok(Self::Boleto),
            _ => Err(DocumentError::UnknownDocumentType(s.to_string())),
        }
    }
}

/// CNH check digits.
///
/// First digit: weights `9..1` mod 11, a result of 10 becomes 0 and carries a
/// discount of 2. Second digit: weights `1..9` mod 11 minus the discount,
/// wrapped into `0..=10`, with 10 becoming 0.
pub(crate) fn cnh_check_digits(base: &[u8]) -> [u8; 2] {
    let weighted = |weight: fn(usize) -> u32| -> u32 {
        base.iter()
            .enumerate()
            .map(|(i, &d)| u32::from(d) * weight(i))
            .sum()
    };

    let mut first = weighted(|i| 9u32.saturating_sub(i as u32)) % 11;
    let mut discount = 0;
    if first >= 10 {
        first = 0;
        discount = 2;
    }

    let rest = weighted(|i| i as u32 + 1) % 11;
    let mut second = (rest + 11 - discount) % 11;
    if second >= 10 {
        second = 0;
    }

    [first as u8, second as u8]
}

/// Validate `input` as a document of type `kind`.
///
/// On success returns the normalized digit string.
///
/// # Errors
///
/// [`DocumentError::LengthMismatch`], [`DocumentError::TrivialSequence`],
/// [`DocumentError::CheckDigitMismatch`], or, for boleto codes,
/// [`DocumentError::StructuralError`].
pub fn validate(input: &str, kind: DocumentType) -> Result<String, DocumentError> {
    let normalized = normalize_digits(input);
    if !kind.lengths().contains(&normalized.len()) {
        return Err(DocumentError::LengthMismatch {
            kind,
            expected: kind.expected_lengths(),
            actual: normalized.len(),
        });
    }

    if kind == DocumentType::Boleto {
        boleto::validate_code(&normalized)?;
        return Ok(normalized);
    }

    // Normalization leaves only ASCII digits.
    let digits = parse_digits(&normalized).unwrap_or_default();
    if is_trivial_sequence(&digits) {
        return Err(DocumentError::TrivialSequence { kind });
    }

    let split = digits.len() - kind.check_digit_count();
    let (base, found) = digits.split_at(split);
    let expected = kind.check_digits(base);
    if expected != found {
        return Err(DocumentError::CheckDigitMismatch {
            kind,
            expected: digits_to_string(&expected),
            found: digits_to_string(found),
        });
    }

    Ok(normalized)
}

/// `true` if `input` is a valid document of type `kind`.
pub fn is_valid(input: &str, kind: DocumentType) -> bool {
    validate(input, kind).is_ok()
}

/// Outcome of a validation, shaped for display and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// Document type checked.
    pub kind: DocumentType,
    /// Input digits after normalization.
    pub normalized: String,
    /// Whether the document passed every check.
    pub valid: bool,
    /// Why the document was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DocumentError>,
}

impl Validation {
    /// Run [`validate`] and capture its outcome.
    pub fn of(input: &str, kind: DocumentType) -> Self {
        match validate(input, kind) {
            Ok(normalized) => Self {
                kind,
                normalized,
                valid: true,
                reason: None,
            },
            Err(reason) => Self {
                kind,
                normalized: normalize_digits(input),
                valid: false,
                reason: Some(reason),
            },
        }
    }
}

/// Render a document in its canonical display mask.
///
/// Only the length is checked; check digits are not verified.
///
/// | Type | Mask |
/// |------|------|
/// | CPF | `000.000.000-00` |
/// | CNPJ | `00.000.000/0000-00` |
/// | PIS | `000.00000.00-0` |
/// | CNH | `00000000000` |
/// | Boleto (44) | plain barcode |
/// | Boleto (47) | `00000.00000 00000.000000 00000.000000 0 00000000000000` |
/// | Boleto (48) | `00000000000-0 00000000000-0 00000000000-0 00000000000-0` |
///
/// # Errors
///
/// Returns [`DocumentError::LengthMismatch`] for a wrong digit count.
pub fn format(input: &str, kind: DocumentType) -> Result<String, DocumentError> {
    let d = normalize_digits(input);
    if !kind.lengths().contains(&d.len()) {
        return Err(DocumentError::LengthMismatch {
            kind,
            expected: kind.expected_lengths(),
            actual: d.len(),
        });
    }

    let formatted = match (kind, d.len()) {
        (DocumentType::Cpf, _) => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
        (DocumentType::Cnpj, _) => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        ),
        (DocumentType::Pis, _) => format!("{}.{}.{}-{}", &d[..3], &d[3..8], &d[8..10], &d[10..]),
        (DocumentType::Cnh, _) => d,
        (DocumentType::Boleto, 47) => format!(
            "{}.{} {}.{} {}.{} {} {}",
            &d[..5],
            &d[5..10],
            &d[10..15],
            &d[15..21],
            &d[21..26],
            &d[26..32],
            &d[32..33],
            &d[33..]
        ),
        (DocumentType::Boleto, 48) => (0..4)
            .map(|i| format!("{}-{}", &d[i * 12..i * 12 + 11], &d[i * 12 + 11..i * 12 + 12]))
            .collect::<Vec<_>>()
            .join(" "),
        (DocumentType::Boleto, _) => d,
    };
    Ok(formatted)
}
