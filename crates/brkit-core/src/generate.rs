//! # Valid Document Generation
//!
//! Produces syntactically valid document numbers for test data: random base
//! digits followed by their computed check digit(s). Every generated number
//! passes [`crate::document::validate`] for its type.
//!
//! The random source is injected so callers (and tests) can seed it.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::digits::{digits_to_string, is_trivial_sequence};
use crate::document::{format, DocumentType};
use crate::region::FiscalRegion;

/// Headquarters branch number used when no CNPJ branch is requested.
pub const CNPJ_HEADQUARTERS: u16 = 1;

/// Hints constraining generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Fix the ninth CPF digit to this fiscal region. Ignored for other types.
    pub region: Option<FiscalRegion>,
    /// CNPJ branch (`ordem`) number, reduced modulo 10000. Defaults to
    /// [`CNPJ_HEADQUARTERS`]. Ignored for other types.
    pub cnpj_branch: Option<u16>,
}

/// A freshly generated document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentNumber {
    /// Document type.
    pub kind: DocumentType,
    /// Bare digits.
    pub digits: String,
    /// Canonical display form.
    pub formatted: String,
}

impl DocumentNumber {
    fn new(kind: DocumentType, digits: &[u8]) -> Self {
        let digits = digits_to_string(digits);
        // Generated lengths always match the type.
        let formatted = format(&digits, kind).unwrap_or_else(|_| digits.clone());
        Self {
            kind,
            digits,
            formatted,
        }
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

fn random_digits<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<u8> {
    (0..n).map(|_| rng.gen_range(0..=9)).collect()
}

fn fixed_width(value: u64, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = (rest % 10) as u8;
        rest /= 10;
    }
    out
}

fn draw<R: Rng + ?Sized>(kind: DocumentType, opts: &GenerateOptions, rng: &mut R) -> Vec<u8> {
    match kind {
        DocumentType::Cpf => {
            let mut base = random_digits(rng, 9);
            if let Some(region) = opts.region {
                base[8] = region.digit();
            }
            with_check_digits(kind, base)
        }
        DocumentType::Cnpj => {
            let mut base = random_digits(rng, 8);
            let branch = opts.cnpj_branch.unwrap_or(CNPJ_HEADQUARTERS) % 10_000;
            base.extend(fixed_width(u64::from(branch), 4));
            with_check_digits(kind, base)
        }
        DocumentType::Pis => with_check_digits(kind, random_digits(rng, 10)),
        DocumentType::Cnh => with_check_digits(kind, random_digits(rng, 9)),
        DocumentType::Boleto => {
            // A leading 8 marks a convênio slip.
            let mut base = vec![rng.gen_range(0..=7)];
            base.extend(random_digits(rng, 2));
            base.push(9);
            base.extend(fixed_width(rng.gen_range(1000..=9999), 4));
            base.extend(fixed_width(rng.gen_range(1..=99_999_999), 10));
            base.extend(random_digits(rng, 25));
            let dv = kind.check_digits(&base);
            base.splice(4..4, dv);
            base
        }
    }
}

fn with_check_digits(kind: DocumentType, mut base: Vec<u8>) -> Vec<u8> {
    let dv = kind.check_digits(&base);
    base.extend(dv);
    base
}

/// Generate a valid document number using `rng`.
///
/// Draws that produce a single repeated digit are discarded and redrawn.
/// Boleto generation yields a 44-digit bank barcode in BRL.
pub fn generate_valid_with<R: Rng + ?Sized>(
    kind: DocumentType,
    opts: &GenerateOptions,
    rng: &mut R,
) -> DocumentNumber {
    loop {
        let digits = draw(kind, opts, rng);
        if kind == DocumentType::Boleto || !is_trivial_sequence(&digits) {
            return DocumentNumber::new(kind, &digits);
        }
        tracing::debug!(%kind, "redrawing trivial sequence");
    }
}

/// Generate a valid document number with the thread-local RNG.
pub fn generate_valid(kind: DocumentType, opts: &GenerateOptions) -> DocumentNumber {
    generate_valid_with(kind, opts, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{is_valid, validate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_documents_validate() {
        let mut rng = StdRng::seed_from_u64(7);
        for kind in DocumentType::ALL {
            for _ in 0..200 {
                let doc = generate_valid_with(kind, &GenerateOptions::default(), &mut rng);
                assert_eq!(validate(&doc.digits, kind), Ok(doc.digits.clone()), "{doc:?}");
                assert!(is_valid(&doc.formatted, kind));
            }
        }
    }

    #[test]
    fn region_hint_fixes_ninth_digit() {
        let mut rng = StdRng::seed_from_u64(11);
        let sp = FiscalRegion::from_state("SP").unwrap();
        let opts = GenerateOptions {
            region: Some(sp),
            ..GenerateOptions::default()
        };
        for _ in 0..50 {
            let doc = generate_valid_with(DocumentType::Cpf, &opts, &mut rng);
            assert_eq!(&doc.digits[8..9], "8");
            assert_eq!(FiscalRegion::of_cpf(&doc.digits), Some(sp));
        }
    }

    #[test]
    fn cnpj_branch_defaults_to_headquarters() {
        let mut rng = StdRng::seed_from_u64(3);
        let doc = generate_valid_with(DocumentType::Cnpj, &GenerateOptions::default(), &mut rng);
        assert_eq!(&doc.digits[8..12], "0001");

        let opts = GenerateOptions {
            cnpj_branch: Some(42),
            ..GenerateOptions::default()
        };
        let doc = generate_valid_with(DocumentType::Cnpj, &opts, &mut rng);
        assert_eq!(&doc.digits[8..12], "0042");
        assert!(doc.formatted.contains("/0042-"));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_valid_with(
            DocumentType::Cpf,
            &GenerateOptions::default(),
            &mut StdRng::seed_from_u64(99),
        );
        let b = generate_valid_with(
            DocumentType::Cpf,
            &GenerateOptions::default(),
            &mut StdRng::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn boleto_generation_decodes() {
        let mut rng = StdRng::seed_from_u64(5);
        let doc = generate_valid_with(DocumentType::Boleto, &GenerateOptions::default(), &mut rng);
        assert_eq!(doc.digits.len(), 44);
        let fields = crate::boleto::decode_boleto(&doc.digits).unwrap();
        assert_eq!(fields.currency_code, 9);
        assert!(fields.due_date.is_some());
    }

    #[test]
    fn display_uses_mask() {
        let doc = generate_valid(DocumentType::Cpf, &GenerateOptions::default());
        let shown = doc.to_string();
        assert_eq!(shown.len(), 14);
        assert_eq!(&shown[3..4], ".");
        assert_eq!(&shown[11..12], "-");
    }

    #[test]
    fn fixed_width_pads_left() {
        assert_eq!(fixed_width(42, 4), vec![0, 0, 4, 2]);
        assert_eq!(fixed_width(0, 2), vec![0, 0]);
    }
}
