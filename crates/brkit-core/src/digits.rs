//! # Check-Digit Specifications
//!
//! A [`CheckDigitSpec`] captures everything needed to compute the check
//! digit(s) of a document: a weight cycle, a modulus, and a rule mapping the
//! remainder to a digit. Every Brazilian modulus-11 scheme handled here uses
//! weights that ascend from `2` while reading the base digits right-to-left,
//! wrapping at a scheme-specific ceiling:
//!
//! | Scheme | Cycle | Left-to-right weights (first digit) |
//! |--------|-------|-------------------------------------|
//! | CPF | `2..=11` | `10,9,8,7,6,5,4,3,2` |
//! | CNPJ | `2..=9` | `5,4,3,2,9,8,7,6,5,4,3,2` |
//! | PIS/PASEP | `2..=9` | `3,2,9,8,7,6,5,4,3,2` |
//! | Boleto | `2..=9` | `4,3,2,9,8,7,6,5,...` over 43 digits |
//!
//! Modulus 10 (FEBRABAN typed-line fields) alternates weights `2,1` from the
//! right and reduces each product to the sum of its digits before summing.
//!
//! ## Remainder Rules
//!
//! CPF, CNPJ and PIS map a remainder below 2 to `0`; the boleto general check
//! digit maps it to `1`. Both rules come from the respective official
//! specifications and are kept distinct.

use serde::Serialize;

/// Modulus used when reducing the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Modulus {
    /// Modulus 10 with digit-sum reduction of each product.
    Ten,
    /// Plain modulus 11.
    Eleven,
}

impl Modulus {
    fn value(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Eleven => 11,
        }
    }
}

/// Mapping from the weighted-sum remainder to a check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RemainderRule {
    /// `r < 2 → 0`, else `11 − r` (CPF, CNPJ, PIS, convênio modulus 11).
    ZeroBelowTwo,
    /// `r < 2 → 1`, else `11 − r` (boleto general check digit).
    OneBelowTwo,
    /// `(10 − r) mod 10` (FEBRABAN modulus 10).
    TensComplement,
}

impl RemainderRule {
    fn apply(self, remainder: u32) -> u8 {
        let digit = match self {
            Self::ZeroBelowTwo if remainder < 2 => 0,
            Self::OneBelowTwo if remainder < 2 => 1,
            Self::ZeroBelowTwo | Self::OneBelowTwo => 11 - remainder,
            Self::TensComplement => (10 - remainder) % 10,
        };
        // 11 − r for r ≥ 2 is at most 9.
        digit as u8
    }
}

/// Immutable description of a check-digit scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckDigitSpec {
    /// Modulus applied to the weighted sum.
    pub modulus: Modulus,
    /// Weight cycle applied right-to-left over the digits.
    pub weights: &'static [u32],
    /// Remainder-to-digit mapping.
    pub rule: RemainderRule,
    /// Number of check digits produced; each one is computed over the base
    /// digits plus every check digit before it.
    pub count: usize,
}

const ASCENDING_TO_NINE: &[u32] = &[2, 3, 4, 5, 6, 7, 8, 9];

impl CheckDigitSpec {
    /// CPF: two modulus-11 digits, weights `2..=11` right-to-left.
    pub const CPF: Self = Self {
        modulus: Modulus::Eleven,
        weights: &[2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        rule: RemainderRule::ZeroBelowTwo,
        count: 2,
    };

    /// CNPJ: two modulus-11 digits, weights cycling `2..=9` right-to-left.
    pub const CNPJ: Self = Self {
        modulus: Modulus::Eleven,
        weights: ASCENDING_TO_NINE,
        rule: RemainderRule::ZeroBelowTwo,
        count: 2,
    };

    /// PIS/PASEP/NIT: one modulus-11 digit over ten base digits.
    pub const PIS: Self = Self {
        modulus: Modulus::Eleven,
        weights: ASCENDING_TO_NINE,
        rule: RemainderRule::ZeroBelowTwo,
        count: 1,
    };

    /// Bank boleto general check digit over the 43 other barcode digits.
    pub const BOLETO: Self = Self {
        modulus: Modulus::Eleven,
        weights: ASCENDING_TO_NINE,
        rule: RemainderRule::OneBelowTwo,
        count: 1,
    };

    /// Convênio barcode with value indicator 8 or 9.
    pub const CONVENIO_MOD11: Self = Self {
        modulus: Modulus::Eleven,
        weights: ASCENDING_TO_NINE,
        rule: RemainderRule::ZeroBelowTwo,
        count: 1,
    };

    /// FEBRABAN modulus 10: typed-line fields and convênio indicators 6 and 7.
    pub const MOD10: Self = Self {
        modulus: Modulus::Ten,
        weights: &[2, 1],
        rule: RemainderRule::TensComplement,
        count: 1,
    };

    /// Left-to-right weights this spec applies to a run of `len` digits.
    pub fn weights_for(&self, len: usize) -> Vec<u32> {
        (0..len)
            .rev()
            .map(|pos_from_right| self.weights[pos_from_right % self.weights.len()])
            .collect()
    }

    fn single_digit(&self, digits: &[u8]) -> u8 {
        let sum: u32 = digits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| {
                let product = u32::from(d) * self.weights[i % self.weights.len()];
                match self.modulus {
                    Modulus::Ten => product / 10 + product % 10,
                    Modulus::Eleven => product,
                }
            })
            .sum();
        self.rule.apply(sum % self.modulus.value())
    }
}

/// Compute the check digit(s) for `base` under `spec`.
///
/// Pure and total: any slice of values `0..=9` yields exactly `spec.count`
/// digits. Values above 9 are not meaningful but do not panic.
pub fn compute_check_digits(base: &[u8], spec: &CheckDigitSpec) -> Vec<u8> {
    let mut working = base.to_vec();
    let mut out = Vec::with_capacity(spec.count);
    for _ in 0..spec.count {
        let digit = spec.single_digit(&working);
        working.push(digit);
        out.push(digit);
    }
    out
}

/// Strip every character that is not an ASCII digit.
pub fn normalize_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Convert an all-digit string into digit values.
///
/// Returns `None` if any character is not an ASCII digit.
pub fn parse_digits(s: &str) -> Option<Vec<u8>> {
    s.bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

/// Render digit values as a string.
pub fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

/// `true` if every digit is the same (and there is at least one).
pub fn is_trivial_sequence(digits: &[u8]) -> bool {
    match digits.split_first() {
        Some((first, rest)) => rest.iter().all(|d| d == first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Vec<u8> {
        parse_digits(s).unwrap()
    }

    #[test]
    fn cpf_known_vector() {
        assert_eq!(compute_check_digits(&d("111444777"), &CheckDigitSpec::CPF), vec![3, 5]);
        assert_eq!(compute_check_digits(&d("123456789"), &CheckDigitSpec::CPF), vec![0, 9]);
    }

    #[test]
    fn cnpj_known_vector() {
        assert_eq!(
            compute_check_digits(&d("112223330001"), &CheckDigitSpec::CNPJ),
            vec![8, 1]
        );
    }

    #[test]
    fn cnpj_weight_vectors_match_official_tables() {
        assert_eq!(
            CheckDigitSpec::CNPJ.weights_for(12),
            vec![5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]
        );
        assert_eq!(
            CheckDigitSpec::CNPJ.weights_for(13),
            vec![6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]
        );
    }

    #[test]
    fn cpf_and_pis_weight_vectors() {
        assert_eq!(CheckDigitSpec::CPF.weights_for(9), vec![10, 9, 8, 7, 6, 5, 4, 3, 2]);
        assert_eq!(CheckDigitSpec::CPF.weights_for(10), vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
        assert_eq!(CheckDigitSpec::PIS.weights_for(10), vec![3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    }

    #[test]
    fn boleto_weights_start_at_four_over_43_digits() {
        let w = CheckDigitSpec::BOLETO.weights_for(43);
        assert_eq!(&w[..8], &[4, 3, 2, 9, 8, 7, 6, 5]);
        assert_eq!(*w.last().unwrap(), 2);
    }

    #[test]
    fn pis_known_vectors() {
        assert_eq!(compute_check_digits(&d("1204567890"), &CheckDigitSpec::PIS), vec![5]);
        assert_eq!(compute_check_digits(&d("1000000000"), &CheckDigitSpec::PIS), vec![8]);
    }

    #[test]
    fn remainder_rules_differ_below_two() {
        assert_eq!(RemainderRule::ZeroBelowTwo.apply(0), 0);
        assert_eq!(RemainderRule::ZeroBelowTwo.apply(1), 0);
        assert_eq!(RemainderRule::OneBelowTwo.apply(0), 1);
        assert_eq!(RemainderRule::OneBelowTwo.apply(1), 1);
        assert_eq!(RemainderRule::OneBelowTwo.apply(2), 9);
        assert_eq!(RemainderRule::ZeroBelowTwo.apply(10), 1);
    }

    #[test]
    fn mod10_febraban_field() {
        // First field of typed line 00190.50095: base 001905009 → 5.
        assert_eq!(compute_check_digits(&d("001905009"), &CheckDigitSpec::MOD10), vec![5]);
        assert_eq!(compute_check_digits(&d("4014481606"), &CheckDigitSpec::MOD10), vec![9]);
    }

    #[test]
    fn tens_complement_of_zero_is_zero() {
        assert_eq!(compute_check_digits(&d("0000"), &CheckDigitSpec::MOD10), vec![0]);
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize_digits("111.444.777-35"), "11144477735");
        assert_eq!(normalize_digits(" 11.222.333/0001-81 "), "11222333000181");
        assert_eq!(normalize_digits("abc"), "");
    }

    #[test]
    fn parse_digits_rejects_non_digits() {
        assert!(parse_digits("12a").is_none());
        assert_eq!(parse_digits("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn trivial_sequence_detection() {
        assert!(is_trivial_sequence(&d("00000000000")));
        assert!(is_trivial_sequence(&d("7")));
        assert!(!is_trivial_sequence(&d("11111111112")));
        assert!(!is_trivial_sequence(&[]));
    }

    #[test]
    fn digits_to_string_roundtrip() {
        assert_eq!(digits_to_string(&d("0123456789")), "0123456789");
    }
}
