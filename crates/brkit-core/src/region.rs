//! # CPF Fiscal Regions
//!
//! The ninth digit of a CPF (the last base digit) identifies the Receita
//! Federal fiscal region that issued it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Receita Federal fiscal region, `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FiscalRegion(u8);

const STATES: [&[&str]; 10] = [
    &["RS"],
    &["DF", "GO", "MS", "MT", "TO"],
    &["AC", "AM", "AP", "PA", "RO", "RR"],
    &["CE", "MA", "PI"],
    &["AL", "PB", "PE", "RN"],
    &["BA", "SE"],
    &["MG"],
    &["ES", "RJ"],
    &["SP"],
    &["PR", "SC"],
];

impl FiscalRegion {
    /// Region for a CPF ninth digit.
    pub fn from_digit(digit: u8) -> Option<Self> {
        (digit <= 9).then_some(Self(digit))
    }

    /// Region issuing CPFs for a two-letter state code (case-insensitive).
    pub fn from_state(uf: &str) -> Option<Self> {
        let uf = uf.trim().to_ascii_uppercase();
        STATES
            .iter()
            .position(|states| states.contains(&uf.as_str()))
            .map(|i| Self(i as u8))
    }

    /// Region encoded in an 11-digit CPF string (punctuation allowed).
    pub fn of_cpf(cpf: &str) -> Option<Self> {
        let digits = crate::digits::normalize_digits(cpf);
        if digits.len() != 11 {
            return None;
        }
        digits.as_bytes().get(8).and_then(|b| Self::from_digit(b - b'0'))
    }

    /// The ninth CPF digit for this region.
    pub fn digit(self) -> u8 {
        self.0
    }

    /// States served by this region.
    pub fn states(self) -> &'static [&'static str] {
        STATES[usize::from(self.0)]
    }
}

impl TryFrom<u8> for FiscalRegion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_digit(value).ok_or_else(|| format!("fiscal region must be 0-9, got {value}"))
    }
}

impl From<FiscalRegion> for u8 {
    fn from(region: FiscalRegion) -> Self {
        region.0
    }
}

impl fmt::Display for FiscalRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ª região ({})", self.0, self.states().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_maps_to_one_region() {
        let all: Vec<&str> = STATES.iter().flat_map(|s| s.iter().copied()).collect();
        assert_eq!(all.len(), 27);
        for uf in all {
            let region = FiscalRegion::from_state(uf).unwrap();
            assert!(region.states().contains(&uf));
        }
    }

    #[test]
    fn known_regions() {
        assert_eq!(FiscalRegion::from_state("sp").unwrap().digit(), 8);
        assert_eq!(FiscalRegion::from_state("RS").unwrap().digit(), 0);
        assert_eq!(FiscalRegion::from_state("RJ").unwrap().digit(), 7);
        assert_eq!(FiscalRegion::from_state("XX"), None);
    }

    #[test]
    fn region_of_cpf() {
        assert_eq!(FiscalRegion::of_cpf("111.444.777-35").unwrap().digit(), 7);
        assert_eq!(FiscalRegion::of_cpf("123.456.789-09").unwrap().states(), &["PR", "SC"]);
        assert_eq!(FiscalRegion::of_cpf("123"), None);
    }

    #[test]
    fn from_digit_bounds() {
        assert!(FiscalRegion::from_digit(9).is_some());
        assert!(FiscalRegion::from_digit(10).is_none());
    }

    #[test]
    fn display_lists_states() {
        assert_eq!(FiscalRegion::from_digit(5).unwrap().to_string(), "5ª região (BA, SE)");
    }

    #[test]
    fn serde_validates_range() {
        let r: FiscalRegion = serde_json::from_str("8").unwrap();
        assert_eq!(r.digit(), 8);
        assert!(serde_json::from_str::<FiscalRegion>("12").is_err());
    }
}
