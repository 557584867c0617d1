//! # Boleto Barcodes and Typed Lines
//!
//! Decoding and check-digit verification for Brazilian payment slips, per the
//! FEBRABAN layouts.
//!
//! ## Bank Boleto (barcode not starting with `8`)
//!
//! | Barcode positions | Content |
//! |-------------------|---------|
//! | 1–3 | Bank code |
//! | 4 | Currency code (`9` = BRL) |
//! | 5 | General check digit (mod 11, `r < 2 → 1`) |
//! | 6–9 | Due-date factor (days since 1997-10-07, `0000` = none) |
//! | 10–19 | Value in cents |
//! | 20–44 | Free field (bank-defined) |
//!
//! The 47-digit typed line rearranges the barcode into three fields carrying
//! their own modulus-10 digits, followed by the general digit and the
//! factor/value block.
//!
//! ## Convênio (barcode starting with `8`)
//!
//! Utility and tax slips. Position 2 is the segment, position 3 the value
//! indicator selecting modulus 10 (`6`, `7`) or modulus 11 (`8`, `9`), and
//! position 4 the general check digit. The 48-digit typed line is four blocks
//! of eleven barcode digits, each followed by its own check digit under the
//! same modulus.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::digits::{
    compute_check_digits, digits_to_string, normalize_digits, parse_digits, CheckDigitSpec,
};
use crate::document::DocumentType;
use crate::error::DocumentError;

/// Base date of the due-date factor.
pub const DUE_DATE_EPOCH: (i32, u32, u32) = (1997, 10, 7);

const BARCODE_LEN: usize = 44;
const BANK_LINE_LEN: usize = 47;
const CONVENIO_LINE_LEN: usize = 48;

/// Fields decoded from a bank boleto barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoletoFields {
    /// Canonical 44-digit barcode.
    pub barcode: String,
    /// Issuing bank (3 digits).
    pub bank_code: String,
    /// Currency code (`9` for BRL).
    pub currency_code: u8,
    /// General check digit (barcode position 5).
    pub check_digit: u8,
    /// Days since 1997-10-07; `0` means no due date.
    pub due_date_factor: u16,
    /// Calendar due date, absent when the factor is `0`.
    pub due_date: Option<NaiveDate>,
    /// Value in cents.
    pub amount_cents: u64,
    /// Value as a decimal string with two fraction digits.
    pub amount: String,
    /// Bank-defined free field (barcode positions 20–44).
    pub free_field: String,
}

/// Convênio segment (barcode position 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvenioSegment {
    /// Prefeituras.
    Municipal,
    /// Saneamento.
    Sanitation,
    /// Energia elétrica e gás.
    EnergyAndGas,
    /// Telecomunicações.
    Telecommunications,
    /// Órgãos governamentais.
    Government,
    /// Carnês e assemelhados, identified by CNPJ.
    Carnet,
    /// Multas de trânsito.
    TrafficFines,
    /// Uso exclusivo do banco.
    BankOnly,
}

impl ConvenioSegment {
    /// Resolve the segment digit.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Municipal),
            2 => Some(Self::Sanitation),
            3 => Some(Self::EnergyAndGas),
            4 => Some(Self::Telecommunications),
            5 => Some(Self::Government),
            6 => Some(Self::Carnet),
            7 => Some(Self::TrafficFines),
            9 => Some(Self::BankOnly),
            _ => None,
        }
    }

    /// Segment name as printed on FEBRABAN material.
    pub fn name(self) -> &'static str {
        match self {
            Self::Municipal => "Prefeituras",
            Self::Sanitation => "Saneamento",
            Self::EnergyAndGas => "Energia elétrica e gás",
            Self::Telecommunications => "Telecomunicações",
            Self::Government => "Órgãos governamentais",
            Self::Carnet => "Carnês e assemelhados",
            Self::TrafficFines => "Multas de trânsito",
            Self::BankOnly => "Uso exclusivo do banco",
        }
    }
}

/// Convênio value indicator (barcode position 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueIndicator {
    /// `6`: effective value in BRL, modulus 10.
    EffectiveMod10,
    /// `7`: reference quantity, modulus 10.
    ReferenceMod10,
    /// `8`: effective value in BRL, modulus 11.
    EffectiveMod11,
    /// `9`: reference quantity, modulus 11.
    ReferenceMod11,
}

impl ValueIndicator {
    /// Resolve the indicator digit.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            6 => Some(Self::EffectiveMod10),
            7 => Some(Self::ReferenceMod10),
            8 => Some(Self::EffectiveMod11),
            9 => Some(Self::ReferenceMod11),
            _ => None,
        }
    }

    /// Check-digit spec shared by the general digit and the typed-line blocks.
    pub fn spec(self) -> &'static CheckDigitSpec {
        match self {
            Self::EffectiveMod10 | Self::ReferenceMod10 => &CheckDigitSpec::MOD10,
            Self::EffectiveMod11 | Self::ReferenceMod11 => &CheckDigitSpec::CONVENIO_MOD11,
        }
    }

    /// Whether the value field is an amount in cents.
    pub fn is_effective(self) -> bool {
        matches!(self, Self::EffectiveMod10 | Self::EffectiveMod11)
    }
}

/// Fields decoded from a convênio barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvenioFields {
    /// Canonical 44-digit barcode.
    pub barcode: String,
    /// Segment identification.
    pub segment: ConvenioSegment,
    /// Human-readable segment name.
    pub segment_name: &'static str,
    /// How to read the value field.
    pub value_indicator: ValueIndicator,
    /// General check digit (barcode position 4).
    pub check_digit: u8,
    /// Value in cents when the indicator marks an effective value.
    pub amount_cents: Option<u64>,
    /// Company or agency identification (barcode positions 16–19).
    pub company_id: String,
    /// Company-defined free field (barcode positions 20–44).
    pub free_field: String,
}

fn structural(msg: impl Into<String>) -> DocumentError {
    DocumentError::StructuralError(msg.into())
}

fn mismatch(expected: u8, found: u8) -> DocumentError {
    DocumentError::CheckDigitMismatch {
        kind: DocumentType::Boleto,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Normalize and split into digits, requiring one of `lengths`.
fn digits_of(input: &str, lengths: &[usize]) -> Result<(String, Vec<u8>), DocumentError> {
    let normalized = normalize_digits(input);
    if !lengths.contains(&normalized.len()) {
        let expected: Vec<String> = lengths.iter().map(usize::to_string).collect();
        return Err(structural(format!(
            "expected {} digits, got {}",
            expected.join(" or "),
            normalized.len()
        )));
    }
    let digits = parse_digits(&normalized).unwrap_or_default();
    Ok((normalized, digits))
}

fn is_convenio(digits: &[u8]) -> bool {
    digits.first() == Some(&8)
}

fn single(spec: &CheckDigitSpec, digits: &[u8]) -> u8 {
    compute_check_digits(digits, spec).first().copied().unwrap_or_default()
}

fn check_bank_barcode(digits: &[u8]) -> Result<(), DocumentError> {
    let base: Vec<u8> = digits[..4].iter().chain(&digits[5..]).copied().collect();
    let expected = single(&CheckDigitSpec::BOLETO, &base);
    if expected != digits[4] {
        return Err(mismatch(expected, digits[4]));
    }
    Ok(())
}

fn convenio_indicator(digits: &[u8]) -> Result<ValueIndicator, DocumentError> {
    ValueIndicator::from_digit(digits[2])
        .ok_or_else(|| structural(format!("invalid convênio value indicator {}", digits[2])))
}

fn check_convenio_barcode(digits: &[u8]) -> Result<ValueIndicator, DocumentError> {
    let indicator = convenio_indicator(digits)?;
    let base: Vec<u8> = digits[..3].iter().chain(&digits[4..]).copied().collect();
    let expected = single(indicator.spec(), &base);
    if expected != digits[3] {
        return Err(mismatch(expected, digits[3]));
    }
    Ok(indicator)
}

/// Verify a normalized 44, 47 or 48-digit code.
pub(crate) fn validate_code(normalized: &str) -> Result<(), DocumentError> {
    match normalized.len() {
        BARCODE_LEN => {
            let (_, digits) = digits_of(normalized, &[BARCODE_LEN])?;
            if is_convenio(&digits) {
                check_convenio_barcode(&digits).map(|_| ())
            } else {
                check_bank_barcode(&digits)
            }
        }
        _ => barcode_from_typed_line(normalized).map(|_| ()),
    }
}

/// Convert a typed line into its 44-digit barcode.
///
/// Accepts a 47-digit bank line or a 48-digit convênio line. Every field
/// check digit is verified, and so is the general digit of the result.
///
/// # Errors
///
/// [`DocumentError::StructuralError`] for a wrong length, a bank line
/// starting with `8`, or an unusable convênio indicator; [`DocumentError::CheckDigitMismatch`] for a wrong
/// field or general digit.
pub fn barcode_from_typed_line(line: &str) -> Result<String, DocumentError> {
    let (_, d) = digits_of(line, &[BANK_LINE_LEN, CONVENIO_LINE_LEN])?;

    let barcode: Vec<u8> = if d.len() == CONVENIO_LINE_LEN {
        if !is_convenio(&d) {
            return Err(structural("48-digit typed line must start with 8"));
        }
        let spec = convenio_indicator(&d)?.spec();
        let mut barcode = Vec::with_capacity(BARCODE_LEN);
        for block in d.chunks(12) {
            let (data, dv) = block.split_at(11);
            let expected = single(spec, data);
            if expected != dv[0] {
                return Err(mismatch(expected, dv[0]));
            }
            barcode.extend_from_slice(data);
        }
        check_convenio_barcode(&barcode)?;
        barcode
    } else {
        if is_convenio(&d) {
            return Err(structural("47-digit bank typed line cannot start with 8"));
        }
        for (data, dv) in [(0..9, 9), (10..20, 20), (21..31, 31)] {
            let expected = single(&CheckDigitSpec::MOD10, &d[data]);
            if expected != d[dv] {
                return Err(mismatch(expected, d[dv]));
            }
        }
        let barcode: Vec<u8> = d[..4]
            .iter()
            .chain(&d[32..33])
            .chain(&d[33..47])
            .chain(&d[4..9])
            .chain(&d[10..20])
            .chain(&d[21..31])
            .copied()
            .collect();
        check_bank_barcode(&barcode)?;
        barcode
    };

    Ok(digits_to_string(&barcode))
}

/// Convert a 44-digit barcode into its typed line (47 or 48 digits).
///
/// The barcode's general check digit is verified first.
///
/// # Errors
///
/// [`DocumentError::StructuralError`] for a wrong length;
/// [`DocumentError::CheckDigitMismatch`] for a wrong general digit.
pub fn typed_line_from_barcode(barcode: &str) -> Result<String, DocumentError> {
    let (_, d) = digits_of(barcode, &[BARCODE_LEN])?;

    let mut line = Vec::with_capacity(CONVENIO_LINE_LEN);
    if is_convenio(&d) {
        let spec = check_convenio_barcode(&d)?.spec();
        for block in d.chunks(11) {
            line.extend_from_slice(block);
            line.push(single(spec, block));
        }
    } else {
        check_bank_barcode(&d)?;
        let first: Vec<u8> = d[..4].iter().chain(&d[19..24]).copied().collect();
        for field in [&first[..], &d[24..34], &d[34..44]] {
            line.extend_from_slice(field);
            line.push(single(&CheckDigitSpec::MOD10, field));
        }
        line.push(d[4]);
        line.extend_from_slice(&d[5..19]);
    }

    Ok(digits_to_string(&line))
}

fn number(digits: &[u8]) -> u64 {
    digits.iter().fold(0, |acc, &d| acc * 10 + u64::from(d))
}

/// Render cents as a decimal string with two fraction digits.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Calendar date for a due-date factor; `0` means no due date.
pub fn due_date_from_factor(factor: u16) -> Option<NaiveDate> {
    if factor == 0 {
        return None;
    }
    let (y, m, d) = DUE_DATE_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(u64::from(factor)))
}

/// Decode a bank boleto from its 44-digit barcode or 47-digit typed line.
///
/// # Errors
///
/// [`DocumentError::StructuralError`] for any other length or for a convênio
/// code (see [`decode_convenio`]); [`DocumentError::CheckDigitMismatch`] if a
/// check digit is wrong.
pub fn decode_boleto(code: &str) -> Result<BoletoFields, DocumentError> {
    let (normalized, digits) = digits_of(code, &[BARCODE_LEN, BANK_LINE_LEN])?;
    let d = if digits.len() == BANK_LINE_LEN {
        let barcode = barcode_from_typed_line(&normalized)?;
        parse_digits(&barcode).unwrap_or_default()
    } else {
        if is_convenio(&digits) {
            return Err(structural("convênio barcode is not a bank boleto"));
        }
        check_bank_barcode(&digits)?;
        digits
    };

    // Narrowing is lossless: four digits never exceed 9999.
    let factor = number(&d[5..9]) as u16;
    let amount_cents = number(&d[9..19]);
    let fields = BoletoFields {
        barcode: digits_to_string(&d),
        bank_code: digits_to_string(&d[..3]),
        currency_code: d[3],
        check_digit: d[4],
        due_date_factor: factor,
        due_date: due_date_from_factor(factor),
        amount_cents,
        amount: format_cents(amount_cents),
        free_field: digits_to_string(&d[19..]),
    };
    tracing::debug!(
        bank = %fields.bank_code,
        factor,
        amount_cents,
        "decoded bank boleto"
    );
    Ok(fields)
}

/// Decode a convênio slip from its 44-digit barcode or 48-digit typed line.
///
/// # Errors
///
/// [`DocumentError::StructuralError`] for a wrong length, a barcode that does
/// not start with `8`, or an unknown segment or indicator;
/// [`DocumentError::CheckDigitMismatch`] if any check digit is wrong.
pub fn decode_convenio(code: &str) -> Result<ConvenioFields, DocumentError> {
    let (normalized, digits) = digits_of(code, &[BARCODE_LEN, CONVENIO_LINE_LEN])?;
    let d = if digits.len() == CONVENIO_LINE_LEN {
        parse_digits(&barcode_from_typed_line(&normalized)?).unwrap_or_default()
    } else {
        digits
    };
    if !is_convenio(&d) {
        return Err(structural("convênio barcode must start with 8"));
    }

    let indicator = check_convenio_barcode(&d)?;
    let segment = ConvenioSegment::from_digit(d[1])
        .ok_or_else(|| structural(format!("unknown convênio segment {}", d[1])))?;

    let fields = ConvenioFields {
        barcode: digits_to_string(&d),
        segment,
        segment_name: segment.name(),
        value_indicator: indicator,
        check_digit: d[3],
        amount_cents: indicator.is_effective().then(|| number(&d[4..15])),
        company_id: digits_to_string(&d[15..19]),
        free_field: digits_to_string(&d[19..]),
    };
    tracing::debug!(segment = segment.name(), "decoded convênio slip");
    Ok(fields)
}
