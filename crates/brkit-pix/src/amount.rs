//! Transaction amounts in integer cents.
//!
//! Form input arrives in Brazilian (`1.234,56`) or plain (`1234.56`)
//! notation. [`Amount`] parses both into exact cents so the encoded tag `54`
//! never suffers floating-point rounding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PixError;

/// Monetary amount in BRL cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Amount(i64);

impl Amount {
    /// Amount from a cent count.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Value in cents.
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Only positive amounts are encoded in a payload.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

fn bad(input: &str, reason: &str) -> PixError {
    PixError::InvalidAmount(format!("{input:?}: {reason}"))
}

/// Index of the decimal separator, if any.
///
/// With both `.` and `,` present the rightmost one is decimal. A separator
/// that occurs more than once is digit grouping.
fn decimal_separator(body: &str) -> Option<usize> {
    match (body.rfind('.'), body.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(i), None) | (None, Some(i)) => {
            let sep = body.as_bytes()[i];
            (body.bytes().filter(|&b| b == sep).count() == 1).then_some(i)
        }
        (None, None) => None,
    }
}

impl FromStr for Amount {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let body = raw.strip_prefix("R$").unwrap_or(raw).trim();
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, body),
        };

        let (int_part, frac_part) = match decimal_separator(body) {
            Some(i) => (&body[..i], &body[i + 1..]),
            None => (body, ""),
        };
        let int_digits: String = int_part.chars().filter(|c| !matches!(c, '.' | ',')).collect();

        if int_digits.is_empty() && frac_part.is_empty() {
            return Err(bad(s, "no digits"));
        }
        if !int_digits.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(bad(s, "not a decimal number"));
        }
        if frac_part.len() > 2 {
            return Err(bad(s, "more than two fraction digits"));
        }

        let overflow = || bad(s, "out of range");
        let units: i64 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| overflow())?
        };
        let frac: i64 = format!("{frac_part:0<2}").parse().map_err(|_| overflow())?;
        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl TryFrom<String> for Amount {
    type Error = PixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(s: &str) -> i64 {
        s.parse::<Amount>().unwrap().cents()
    }

    #[test]
    fn parses_common_notations() {
        assert_eq!(cents("10.5"), 1050);
        assert_eq!(cents("10,50"), 1050);
        assert_eq!(cents("1050"), 105_000);
        assert_eq!(cents("R$ 1.234,56"), 123_456);
        assert_eq!(cents("1,234.56"), 123_456);
        assert_eq!(cents("1.234.567"), 123_456_700);
        assert_eq!(cents(",99"), 99);
        assert_eq!(cents("0"), 0);
        assert_eq!(cents("-3,00"), -300);
    }

    #[test]
    fn rejects_bad_input() {
        for input in ["", "R$", "abc", "1.234", "10.5.5,1x", "1e3", "99999999999999999999"] {
            assert!(
                matches!(input.parse::<Amount>(), Err(PixError::InvalidAmount(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn displays_two_fraction_digits() {
        assert_eq!(Amount::from_cents(1050).to_string(), "10.50");
        assert_eq!(Amount::from_cents(7).to_string(), "0.07");
        assert_eq!(Amount::from_cents(-250).to_string(), "-2.50");
    }

    #[test]
    fn positivity() {
        assert!(Amount::from_cents(1).is_positive());
        assert!(!Amount::from_cents(0).is_positive());
        assert!(!Amount::from_cents(-1).is_positive());
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Amount::from_cents(1050)).unwrap();
        assert_eq!(json, "\"10.50\"");
        let back: Amount = serde_json::from_str("\"10,50\"").unwrap();
        assert_eq!(back.cents(), 1050);
    }
}
