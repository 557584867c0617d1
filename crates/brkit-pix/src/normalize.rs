//! Merchant-field normalization.
//!
//! BR Code readers count bytes, and many only accept plain uppercase ASCII in
//! the merchant name and city. Text is decomposed (NFD), combining marks are
//! dropped, anything outside `[A-Za-z0-9 ]` is discarded (tabs and other
//! whitespace included), and the result is uppercased and truncated. Interior
//! spaces are kept exactly as given; only leading and trailing spaces are
//! trimmed, before truncation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Maximum merchant name length (tag `59`).
pub const MERCHANT_NAME_MAX: usize = 25;
/// Maximum merchant city length (tag `60`).
pub const MERCHANT_CITY_MAX: usize = 15;

/// Transliterate and cap a free-text field to at most `max` characters.
pub fn normalize_merchant_field(input: &str, max: usize) -> String {
    let kept: String = input
        .nfd()
        .filter(|&c| !is_combining_mark(c) && (c == ' ' || c.is_ascii_alphanumeric()))
        .map(|c| c.to_ascii_uppercase())
        .collect();
    kept.trim_matches(' ').chars().take(max).collect()
}
