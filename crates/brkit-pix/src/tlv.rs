//! # TLV Codec
//!
//! EMV Merchant-Presented QR fields are `tag (2 digits) + length (2 digits,
//! zero-padded decimal) + value`. Templates such as Merchant Account
//! Information (`26`) and Additional Data (`62`) nest the same encoding inside
//! their value.
//!
//! Lengths count characters. Every value this crate emits is ASCII, and the
//! parser rejects non-ASCII payloads, so characters and bytes coincide.

use crate::error::PixError;

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// One tag-length-value record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    /// Two-digit tag.
    pub tag: String,
    /// Field value.
    pub value: String,
}

impl Tlv {
    /// Build a record, rejecting values that do not fit the length prefix.
    ///
    /// # Errors
    ///
    /// [`PixError::FieldTooLong`] if `value` exceeds 99 characters.
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Result<Self, PixError> {
        let tag = tag.into();
        let value = value.into();
        let len = value.chars().count();
        if len > MAX_VALUE_LEN {
            return Err(PixError::FieldTooLong { tag, len });
        }
        Ok(Self { tag, value })
    }

    /// Serialize as `tag + length + value`.
    pub fn encode(&self) -> String {
        format!("{}{:02}{}", self.tag, self.value.chars().count(), self.value)
    }

    /// Parse this record's value as a nested TLV sequence.
    ///
    /// # Errors
    ///
    /// See [`parse_tlvs`].
    pub fn nested(&self) -> Result<Vec<Tlv>, PixError> {
        parse_tlvs(&self.value)
    }
}

/// Encode a template: a tag whose value is the concatenation of `children`.
///
/// # Errors
///
/// [`PixError::FieldTooLong`] if the concatenated children exceed 99
/// characters.
pub fn template(tag: &str, children: &[Tlv]) -> Result<Tlv, PixError> {
    let value: String = children.iter().map(Tlv::encode).collect();
    Tlv::new(tag, value)
}

/// Split a TLV string into records, in order.
///
/// # Errors
///
/// [`PixError::Malformed`] for non-ASCII input, a non-numeric tag or length,
/// or a length that runs past the end of the input.
pub fn parse_tlvs(input: &str) -> Result<Vec<Tlv>, PixError> {
    if !input.is_ascii() {
        return Err(PixError::Malformed("payload must be ASCII".into()));
    }

    let mut out = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(PixError::Malformed(format!("truncated field header {rest:?}")));
        }
        let (header, tail) = rest.split_at(4);
        let (tag, len) = header.split_at(2);
        if !tag.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::Malformed(format!("non-numeric tag {tag:?}")));
        }
        if !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::Malformed(format!("tag {tag} has non-numeric length {len:?}")));
        }
        let len = len.bytes().fold(0, |acc, b| acc * 10 + usize::from(b - b'0'));
        if tail.len() < len {
            return Err(PixError::Malformed(format!(
                "tag {tag} declares {len} characters, {} remain",
                tail.len()
            )));
        }
        let (value, next) = tail.split_at(len);
        out.push(Tlv {
            tag: tag.to_string(),
            value: value.to_string(),
        });
        rest = next;
    }
    Ok(out)
}

/// First record with `tag`.
pub fn find<'a>(fields: &'a [Tlv], tag: &str) -> Option<&'a Tlv> {
    fields.iter().find(|f| f.tag == tag)
}
