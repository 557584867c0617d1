//! # Static BR Code Payloads
//!
//! Encodes payment fields into the text carried by a static Pix QR code and
//! parses such text back.
//!
//! ## Field Order
//!
//! | Tag | Field | Value |
//! |-----|-------|-------|
//! | `00` | Payload Format Indicator | `01` |
//! | `26` | Merchant Account Information | `00` GUI, `01` key, optional `02` description |
//! | `52` | Merchant Category Code | `0000` |
//! | `53` | Transaction Currency | `986` (BRL) |
//! | `54` | Transaction Amount | omitted unless positive |
//! | `58` | Country Code | `BR` |
//! | `59` | Merchant Name | normalized, at most 25 characters |
//! | `60` | Merchant City | normalized, at most 15 characters |
//! | `62` | Additional Data Field | `05` transaction id, `***` when absent |
//! | `63` | CRC | CRC16/CCITT-FALSE over everything before it, `6304` included |
//!
//! Encoding is deterministic: equal fields always produce byte-identical
//! payloads.

use serde::Serialize;

use crate::amount::Amount;
use crate::crc::crc16_hex;
use crate::error::PixError;
use crate::key::PixKey;
use crate::normalize::{normalize_merchant_field, MERCHANT_CITY_MAX, MERCHANT_NAME_MAX};
use crate::tlv::{find, parse_tlvs, template, Tlv};

/// Globally unique identifier of the Pix arrangement (tag `26`, sub-tag `00`).
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";
/// Transaction id used when none is given.
pub const DEFAULT_TXID: &str = "***";
/// Longest transaction id accepted in tag `62`, sub-tag `05`.
pub const TXID_MAX: usize = 25;
/// Longest amount string accepted in tag `54`.
pub const AMOUNT_MAX: usize = 13;

const CRC_PREFIX: &str = "6304";

/// Input for [`encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixPayloadFields {
    /// Pix key in any accepted notation.
    pub key: String,
    /// Receiver name; normalized before encoding.
    pub merchant_name: String,
    /// Receiver city; normalized before encoding.
    pub merchant_city: String,
    /// Amount; non-positive amounts are omitted.
    pub amount: Option<Amount>,
    /// Transaction id (alphanumeric, at most 25 characters).
    pub txid: Option<String>,
    /// Free-text message shown to the payer.
    pub description: Option<String>,
}

fn required(value: String, field: &'static str) -> Result<String, PixError> {
    if value.is_empty() {
        Err(PixError::IncompletePayload { field })
    } else {
        Ok(value)
    }
}

fn transaction_id(txid: Option<&str>) -> Result<String, PixError> {
    let txid = txid.map(str::trim).unwrap_or_default();
    if txid.is_empty() || txid == DEFAULT_TXID {
        return Ok(DEFAULT_TXID.to_string());
    }
    if txid.len() > TXID_MAX {
        return Err(PixError::FieldTooLong {
            tag: "62.05".into(),
            len: txid.len(),
        });
    }
    if !txid.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(PixError::Malformed(format!(
            "transaction id {txid:?} must be alphanumeric"
        )));
    }
    Ok(txid.to_string())
}

/// Encode `fields` into a complete payload, CRC included.
///
/// # Errors
///
/// - [`PixError::IncompletePayload`] if the key, name or city is empty.
/// - [`PixError::InvalidKey`] if the key fails classification.
/// - [`PixError::FieldTooLong`] if a field or template overflows its length.
/// - [`PixError::Malformed`] for a non-alphanumeric transaction id.
pub fn encode(fields: &PixPayloadFields) -> Result<String, PixError> {
    let key = PixKey::parse(&fields.key)?;
    let name = required(
        normalize_merchant_field(&fields.merchant_name, MERCHANT_NAME_MAX),
        "merchant_name",
    )?;
    let city = required(
        normalize_merchant_field(&fields.merchant_city, MERCHANT_CITY_MAX),
        "merchant_city",
    )?;
    let txid = transaction_id(fields.txid.as_deref())?;

    let mut account = vec![Tlv::new("00", PIX_GUI)?, Tlv::new("01", key.as_str())?];
    if let Some(description) = fields.description.as_deref() {
        let description = normalize_merchant_field(description, usize::MAX);
        if !description.is_empty() {
            account.push(Tlv::new("02", description)?);
        }
    }

    let mut records = vec![
        Tlv::new("00", "01")?,
        template("26", &account)?,
        Tlv::new("52", "0000")?,
        Tlv::new("53", "986")?,
    ];
    if let Some(amount) = fields.amount.filter(|a| a.is_positive()) {
        let value = amount.to_string();
        if value.len() > AMOUNT_MAX {
            return Err(PixError::FieldTooLong {
                tag: "54".into(),
                len: value.len(),
            });
        }
        records.push(Tlv::new("54", value)?);
    }
    records.push(Tlv::new("58", "BR")?);
    records.push(Tlv::new("59", name)?);
    records.push(Tlv::new("60", city)?);
    records.push(template("62", &[Tlv::new("05", txid)?])?);

    let mut payload: String = records.iter().map(Tlv::encode).collect();
    payload.push_str(CRC_PREFIX);
    let crc = crc16_hex(payload.as_bytes());
    payload.push_str(&crc);

    tracing::debug!(
        key_kind = %key.kind(),
        len = payload.len(),
        crc = %crc,
        "encoded BR Code payload"
    );
    Ok(payload)
}

/// A parsed and CRC-verified static payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrCode {
    /// Pix key as carried in the payload.
    pub key: String,
    /// Message to the payer, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Merchant Category Code (tag `52`).
    pub merchant_category_code: String,
    /// ISO 4217 numeric currency (tag `53`).
    pub currency: String,
    /// Amount, when the payload fixes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Country code (tag `58`).
    pub country: String,
    /// Merchant name (tag `59`).
    pub merchant_name: String,
    /// Merchant city (tag `60`).
    pub merchant_city: String,
    /// Transaction id (tag `62`, sub-tag `05`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Four-digit checksum.
    pub crc: String,
}

fn value_of(fields: &[Tlv], tag: &str, name: &str) -> Result<String, PixError> {
    find(fields, tag)
        .map(|f| f.value.clone())
        .ok_or_else(|| PixError::Malformed(format!("missing {name} (tag {tag})")))
}

impl BrCode {
    /// Parse `payload`, verifying the trailing CRC first.
    ///
    /// # Errors
    ///
    /// [`PixError::CrcMismatch`] if the checksum is wrong;
    /// [`PixError::Malformed`] for broken TLV structure, a payload without
    /// the CRC field last, a foreign GUI, or missing mandatory fields.
    pub fn parse(payload: &str) -> Result<Self, PixError> {
        let payload = payload.trim();
        if !payload.is_ascii() {
            return Err(PixError::Malformed("payload must be ASCII".into()));
        }
        let (body, found) = split_crc(payload)
            .ok_or_else(|| PixError::Malformed("payload must end with the 6304 CRC field".into()))?;

        let expected = crc16_hex(body.as_bytes());
        if !found.eq_ignore_ascii_case(&expected) {
            return Err(PixError::CrcMismatch {
                expected,
                found: found.to_string(),
            });
        }

        let fields = parse_tlvs(payload)?;
        if value_of(&fields, "00", "payload format indicator")? != "01" {
            return Err(PixError::Malformed("unsupported payload format indicator".into()));
        }

        let account = find(&fields, "26")
            .ok_or_else(|| PixError::Malformed("missing merchant account information".into()))?
            .nested()?;
        let gui = value_of(&account, "00", "GUI")?;
        if !gui.eq_ignore_ascii_case(PIX_GUI) {
            return Err(PixError::Malformed(format!("not a Pix payload: GUI {gui:?}")));
        }

        let amount = find(&fields, "54")
            .map(|f| f.value.parse::<Amount>())
            .transpose()?;
        let txid = match find(&fields, "62") {
            Some(additional) => find(&additional.nested()?, "05").map(|f| f.value.clone()),
            None => None,
        };

        let code = Self {
            key: value_of(&account, "01", "Pix key")?,
            description: find(&account, "02").map(|f| f.value.clone()),
            merchant_category_code: value_of(&fields, "52", "merchant category code")?,
            currency: value_of(&fields, "53", "transaction currency")?,
            amount,
            country: value_of(&fields, "58", "country code")?,
            merchant_name: value_of(&fields, "59", "merchant name")?,
            merchant_city: value_of(&fields, "60", "merchant city")?,
            txid,
            crc: found.to_ascii_uppercase(),
        };
        tracing::debug!(key = %code.key, "parsed BR Code payload");
        Ok(code)
    }

    /// Classify the embedded key.
    ///
    /// # Errors
    ///
    /// See [`PixKey::parse`].
    pub fn pix_key(&self) -> Result<PixKey, PixError> {
        PixKey::parse(&self.key)
    }
}

/// Split an ASCII payload into the CRC-covered body and its 4-character CRC.
fn split_crc(payload: &str) -> Option<(&str, &str)> {
    let at = payload.len().checked_sub(4)?;
    (payload.is_ascii() && payload[..at].ends_with(CRC_PREFIX)).then(|| payload.split_at(at))
}

/// `true` if the last four characters of `payload` are its correct CRC.
///
/// Hex case is ignored, as in [`BrCode::parse`].
pub fn verify_crc(payload: &str) -> bool {
    split_crc(payload.trim())
        .is_some_and(|(body, found)| found.eq_ignore_ascii_case(&crc16_hex(body.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOAO: &str = "00020126330014BR.GOV.BCB.PIX0111123456789095204000053039865802BR5913JOAO DA SILVA6009SAO PAULO62070503***6304A0ED";
    const FULANO: &str = "00020126400014BR.GOV.BCB.PIX0118fulano@example.com520400005303986540510.505802BR5913FULANO DE TAL6008BRASILIA62130509PEDIDO1236304E3E6";

    fn joao() -> PixPayloadFields {
        PixPayloadFields {
            key: "12345678909".into(),
            merchant_name: "JOAO DA SILVA".into(),
            merchant_city: "SAO PAULO".into(),
            ..PixPayloadFields::default()
        }
    }

    #[test]
    fn encodes_minimal_payload() {
        let payload = encode(&joao()).unwrap();
        assert_eq!(payload, JOAO);
        assert!(payload.contains("5802BR5913JOAO DA SILVA6009SAO PAULO"));
        assert!(!payload.contains("5406"));
    }

    #[test]
    fn encodes_amount_and_txid() {
        let fields = PixPayloadFields {
            key: "fulano@example.com".into(),
            merchant_name: "Fulano de Tal".into(),
            merchant_city: "Brasília".into(),
            amount: Some("10,50".parse().unwrap()),
            txid: Some("PEDIDO123".into()),
            description: None,
        };
        assert_eq!(encode(&fields).unwrap(), FULANO);
    }

    #[test]
    fn masked_cpf_key_encodes_like_bare_digits() {
        let mut fields = joao();
        fields.key = "123.456.789-09".into();
        assert_eq!(encode(&fields).unwrap(), JOAO);
    }

    #[test]
    fn zero_amount_is_omitted() {
        let mut fields = joao();
        fields.amount = Some(Amount::from_cents(0));
        assert_eq!(encode(&fields).unwrap(), JOAO);
    }

    #[test]
    fn negative_amount_is_omitted() {
        let mut fields = joao();
        fields.amount = Some(Amount::from_cents(-100));
        let payload = encode(&fields).unwrap();
        assert_eq!(payload, JOAO);
        assert!(parse_tlvs(&payload).unwrap().iter().all(|f| f.tag != "54"));
    }

    #[test]
    fn merchant_name_keeps_interior_spaces() {
        let mut fields = joao();
        fields.merchant_name = "JOAO  DA SILVA".into();
        let payload = encode(&fields).unwrap();
        assert!(payload.contains("5914JOAO  DA SILVA6009SAO PAULO"));
        assert_eq!(BrCode::parse(&payload).unwrap().merchant_name, "JOAO  DA SILVA");

        fields.merchant_name = "JOAO\tDA SILVA".into();
        assert!(encode(&fields).unwrap().contains("5912JOAODA SILVA6009"));
    }

    #[test]
    fn description_is_nested_in_account_template() {
        let mut fields = joao();
        fields.description = Some("Pagamento do almoço".into());
        let payload = encode(&fields).unwrap();
        assert!(payload.contains("0219PAGAMENTO DO ALMOCO"));
        let code = BrCode::parse(&payload).unwrap();
        assert_eq!(code.description.as_deref(), Some("PAGAMENTO DO ALMOCO"));
    }

    #[test]
    fn missing_fields_reported() {
        let mut fields = joao();
        fields.merchant_name = "  ".into();
        assert_eq!(
            encode(&fields),
            Err(PixError::IncompletePayload { field: "merchant_name" })
        );
        let mut fields = joao();
        fields.merchant_city = "☕".into();
        assert_eq!(
            encode(&fields),
            Err(PixError::IncompletePayload { field: "merchant_city" })
        );
        let mut fields = joao();
        fields.key = String::new();
        assert_eq!(encode(&fields), Err(PixError::IncompletePayload { field: "key" }));
    }

    #[test]
    fn invalid_key_produces_no_payload() {
        let mut fields = joao();
        fields.key = "12345678900".into();
        assert!(matches!(encode(&fields), Err(PixError::InvalidKey { .. })));
    }

    #[test]
    fn txid_rules() {
        let mut fields = joao();
        fields.txid = Some("x".repeat(26));
        assert!(matches!(encode(&fields), Err(PixError::FieldTooLong { .. })));
        fields.txid = Some("PEDIDO-1".into());
        assert!(matches!(encode(&fields), Err(PixError::Malformed(_))));
        fields.txid = Some("   ".into());
        assert_eq!(encode(&fields).unwrap(), JOAO);
    }

    #[test]
    fn oversized_account_template_rejected() {
        let mut fields = joao();
        fields.description = Some("x".repeat(90));
        assert!(matches!(
            encode(&fields),
            Err(PixError::FieldTooLong { tag, .. }) if tag == "26"
        ));
    }

    #[test]
    fn parses_encoded_payload() {
        let code = BrCode::parse(FULANO).unwrap();
        assert_eq!(code.key, "fulano@example.com");
        assert_eq!(code.merchant_name, "FULANO DE TAL");
        assert_eq!(code.merchant_city, "BRASILIA");
        assert_eq!(code.amount, Some(Amount::from_cents(1050)));
        assert_eq!(code.txid.as_deref(), Some("PEDIDO123"));
        assert_eq!(code.currency, "986");
        assert_eq!(code.crc, "E3E6");
        assert_eq!(code.pix_key().unwrap(), PixKey::Email("fulano@example.com".into()));
    }

    #[test]
    fn crc_mismatch_detected() {
        let tampered = JOAO.replace("SAO PAULO", "SAO PAULA");
        match BrCode::parse(&tampered) {
            Err(PixError::CrcMismatch { expected, found }) => {
                assert_eq!(found, "A0ED");
                assert_ne!(expected, "A0ED");
            }
            other => panic!("expected CRC mismatch, got {other:?}"),
        }
        assert!(!verify_crc(&tampered));
        assert!(verify_crc(JOAO));
    }

    #[test]
    fn lowercase_crc_accepted() {
        let lower = format!("{}a0ed", &JOAO[..JOAO.len() - 4]);
        assert_eq!(BrCode::parse(&lower).unwrap().crc, "A0ED");
        assert!(verify_crc(&lower));
        assert!(!verify_crc(&format!("{}a0ee", &JOAO[..JOAO.len() - 4])));
    }

    #[test]
    fn verify_crc_rejects_short_or_non_ascii_input() {
        assert!(!verify_crc(""));
        assert!(!verify_crc("6304"));
        assert!(!verify_crc(&JOAO.replace("JOAO", "JOÃO")));
    }

    #[test]
    fn rejects_payload_without_crc_field() {
        assert!(matches!(BrCode::parse("000201"), Err(PixError::Malformed(_))));
        assert!(matches!(BrCode::parse(""), Err(PixError::Malformed(_))));
    }

    #[test]
    fn json_omits_absent_fields() {
        let code = BrCode::parse(JOAO).unwrap();
        let json = serde_json::to_value(&code).unwrap();
        assert!(json.get("amount").is_none());
        assert_eq!(json["txid"], "***");
        assert_eq!(json["merchant_city"], "SAO PAULO");
    }
}
