//! # brkit-pix — BR Code (Pix) Payload Encoder
//!
//! Builds the text carried by a static Pix QR code: an EMV Merchant-Presented
//! TLV string closed by a CRC16/CCITT-FALSE checksum. The result is plain
//! ASCII, ready to hand to any QR renderer or to show as "Pix copia e cola".
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`crc`] | CRC16/CCITT-FALSE |
//! | [`tlv`] | tag-length-value encoding and parsing |
//! | [`normalize`] | merchant name/city transliteration |
//! | [`key`] | Pix key classification |
//! | [`amount`] | cent-exact amounts |
//! | [`payload`] | payload encoding and verified parsing |
//!
//! CPF and CNPJ keys are checked with `brkit-core`; nothing else is shared.
//!
//! ```
//! use brkit_pix::{encode, PixPayloadFields};
//!
//! let payload = encode(&PixPayloadFields {
//!     key: "123.456.789-09".into(),
//!     merchant_name: "João da Silva".into(),
//!     merchant_city: "São Paulo".into(),
//!     ..Default::default()
//! })
//! .unwrap();
//! assert!(payload.contains("5913JOAO DA SILVA6009SAO PAULO"));
//! ```

pub mod amount;
pub mod crc;
pub mod error;
pub mod key;
pub mod normalize;
pub mod payload;
pub mod tlv;

pub use amount::Amount;
pub use crc::{crc16_ccitt_false, crc16_hex};
pub use error::PixError;
pub use key::{PixKey, PixKeyKind};
pub use normalize::normalize_merchant_field;
pub use payload::{encode, verify_crc, BrCode, PixPayloadFields};
pub use tlv::{parse_tlvs, Tlv};
