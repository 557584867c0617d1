//! # brkit-core — Check-Digit Engine for Brazilian Documents
//!
//! Pure, synchronous computation and validation of the modulus-based check
//! digits carried by Brazilian registry numbers and payment slips. Nothing in
//! this crate performs I/O or holds shared state; every function may be called
//! concurrently without coordination.
//!
//! ## Supported Documents
//!
//! | Type | Length | Check digits |
//! |------|--------|--------------|
//! | CPF | 11 | 2 × mod 11, weights `10..2` / `11..2` |
//! | CNPJ | 14 | 2 × mod 11, weights `5,4,3,2,9..2` / `6,5,4,3,2,9..2` |
//! | PIS/PASEP | 11 | 1 × mod 11, weights `3,2,9..2` |
//! | CNH | 11 | 2 × mod 11 with carried discount |
//! | Boleto | 44 / 47 / 48 | mod 11 general digit, mod 10 field digits |
//!
//! ## Crate Policy
//!
//! - No dependencies on other `brkit-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Invalid input is an `Err`, never a panic. The only logic error is naming
//!   a document type that does not exist, and that is reported as
//!   [`DocumentError::UnknownDocumentType`] at the parsing boundary.

pub mod boleto;
pub mod digits;
pub mod document;
pub mod error;
pub mod generate;
pub mod identity;
pub mod region;

// Re-export primary types for ergonomic imports.
pub use boleto::{
    barcode_from_typed_line, decode_boleto, decode_convenio, typed_line_from_barcode,
    BoletoFields, ConvenioFields, ConvenioSegment, ValueIndicator,
};
pub use digits::{compute_check_digits, normalize_digits, CheckDigitSpec, Modulus, RemainderRule};
pub use document::{format, is_valid, validate, DocumentType, Validation};
pub use error::DocumentError;
pub use generate::{generate_valid, generate_valid_with, DocumentNumber, GenerateOptions};
pub use identity::{Cnh, Cnpj, Cpf, Pis};
pub use region::FiscalRegion;
