//! # Format Subcommand
//!
//! `brkit format` applies a document's display mask.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use brkit_core::{format, is_valid, DocumentType};

use crate::{print_json, CliContext};

/// Arguments for `brkit format`.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Document type: cpf, cnpj, pis, cnh or boleto.
    pub kind: DocumentType,

    /// Number to format; only its digit count is checked.
    pub input: String,
}

#[derive(Serialize)]
struct Formatted<'a> {
    kind: DocumentType,
    formatted: &'a str,
    valid: bool,
}

/// Execute the format subcommand.
pub fn run_format(args: &FormatArgs, ctx: &CliContext) -> Result<u8> {
    let formatted = format(&args.input, args.kind)
        .with_context(|| format!("cannot format {:?} as {}", args.input, args.kind))?;
    let valid = is_valid(&args.input, args.kind);
    if !valid {
        tracing::warn!(kind = %args.kind, "formatted number does not pass validation");
    }

    if ctx.json() {
        print_json(&Formatted {
            kind: args.kind,
            formatted: &formatted,
            valid,
        })?;
    } else {
        println!("{formatted}");
    }
    Ok(0)
}
