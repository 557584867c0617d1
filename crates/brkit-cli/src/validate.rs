//! # Validate Subcommand
//!
//! `brkit validate` checks document numbers.

use anyhow::Result;
use clap::Args;

use brkit_core::{DocumentType, Validation};

use crate::{print_json, CliContext};

/// Arguments for `brkit validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document type: cpf, cnpj, pis, cnh or boleto.
    pub kind: DocumentType,

    /// One or more numbers; punctuation and spaces are ignored.
    #[arg(required = true)]
    pub inputs: Vec<String>,
}

/// Execute the validate subcommand. Exits `1` if any input is invalid.
pub fn run_validate(args: &ValidateArgs, ctx: &CliContext) -> Result<u8> {
    let results: Vec<Validation> = args
        .inputs
        .iter()
        .map(|input| Validation::of(input, args.kind))
        .collect();

    if ctx.json() {
        match results.as_slice() {
            [single] => print_json(single)?,
            many => print_json(many)?,
        }
    } else {
        for (input, result) in args.inputs.iter().zip(&results) {
            match &result.reason {
                None => println!("{input}: valid {}", args.kind),
                Some(reason) => println!("{input}: invalid ({reason})"),
            }
        }
    }

    let invalid = results.iter().filter(|r| !r.valid).count();
    tracing::info!(kind = %args.kind, checked = results.len(), invalid, "validation finished");
    Ok(u8::from(invalid > 0))
}
