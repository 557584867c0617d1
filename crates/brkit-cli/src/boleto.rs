//! # Boleto Subcommand
//!
//! `brkit boleto` decodes payment slips and converts between barcode and
//! typed line.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use brkit_core::{
    barcode_from_typed_line, decode_boleto, decode_convenio, format, normalize_digits,
    typed_line_from_barcode, BoletoFields, ConvenioFields, DocumentType,
};

use crate::{print_json, CliContext};

/// Boleto subcommand arguments.
#[derive(Args, Debug)]
pub struct BoletoArgs {
    #[command(subcommand)]
    pub command: BoletoCommand,
}

/// Available boleto subcommands.
#[derive(Subcommand, Debug)]
pub enum BoletoCommand {
    /// Decode a 44-digit barcode or a 47/48-digit typed line.
    Decode {
        /// Barcode or typed line; punctuation and spaces are ignored.
        code: String,
    },

    /// Print the typed line for a 44-digit barcode.
    Line {
        /// 44-digit barcode.
        barcode: String,
    },

    /// Print the 44-digit barcode for a typed line.
    Barcode {
        /// 47-digit bank or 48-digit convênio typed line.
        line: String,
    },
}

/// Execute the boleto subcommand.
pub fn run_boleto(args: &BoletoArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        BoletoCommand::Decode { code } => run_decode(code, ctx),
        BoletoCommand::Line { barcode } => {
            let line = typed_line_from_barcode(barcode).context("cannot build typed line")?;
            print_code(&line, ctx)
        }
        BoletoCommand::Barcode { line } => {
            let barcode = barcode_from_typed_line(line).context("cannot read typed line")?;
            print_code(&barcode, ctx)
        }
    }
}

fn print_code(code: &str, ctx: &CliContext) -> Result<u8> {
    let display = format(code, DocumentType::Boleto)?;
    if ctx.json() {
        print_json(&serde_json::json!({ "digits": code, "formatted": display }))?;
    } else {
        println!("{display}");
    }
    Ok(0)
}

fn run_decode(code: &str, ctx: &CliContext) -> Result<u8> {
    if normalize_digits(code).starts_with('8') {
        let fields = decode_convenio(code).context("invalid convênio slip")?;
        if ctx.json() {
            print_json(&fields)?;
        } else {
            print_convenio(&fields);
        }
    } else {
        let fields = decode_boleto(code).context("invalid bank boleto")?;
        if ctx.json() {
            print_json(&fields)?;
        } else {
            print_bank(&fields);
        }
    }
    Ok(0)
}

fn print_bank(f: &BoletoFields) {
    println!("  barcode:   {}", f.barcode);
    println!("  bank:      {}", f.bank_code);
    println!("  currency:  {}", f.currency_code);
    match f.due_date {
        Some(date) => println!("  due date:  {date} (factor {})", f.due_date_factor),
        None => println!("  due date:  none"),
    }
    println!("  amount:    R$ {}", f.amount);
    println!("  free:      {}", f.free_field);
}

fn print_convenio(f: &ConvenioFields) {
    println!("  barcode:   {}", f.barcode);
    println!("  segment:   {} ({})", f.segment_name, &f.barcode[1..2]);
    match f.amount_cents {
        Some(cents) => println!("  amount:    R$ {}", brkit_core::boleto::format_cents(cents)),
        None => println!("  reference: {}", &f.barcode[4..15]),
    }
    println!("  company:   {}", f.company_id);
    println!("  free:      {}", f.free_field);
}
