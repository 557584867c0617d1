//! # Pix Subcommand
//!
//! `brkit pix` encodes and decodes static BR Code payloads.
//!
//! ```bash
//! brkit pix encode --key fulano@example.com --name "Fulano de Tal" \
//!     --city Brasília --amount 10,50 --txid PEDIDO123
//! brkit pix decode '00020126...6304E3E6'
//! ```
//!
//! `--key`, `--name` and `--city` fall back to the `pix` section of the
//! configuration file.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use brkit_pix::{encode, Amount, BrCode, PixPayloadFields};

use crate::config::PixDefaults;
use crate::{print_json, CliContext};

/// Pix subcommand arguments.
#[derive(Args, Debug)]
pub struct PixArgs {
    #[command(subcommand)]
    pub command: PixCommand,
}

/// Available Pix subcommands.
#[derive(Subcommand, Debug)]
pub enum PixCommand {
    /// Build a static "copia e cola" payload.
    Encode(EncodeArgs),

    /// Verify a payload's CRC and print its fields.
    Decode {
        /// Full payload text.
        payload: String,
    },
}

/// Arguments for `brkit pix encode`.
#[derive(Args, Debug, Default)]
pub struct EncodeArgs {
    /// Pix key: CPF, CNPJ, email, +55 phone or random key.
    #[arg(long)]
    pub key: Option<String>,

    /// Receiver name (at most 25 characters after normalization).
    #[arg(long)]
    pub name: Option<String>,

    /// Receiver city (at most 15 characters after normalization).
    #[arg(long)]
    pub city: Option<String>,

    /// Amount in BRL, e.g. 10.50 or 10,50. Omitted when not positive.
    #[arg(long)]
    pub amount: Option<Amount>,

    /// Transaction id (alphanumeric, at most 25 characters).
    #[arg(long)]
    pub txid: Option<String>,

    /// Message shown to the payer.
    #[arg(long)]
    pub description: Option<String>,
}

impl EncodeArgs {
    /// Merge flags over configuration defaults.
    pub fn to_fields(&self, defaults: &PixDefaults) -> PixPayloadFields {
        let pick = |flag: &Option<String>, default: &Option<String>| {
            flag.clone().or_else(|| default.clone()).unwrap_or_default()
        };
        PixPayloadFields {
            key: pick(&self.key, &defaults.key),
            merchant_name: pick(&self.name, &defaults.merchant_name),
            merchant_city: pick(&self.city, &defaults.merchant_city),
            amount: self.amount,
            txid: self.txid.clone(),
            description: self.description.clone(),
        }
    }
}

/// Execute the pix subcommand.
pub fn run_pix(args: &PixArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        PixCommand::Encode(encode_args) => run_encode(encode_args, ctx),
        PixCommand::Decode { payload } => run_decode(payload, ctx),
    }
}

fn run_encode(args: &EncodeArgs, ctx: &CliContext) -> Result<u8> {
    let fields = args.to_fields(&ctx.config.pix);
    let payload = encode(&fields).context("failed to encode BR Code")?;

    if ctx.json() {
        let crc = &payload[payload.len() - 4..];
        print_json(&serde_json::json!({ "payload": payload, "crc": crc }))?;
    } else {
        println!("{payload}");
    }
    Ok(0)
}

fn run_decode(payload: &str, ctx: &CliContext) -> Result<u8> {
    let code = BrCode::parse(payload).context("invalid BR Code")?;

    if ctx.json() {
        print_json(&code)?;
        return Ok(0);
    }

    println!("  key:         {}", code.key);
    if let Ok(key) = code.pix_key() {
        println!("  key type:    {}", key.kind());
    }
    println!("  name:        {}", code.merchant_name);
    println!("  city:        {}", code.merchant_city);
    if let Some(amount) = code.amount {
        println!("  amount:      R$ {amount}");
    }
    if let Some(txid) = &code.txid {
        println!("  txid:        {txid}");
    }
    if let Some(description) = &code.description {
        println!("  description: {description}");
    }
    println!("  crc:         {} (ok)", code.crc);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let defaults = PixDefaults {
            key: Some("fulano@example.com".into()),
            merchant_name: Some("Fulano".into()),
            merchant_city: Some("Recife".into()),
        };
        let args = EncodeArgs {
            city: Some("Olinda".into()),
            ..EncodeArgs::default()
        };
        let fields = args.to_fields(&defaults);
        assert_eq!(fields.key, "fulano@example.com");
        assert_eq!(fields.merchant_name, "Fulano");
        assert_eq!(fields.merchant_city, "Olinda");
    }

    #[test]
    fn missing_key_is_error() {
        let args = PixArgs {
            command: PixCommand::Encode(EncodeArgs {
                name: Some("Fulano".into()),
                city: Some("Recife".into()),
                ..EncodeArgs::default()
            }),
        };
        let err = run_pix(&args, &CliContext::default()).unwrap_err();
        assert!(format!("{err:#}").contains("key is required"));
    }

    #[test]
    fn encode_then_decode() {
        let fields = EncodeArgs {
            key: Some("12345678909".into()),
            name: Some("JOAO DA SILVA".into()),
            city: Some("SAO PAULO".into()),
            ..EncodeArgs::default()
        }
        .to_fields(&PixDefaults::default());
        let payload = encode(&fields).unwrap();
        let args = PixArgs {
            command: PixCommand::Decode { payload },
        };
        assert_eq!(run_pix(&args, &CliContext::default()).unwrap(), 0);
    }

    #[test]
    fn tampered_payload_is_error() {
        let args = PixArgs {
            command: PixCommand::Decode {
                payload: "00020126330014BR.GOV.BCB.PIX0111123456789095204000053039865802BR5913JOAO DA SILVA6009SAO PAULO62070503***63040000".into(),
            },
        };
        let err = run_pix(&args, &CliContext::default()).unwrap_err();
        assert!(format!("{err:#}").contains("CRC mismatch"));
    }
}
