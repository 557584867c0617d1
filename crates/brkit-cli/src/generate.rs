//! # Generate Subcommand
//!
//! `brkit generate` produces valid test document numbers.

use anyhow::{bail, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use brkit_core::{
    generate_valid_with, DocumentNumber, DocumentType, FiscalRegion, GenerateOptions,
};

use crate::{print_json, CliContext};

/// Arguments for `brkit generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Document type: cpf, cnpj, pis, cnh or boleto.
    pub kind: DocumentType,

    /// How many numbers to generate (config `generate.count`, default 1).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// CPF only: issue from the fiscal region serving this state (e.g. SP).
    #[arg(long, conflicts_with = "region")]
    pub state: Option<String>,

    /// CPF only: fiscal region digit (0-9).
    #[arg(long)]
    pub region: Option<u8>,

    /// CNPJ only: branch number (default 1, the headquarters).
    #[arg(long)]
    pub branch: Option<u16>,

    /// Print bare digits instead of the display mask.
    #[arg(long)]
    pub raw: bool,

    /// Seed the generator for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn region_hint(args: &GenerateArgs) -> Result<Option<FiscalRegion>> {
    match (&args.state, args.region) {
        (Some(uf), _) => match FiscalRegion::from_state(uf) {
            Some(region) => Ok(Some(region)),
            None => bail!("unknown state {uf:?}; expected a two-letter code such as SP"),
        },
        (None, Some(digit)) => FiscalRegion::try_from(digit)
            .map(Some)
            .map_err(anyhow::Error::msg),
        (None, None) => Ok(None),
    }
}

/// Generate `count` numbers with the options in `args`.
pub fn generate_numbers(args: &GenerateArgs, count: usize) -> Result<Vec<DocumentNumber>> {
    let opts = GenerateOptions {
        region: region_hint(args)?,
        cnpj_branch: args.branch,
    };
    if opts.region.is_some() && args.kind != DocumentType::Cpf {
        tracing::warn!(kind = %args.kind, "region hint only applies to CPF; ignoring");
    }
    if opts.cnpj_branch.is_some() && args.kind != DocumentType::Cnpj {
        tracing::warn!(kind = %args.kind, "branch only applies to CNPJ; ignoring");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok((0..count)
        .map(|_| generate_valid_with(args.kind, &opts, &mut rng))
        .collect())
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs, ctx: &CliContext) -> Result<u8> {
    let count = args.count.unwrap_or(ctx.config.generate.count);
    if count == 0 {
        bail!("--count must be at least 1");
    }

    let numbers = generate_numbers(args, count)?;
    tracing::info!(kind = %args.kind, count, "generated document numbers");

    if ctx.json() {
        print_json(&numbers)?;
    } else {
        let formatted = !args.raw && ctx.config.generate.formatted;
        for n in &numbers {
            println!("{}", if formatted { &n.formatted } else { &n.digits });
        }
    }
    Ok(0)
}
