//! # brkit CLI entry point
//!
//! Parses command-line arguments, loads the optional configuration file, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brkit_cli::boleto::{run_boleto, BoletoArgs};
use brkit_cli::config::CONFIG_ENV;
use brkit_cli::format::{run_format, FormatArgs};
use brkit_cli::generate::{run_generate, GenerateArgs};
use brkit_cli::pix::{run_pix, PixArgs};
use brkit_cli::validate::{run_validate, ValidateArgs};
use brkit_cli::CliContext;

/// brkit: Brazilian document check digits and Pix BR Codes.
///
/// Validates, generates and formats CPF, CNPJ, PIS/PASEP, CNH and boleto
/// numbers, decodes boletos, and encodes or verifies static Pix payloads.
#[derive(Parser, Debug)]
#[command(name = "brkit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one or more document numbers.
    Validate(ValidateArgs),

    /// Generate valid document numbers for testing.
    Generate(GenerateArgs),

    /// Apply a document's display mask.
    Format(FormatArgs),

    /// Decode boletos and convert between barcode and typed line.
    Boleto(BoletoArgs),

    /// Encode or decode static Pix BR Code payloads.
    Pix(PixArgs),
}

/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
fn log_filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "brkit starting");

    let ctx = match CliContext::load(cli.config.as_deref(), cli.json) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("{:#}", anyhow::Error::from(e));
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &ctx),
        Commands::Generate(args) => run_generate(&args, &ctx),
        Commands::Format(args) => run_format(&args, &ctx),
        Commands::Boleto(args) => run_boleto(&args, &ctx),
        Commands::Pix(args) => run_pix(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brkit_cli::boleto::BoletoCommand;
    use brkit_cli::pix::PixCommand;
    use brkit_core::DocumentType;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["brkit", "validate", "cpf", "111.444.777-35"]).unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.kind, DocumentType::Cpf);
            assert_eq!(args.inputs, vec!["111.444.777-35".to_string()]);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_requires_input() {
        assert!(Cli::try_parse_from(["brkit", "validate", "cpf"]).is_err());
    }

    #[test]
    fn cli_parse_rejects_unknown_type() {
        assert!(Cli::try_parse_from(["brkit", "validate", "rg", "123"]).is_err());
    }

    #[test]
    fn cli_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "brkit", "generate", "cpf", "-n", "3", "--state", "SP", "--raw", "--seed", "7",
        ])
        .unwrap();
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.kind, DocumentType::Cpf);
            assert_eq!(args.count, Some(3));
            assert_eq!(args.state.as_deref(), Some("SP"));
            assert!(args.raw);
            assert_eq!(args.seed, Some(7));
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_state_conflicts_with_region() {
        let parsed =
            Cli::try_parse_from(["brkit", "generate", "cpf", "--state", "SP", "--region", "8"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "brkit", "format", "cnpj", "11222333000181", "--json", "-vv", "--config", "b.yaml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("b.yaml")));
    }

    #[test]
    fn cli_parse_boleto_decode() {
        let cli = Cli::try_parse_from(["brkit", "boleto", "decode", "0019..."]).unwrap();
        if let Commands::Boleto(args) = cli.command {
            assert!(matches!(args.command, BoletoCommand::Decode { .. }));
        } else {
            panic!("expected boleto");
        }
    }

    #[test]
    fn cli_parse_pix_encode() {
        let cli = Cli::try_parse_from([
            "brkit", "pix", "encode", "--key", "12345678909", "--name", "JOAO", "--city", "SP",
            "--amount", "10,50",
        ])
        .unwrap();
        if let Commands::Pix(args) = cli.command {
            if let PixCommand::Encode(enc) = args.command {
                assert_eq!(enc.key.as_deref(), Some("12345678909"));
                assert_eq!(enc.amount.map(|a| a.cents()), Some(1050));
            } else {
                panic!("expected encode");
            }
        } else {
            panic!("expected pix");
        }
    }

    #[test]
    fn cli_parse_pix_rejects_bad_amount() {
        let parsed = Cli::try_parse_from(["brkit", "pix", "encode", "--amount", "dez reais"]);
        assert!(parsed.is_err());
    }
}
