//! # brkit-cli — Command-Line Front End
//!
//! Provides the `brkit` binary over `brkit-core` and `brkit-pix`.
//!
//! ## Subcommands
//!
//! - `brkit validate`: check CPF, CNPJ, PIS, CNH and boleto numbers.
//! - `brkit generate`: produce valid test numbers.
//! - `brkit format`: apply a document's display mask.
//! - `brkit boleto`: decode barcodes and typed lines, convert between them.
//! - `brkit pix`: encode a static BR Code payload, or verify and decode one.
//!
//! ```bash
//! brkit validate cpf 111.444.777-35
//! brkit generate cnpj --count 3 --branch 2
//! brkit boleto decode "00190.50095 40144.816069 06809.350314 3 37370000000100"
//! brkit pix encode --key 12345678909 --name "João da Silva" --city "São Paulo"
//! ```
//!
//! Every handler returns `anyhow::Result<u8>`; the `u8` becomes the process
//! exit code (`0` success, `1` an invalid document or an error).

pub mod boleto;
pub mod config;
pub mod format;
pub mod generate;
pub mod pix;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{BrkitConfig, ConfigError, OutputFormat};

/// Settings shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    /// Loaded (or default) configuration.
    pub config: BrkitConfig,
    json: bool,
}

impl CliContext {
    /// Combine a configuration with the `--json` flag.
    pub fn new(config: BrkitConfig, json_flag: bool) -> Self {
        let json = json_flag || config.output == OutputFormat::Json;
        Self { config, json }
    }

    /// Load the configuration at `path` (if any) and build a context.
    ///
    /// # Errors
    ///
    /// See [`BrkitConfig::load`].
    pub fn load(path: Option<&Path>, json_flag: bool) -> Result<Self, ConfigError> {
        Ok(Self::new(BrkitConfig::resolve(path)?, json_flag))
    }

    /// `true` when results should be printed as JSON.
    pub fn json(&self) -> bool {
        self.json
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_or_config_selects_json() {
        assert!(!CliContext::default().json());
        assert!(CliContext::new(BrkitConfig::default(), true).json());

        let config = BrkitConfig {
            output: OutputFormat::Json,
            ..BrkitConfig::default()
        };
        assert!(CliContext::new(config, false).json());
    }

    #[test]
    fn load_without_path_uses_defaults() {
        let ctx = CliContext::load(None, false).unwrap();
        assert_eq!(ctx.config, BrkitConfig::default());
    }
}
