//! CLI configuration file.
//!
//! An optional YAML file supplies defaults for repeated invocations (a
//! merchant's Pix key and name, preferred output format). It is located by
//! `--config <path>` or the `BRKIT_CONFIG` environment variable. Flags always
//! win over file values, and file values over built-in defaults.
//!
//! ```yaml
//! pix:
//!   key: fulano@example.com
//!   merchant_name: Fulano de Tal
//!   merchant_city: Brasília
//! generate:
//!   formatted: true
//!   count: 5
//! output: json
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "BRKIT_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrkitConfig {
    /// Defaults for `brkit pix encode`.
    pub pix: PixDefaults,
    /// Defaults for `brkit generate`.
    pub generate: GenerateDefaults,
    /// Output format when `--json` is not given.
    pub output: OutputFormat,
}

/// Merchant defaults for Pix payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixDefaults {
    pub key: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_city: Option<String>,
}

/// Generation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateDefaults {
    /// Print the display mask instead of bare digits.
    pub formatted: bool,
    /// Numbers generated per invocation.
    pub count: usize,
}

impl Default for GenerateDefaults {
    fn default() -> Self {
        Self {
            formatted: true,
            count: 1,
        }
    }
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl BrkitConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for invalid YAML or unknown keys;
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_yaml(source: &str, origin: &Path) -> Result<Self, ConfigError> {
        // An empty file parses as YAML null.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(source).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            source: e,
        })?;
        config.check()?;
        Ok(config)
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`BrkitConfig::from_yaml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_yaml(&source, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`BrkitConfig::load`].
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.generate.count == 0 {
            return Err(ConfigError::Invalid("generate.count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<BrkitConfig, ConfigError> {
        BrkitConfig::from_yaml(yaml, Path::new("test.yaml"))
    }

    #[test]
    fn defaults_when_absent() {
        let cfg = BrkitConfig::resolve(None).unwrap();
        assert_eq!(cfg, BrkitConfig::default());
        assert!(cfg.generate.formatted);
        assert_eq!(cfg.generate.count, 1);
        assert_eq!(cfg.output, OutputFormat::Text);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse("").unwrap(), BrkitConfig::default());
        assert_eq!(parse("  \n").unwrap(), BrkitConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg = parse("generate:\n  count: 3\n").unwrap();
        assert_eq!(cfg.generate.count, 3);
        assert!(cfg.generate.formatted);
        assert!(cfg.pix.key.is_none());
    }

    #[test]
    fn full_document() {
        let cfg = parse(
            "pix:\n  key: fulano@example.com\n  merchant_name: Fulano\n  merchant_city: Recife\n\
             generate:\n  formatted: false\n  count: 2\noutput: json\n",
        )
        .unwrap();
        assert_eq!(cfg.pix.key.as_deref(), Some("fulano@example.com"));
        assert_eq!(cfg.pix.merchant_city.as_deref(), Some("Recife"));
        assert!(!cfg.generate.formatted);
        assert_eq!(cfg.output, OutputFormat::Json);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(matches!(parse("colour: blue\n"), Err(ConfigError::Parse { .. })));
        assert!(matches!(parse("pix:\n  chave: x\n"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn zero_count_rejected() {
        assert!(matches!(
            parse("generate:\n  count: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BrkitConfig::load(Path::new("/nonexistent/brkit.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/brkit.yaml"));
    }
}
