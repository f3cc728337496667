//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FGI_BEGINNING_FILE` - Beginning inventory rows (YAML or JSON)
//! - `FGI_TRANSACTIONS_FILE` - Transaction rows (YAML or JSON)
//! - `FGI_BALANCE_TOLERANCE` - Zero tolerance for balances (default: 0.001)
//! - `FGI_OUTPUT_FORMAT` - `table` or `json` (default: table)
//! - `FGI_LOG_FORMAT` - `text` or `json` (default: text)
//!
//! Command-line flags take precedence over every variable above.

use std::path::PathBuf;
use std::str::FromStr;

use fg_inventory_core::BALANCE_TOLERANCE;
use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected `table` or `json`, got `{s}`")),
        }
    }
}

/// How log events are written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected `text` or `json`, got `{s}`")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FgiConfig {
    /// Default beginning inventory file
    pub beginning_file: Option<PathBuf>,
    /// Default transactions file
    pub transactions_file: Option<PathBuf>,
    /// Balance tolerance for zero and negative checks
    pub tolerance: Decimal,
    /// Report output format
    pub output_format: OutputFormat,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for FgiConfig {
    fn default() -> Self {
        Self {
            beginning_file: None,
            transactions_file: None,
            tolerance: BALANCE_TOLERANCE,
            output_format: OutputFormat::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl FgiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// the tolerance is not strictly positive.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`FgiConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tolerance = match get("FGI_BALANCE_TOLERANCE") {
            Some(raw) => parse_tolerance(&raw)?,
            None => BALANCE_TOLERANCE,
        };
        let output_format = parse_or_default::<OutputFormat>(&get, "FGI_OUTPUT_FORMAT")?;
        let log_format = parse_or_default::<LogFormat>(&get, "FGI_LOG_FORMAT")?;

        Ok(Self {
            beginning_file: get("FGI_BEGINNING_FILE").map(PathBuf::from),
            transactions_file: get("FGI_TRANSACTIONS_FILE").map(PathBuf::from),
            tolerance,
            output_format,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_tolerance(raw: &str) -> Result<Decimal, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("FGI_BALANCE_TOLERANCE".to_string(), msg);
    let value = Decimal::from_str(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(invalid(format!("must be greater than zero, got {value}")));
    }
    Ok(value)
}

fn parse_or_default<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<T, ConfigError>
where
    T: FromStr<Err = String> + Default,
{
    get(key).map_or_else(
        || Ok(T::default()),
        |raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
        },
    )
}
