//! Unified error handling for the CLI.

use std::path::PathBuf;

use fg_inventory_core::CodeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A YAML input file is malformed.
    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A JSON input file is malformed.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report serialization failed.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file extension is not one we can parse.
    #[error("Unsupported input file {}: expected .yaml, .yml or .json", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Neither input file was given.
    #[error("No movement data: pass --beginning and/or --transactions, or set FGI_BEGINNING_FILE / FGI_TRANSACTIONS_FILE")]
    NoInput,

    /// The requested lot number is malformed.
    #[error("Invalid lot number: {0}")]
    InvalidLot(#[from] CodeError),

    /// The requested lot has no movements.
    #[error("No movements found for lot {0}")]
    LotNotFound(String),
}
