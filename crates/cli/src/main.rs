//! Finished-goods inventory CLI - lot ledger audit and balance reports.
//!
//! # Usage
//!
//! ```bash
//! # Audit every lot as of today
//! fgi --beginning beginv.yaml --transactions tx.yaml audit
//!
//! # Drill into one lot as of a month end
//! fgi --as-of 2025-09-30 lot LOT-0042
//!
//! # Product totals as JSON
//! fgi --format json products --fg-type DC
//!
//! # Lots with stock on hand
//! fgi balances --product FG100
//! ```
//!
//! # Commands
//!
//! - `audit` - Per-lot summary with OK/ERROR status
//! - `lot` - Step-by-step running balance of one lot
//! - `products` - Balance rollup per product code
//! - `balances` - Lots with a positive balance
//!
//! Input files and defaults can also come from `FGI_*` environment variables
//! (see [`config`]); a `.env` file is honored.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fg_inventory_core::ledger::{LedgerSettings, LotQuery};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::commands::{FilterArgs, Session};
use crate::config::{FgiConfig, LogFormat, OutputFormat};
use crate::error::CliError;
use crate::source::MovementFiles;

mod commands;
mod config;
mod error;
mod render;
mod source;

#[derive(Parser)]
#[command(name = "fgi")]
#[command(author, version, about = "Finished-goods lot ledger audit")]
struct Cli {
    /// Beginning inventory rows (.yaml, .yml or .json)
    #[arg(long, global = true)]
    beginning: Option<PathBuf>,

    /// Transaction rows (.yaml, .yml or .json)
    #[arg(long, global = true)]
    transactions: Option<PathBuf>,

    /// Cutoff date, inclusive (default: today)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Report format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every lot with stock or a negative history
    Audit(FilterArgs),
    /// Show the running balance of one lot
    Lot {
        /// Lot number
        lot: String,
    },
    /// Roll lot balances up per product code
    Products(FilterArgs),
    /// List lots with stock on hand
    Balances(FilterArgs),
}

#[tokio::main]
async fn main() {
    // Load configuration first; the log format comes from it
    let config = FgiConfig::from_env();
    let log_format = config
        .as_ref()
        .map_or(LogFormat::default(), |config| config.log_format);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fg_inventory_cli=info".into());

    // Reports go to stdout, so logs always go to stderr
    let is_json = log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(report) => write_report(&report),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn write_report(report: &str) {
    print!("{report}");
}

async fn run(cli: Cli, config: FgiConfig) -> Result<String, CliError> {
    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let files = MovementFiles {
        beginning: cli.beginning.or(config.beginning_file),
        transactions: cli.transactions.or(config.transactions_file),
    };

    let batch = source::load_movements(&files, as_of).await?;
    let session = Session {
        movements: batch.movements,
        as_of,
        settings: LedgerSettings {
            tolerance: config.tolerance,
        },
        format: cli.format.unwrap_or(config.output_format),
    };

    match cli.command {
        Commands::Audit(filter) => commands::audit::run(&session, &LotQuery::from(filter)),
        Commands::Lot { lot } => commands::lot::run(&session, &lot),
        Commands::Products(filter) => commands::products::run(&session, &LotQuery::from(filter)),
        Commands::Balances(filter) => commands::balances::run(&session, &LotQuery::from(filter)),
    }
}
