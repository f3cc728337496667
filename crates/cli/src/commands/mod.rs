//! Report commands.
//!
//! Every command replays the loaded movements from scratch and returns the
//! rendered report; `main` decides where it goes.

use chrono::NaiveDate;
use fg_inventory_core::FgType;
use fg_inventory_core::ledger::{LedgerSettings, LotQuery, Movement};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::CliError;

pub mod audit;
pub mod balances;
pub mod lot;
pub mod products;

/// Movements and settings shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub movements: Vec<Movement>,
    pub as_of: NaiveDate,
    pub settings: LedgerSettings,
    pub format: OutputFormat,
}

/// Filter arguments common to the list commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Product code substring (case-insensitive)
    #[arg(short, long)]
    pub product: Option<String>,

    /// Lot number substring (case-insensitive)
    #[arg(short, long)]
    pub lot: Option<String>,

    /// Finished-goods family (`MB` or `DC`)
    #[arg(long, value_parser = parse_fg_type)]
    pub fg_type: Option<FgType>,
}

impl From<FilterArgs> for LotQuery {
    fn from(args: FilterArgs) -> Self {
        Self {
            product: args.product.filter(|s| !s.trim().is_empty()),
            lot: args.lot.filter(|s| !s.trim().is_empty()),
            fg_type: args.fg_type,
        }
    }
}

fn parse_fg_type(s: &str) -> Result<FgType, String> {
    s.parse()
}

fn to_json<T: Serialize>(report: &T) -> Result<String, CliError> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
