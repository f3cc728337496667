//! Lots with stock on hand.
//!
//! # Usage
//!
//! ```bash
//! fgi --as-of 2025-09-30 --format json balances --product FG100
//! ```

use chrono::NaiveDate;
use fg_inventory_core::ledger::{AuditTotals, LotQuery, LotSummary, positive_balances};
use serde::Serialize;
use tracing::info;

use super::{Session, audit, to_json};
use crate::config::OutputFormat;
use crate::error::CliError;
use crate::render::{Align, Table, quantity};

#[derive(Debug, Serialize)]
struct BalanceReport<'a> {
    as_of: NaiveDate,
    total_balance: rust_decimal::Decimal,
    lots: &'a [LotSummary],
}

/// List every lot whose final balance is above the tolerance.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(session: &Session, query: &LotQuery) -> Result<String, CliError> {
    let lots = positive_balances(
        &audit::summaries(session, query),
        session.settings.tolerance,
    );
    let totals = AuditTotals::from_summaries(&lots);
    info!(lots = totals.lots, "Balance listing complete");

    match session.format {
        OutputFormat::Json => to_json(&BalanceReport {
            as_of: session.as_of,
            total_balance: totals.total_balance,
            lots: &lots,
        }),
        OutputFormat::Table => {
            let mut table = Table::new(&[
                ("Product", Align::Left),
                ("Lot", Align::Left),
                ("Type", Align::Left),
                ("Balance", Align::Right),
                ("Location", Align::Left),
                ("Status", Align::Left),
            ]);
            for lot in &lots {
                table.push_row(vec![
                    lot.product_code.to_string(),
                    lot.lot_number.to_string(),
                    lot.fg_type.to_string(),
                    quantity(lot.final_balance),
                    lot.location.clone().unwrap_or_default(),
                    lot.status.to_string(),
                ]);
            }
            let mut out = format!("Lots with stock on hand as of {}\n\n", session.as_of);
            out.push_str(&table.render());
            out.push_str(&format!(
                "\n{} lots; total balance {}\n",
                totals.lots,
                quantity(totals.total_balance)
            ));
            Ok(out)
        }
    }
}
