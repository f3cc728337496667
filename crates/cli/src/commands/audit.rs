//! Inventory audit summary.
//!
//! # Usage
//!
//! ```bash
//! # Every lot with stock or a negative history, as of today
//! fgi --beginning beginv.yaml --transactions tx.yaml audit
//!
//! # Only DC lots of products matching "blue", as of month end
//! fgi --as-of 2025-09-30 audit --product blue --fg-type DC
//! ```

use chrono::NaiveDate;
use fg_inventory_core::ledger::{
    AuditTotals, LotQuery, LotSummary, compute_lot_ledger_with, sort_for_audit,
};
use serde::Serialize;
use tracing::info;

use super::{Session, to_json};
use crate::config::OutputFormat;
use crate::error::CliError;
use crate::render::{Align, Table, quantity};

#[derive(Debug, Serialize)]
struct AuditReport<'a> {
    as_of: NaiveDate,
    totals: AuditTotals,
    lots: &'a [LotSummary],
}

/// Compute, filter and order the audit summaries.
#[must_use]
pub fn summaries(session: &Session, query: &LotQuery) -> Vec<LotSummary> {
    let mut summaries = query.apply(compute_lot_ledger_with(
        &session.movements,
        session.as_of,
        &session.settings,
    ));
    sort_for_audit(&mut summaries);
    summaries
}

/// Run the audit report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(session: &Session, query: &LotQuery) -> Result<String, CliError> {
    let lots = summaries(session, query);
    let totals = AuditTotals::from_summaries(&lots);
    info!(
        lots = totals.lots,
        error_lots = totals.error_lots,
        "Audit complete"
    );

    match session.format {
        OutputFormat::Json => to_json(&AuditReport {
            as_of: session.as_of,
            totals,
            lots: &lots,
        }),
        OutputFormat::Table => Ok(render_table(session.as_of, &lots, &totals)),
    }
}

fn render_table(as_of: NaiveDate, lots: &[LotSummary], totals: &AuditTotals) -> String {
    let mut table = Table::new(&[
        ("Product", Align::Left),
        ("Lot", Align::Left),
        ("Type", Align::Left),
        ("Final Balance", Align::Right),
        ("Total In", Align::Right),
        ("Total Out", Align::Right),
        ("Difference", Align::Right),
        ("Min Running", Align::Right),
        ("Location", Align::Left),
        ("Status", Align::Left),
    ]);
    for lot in lots {
        table.push_row(vec![
            lot.product_code.to_string(),
            lot.lot_number.to_string(),
            lot.fg_type.to_string(),
            quantity(lot.final_balance),
            quantity(lot.total_in),
            quantity(lot.total_out),
            quantity(lot.calculated_difference()),
            quantity(lot.minimum_running_balance),
            lot.location.clone().unwrap_or_default(),
            if lot.status.is_error() {
                "ERROR (Negative Stock)".to_string()
            } else {
                lot.status.to_string()
            },
        ]);
    }

    let mut out = format!("Inventory audit summary as of {as_of}\n\n");
    if table.is_empty() {
        out.push_str("No lots with stock or negative history.\n");
        return out;
    }
    out.push_str(&table.render());
    out.push_str(&format!(
        "\n{} lots: {} OK, {} ERROR; total balance {}\n",
        totals.lots,
        totals.ok_lots,
        totals.error_lots,
        quantity(totals.total_balance)
    ));
    out
}
