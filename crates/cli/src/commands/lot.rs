//! Lot audit trail: every movement of one lot with its running balance.
//!
//! # Usage
//!
//! ```bash
//! fgi --as-of 2025-09-30 lot LOT-0042
//! ```

use fg_inventory_core::LotNumber;
use fg_inventory_core::ledger::{LotLedger, lot_audit_trail};
use tracing::{info, warn};

use super::{Session, to_json};
use crate::config::OutputFormat;
use crate::error::CliError;
use crate::render::{Align, Table, quantity};

/// Run the lot audit trail.
///
/// # Errors
///
/// Returns an error if the lot number is blank, the lot has no movements, or
/// JSON serialization fails.
pub fn run(session: &Session, lot: &str) -> Result<String, CliError> {
    let lot_number = LotNumber::parse(lot)?;
    let ledger = lot_audit_trail(
        &lot_number,
        &session.movements,
        session.as_of,
        &session.settings,
    )
    .ok_or_else(|| CliError::LotNotFound(lot_number.to_string()))?;

    if let Some(entry) = ledger.first_negative() {
        warn!(
            lot = %lot_number,
            movement_id = %entry.movement_id,
            balance = %entry.running_balance,
            "Running balance went negative"
        );
    }
    info!(lot = %lot_number, movements = ledger.entries.len(), "Lot audit complete");

    match session.format {
        OutputFormat::Json => to_json(&ledger),
        OutputFormat::Table => Ok(render_table(&ledger)),
    }
}

fn render_table(ledger: &LotLedger) -> String {
    let summary = &ledger.summary;
    let mut table = Table::new(&[
        ("Source", Align::Left),
        ("Date", Align::Left),
        ("Type", Align::Left),
        ("Qty In", Align::Right),
        ("Qty Out", Align::Right),
        ("Running Balance", Align::Right),
        ("Ref", Align::Left),
        ("", Align::Left),
    ]);
    for entry in &ledger.entries {
        table.push_row(vec![
            entry.kind.label().to_string(),
            entry
                .occurred_at
                .map_or_else(|| "---".to_string(), |d| d.to_string()),
            entry.transaction_type.clone().unwrap_or_default(),
            quantity(entry.quantity_in),
            quantity(entry.quantity_out),
            quantity(entry.running_balance),
            entry.source_ref_no.clone().unwrap_or_default(),
            if entry.negative {
                "NEGATIVE".to_string()
            } else {
                String::new()
            },
        ]);
    }

    let mut out = format!(
        "Lot audit trail: {} ({}, {}) as of {}\n\n",
        summary.lot_number, summary.product_code, summary.fg_type, summary.as_of
    );
    out.push_str(&table.render());
    out.push_str(&format!(
        "\nFinal calculated balance: {}\nMinimum running balance: {}\nStatus: {}\n",
        quantity(summary.final_balance),
        quantity(summary.minimum_running_balance),
        summary.status
    ));
    out
}
