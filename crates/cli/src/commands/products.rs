//! Per-product balance rollup.
//!
//! # Usage
//!
//! ```bash
//! fgi --as-of 2025-09-30 products --fg-type MB
//! ```

use chrono::NaiveDate;
use fg_inventory_core::ledger::{LotQuery, ProductBalance, rollup_by_product};
use serde::Serialize;
use tracing::info;

use super::{Session, audit, to_json};
use crate::config::OutputFormat;
use crate::error::CliError;
use crate::render::{Align, Table, quantity};

#[derive(Debug, Serialize)]
struct ProductReport<'a> {
    as_of: NaiveDate,
    products: &'a [ProductBalance],
}

/// Run the product rollup over the lots the audit would report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(session: &Session, query: &LotQuery) -> Result<String, CliError> {
    let products = rollup_by_product(&audit::summaries(session, query));
    info!(products = products.len(), "Product rollup complete");

    match session.format {
        OutputFormat::Json => to_json(&ProductReport {
            as_of: session.as_of,
            products: &products,
        }),
        OutputFormat::Table => Ok(render_table(session.as_of, &products)),
    }
}

fn render_table(as_of: NaiveDate, products: &[ProductBalance]) -> String {
    let mut table = Table::new(&[
        ("Product", Align::Left),
        ("Type", Align::Left),
        ("Lots", Align::Right),
        ("Error Lots", Align::Right),
        ("Balance", Align::Right),
    ]);
    for product in products {
        table.push_row(vec![
            product.product_code.to_string(),
            product.fg_type.to_string(),
            product.lot_count.to_string(),
            product.error_lot_count.to_string(),
            quantity(product.total_balance),
        ]);
    }

    let mut out = format!("Product balances as of {as_of}\n\n");
    out.push_str(&table.render());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use fg_inventory_core::ledger::{LedgerSettings, Movement};
    use fg_inventory_core::{FgType, LotNumber, MovementId, ProductCode};
    use rust_decimal::Decimal;

    use super::*;

    fn session(format: OutputFormat) -> Session {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let beginning = |id, product: &str, lot: &str, qty: i64| {
            Movement::beginning(
                MovementId::new(id),
                ProductCode::parse(product).unwrap(),
                LotNumber::parse(lot).unwrap(),
                Decimal::from(qty),
            )
        };
        Session {
            movements: vec![
                beginning(1, "FG100", "L1", 10),
                beginning(2, "FG100", "L2", 15),
                beginning(3, "FG-200", "L3", 4),
                Movement::transaction(
                    MovementId::new(4),
                    ProductCode::parse("FG-200").unwrap(),
                    LotNumber::parse("L3").unwrap(),
                    day,
                    Decimal::ZERO,
                    Decimal::from(6),
                ),
            ],
            as_of: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            settings: LedgerSettings::default(),
            format,
        }
    }

    #[test]
    fn test_table_output() {
        let out = run(&session(OutputFormat::Table), &LotQuery::default()).unwrap();
        assert!(out.starts_with("Product balances as of 2025-06-30"));
        let lines: Vec<&str> = out.lines().collect();
        // Title, blank line, header, rule, then one row per product.
        assert_eq!(lines.len(), 6);
        assert!(lines[4].starts_with("FG-200"));
        assert!(lines[4].ends_with("-2.000"));
        assert!(lines[5].starts_with("FG100"));
        assert!(lines[5].ends_with("25.000"));
    }

    #[test]
    fn test_json_output_with_filter() {
        let query = LotQuery {
            fg_type: Some(FgType::Mb),
            ..LotQuery::default()
        };
        let out = run(&session(OutputFormat::Json), &query).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let products = value["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["product_code"], "FG100");
        assert_eq!(products[0]["lot_count"], 2);
        assert_eq!(products[0]["total_balance"], "25");
    }
}
