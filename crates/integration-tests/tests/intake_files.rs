//! Raw YAML/JSON rows through intake and into the audit.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use fg_inventory_core::intake::{
    BeginningInventoryRow, MovementIntake, RowSource, SkipReason, TransactionRow,
};
use fg_inventory_core::ledger::{
    AuditTotals, LotQuery, compute_lot_ledger, rollup_by_product, sort_for_audit,
};
use fg_inventory_core::{AuditStatus, FgType};
use fg_inventory_integration_tests::{date, qty};
use rust_decimal::Decimal;

const BEGINNING_YAML: &str = r#"
- product_code: fg100
  lot_number: " lot-1 "
  qty: "100"
  location: WH1
- product_code: FG-200
  lot_number: LOT-2
  qty: 40
- product_code: FG300
  lot_number: LOT-3
  qty: 12.5
  fg_type: DC
- product_code: ""
  lot_number: LOT-X
  qty: 5
"#;

const TRANSACTIONS_JSON: &str = r#"[
  {"product_code": "FG100", "lot_number": "LOT-1", "transaction_date": "2025-03-02",
   "transaction_type": "OUT", "quantity_out": "30", "source_ref_no": "DR-1"},
  {"product_code": "FG100", "lot_number": "LOT-1", "transaction_date": "2025-03-03",
   "transaction_type": "IN", "quantity_in": 10},
  {"product_code": "FG100", "lot_number": "LOT-1", "transaction_date": "2025-03-04",
   "transaction_type": "OUT", "quantity_out": "90", "warehouse": "WH2"},
  {"product_code": "FG-200", "lot_number": "LOT-2", "transaction_date": "2025-03-05",
   "quantity_out": "40"},
  {"product_code": "FG300", "lot_number": "LOT-3", "transaction_date": "2025-04-01",
   "quantity_out": "12.5"},
  {"product_code": "FG300", "lot_number": "LOT-3", "quantity_out": "1"}
]"#;

fn load() -> (Vec<BeginningInventoryRow>, Vec<TransactionRow>) {
    (
        serde_yaml::from_str(BEGINNING_YAML).unwrap(),
        serde_json::from_str(TRANSACTIONS_JSON).unwrap(),
    )
}

#[test]
fn test_rows_are_normalized_and_skipped() {
    let (beginning, transactions) = load();
    let mut intake = MovementIntake::new(date(3, 31));
    intake.extend(beginning, transactions);
    let batch = intake.finish();

    // 3 of 4 beginning rows, 4 of 6 transactions.
    assert_eq!(batch.movements.len(), 7);
    let ids: Vec<i32> = batch.movements.iter().map(|m| m.id.as_i32()).collect();
    assert_eq!(ids, (1..=7).collect::<Vec<_>>());

    let first = &batch.movements[0];
    assert_eq!(first.product_code.as_str(), "FG100");
    assert_eq!(first.lot_number.as_str(), "LOT-1");
    assert_eq!(first.location.as_deref(), Some("WH1"));
    assert_eq!(batch.movements[2].fg_type, FgType::Dc);

    let reasons: Vec<(RowSource, usize, &SkipReason)> = batch
        .skipped
        .iter()
        .map(|s| (s.source, s.position, &s.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (
                RowSource::BeginningInventory,
                3,
                &SkipReason::MissingProductCode
            ),
            (
                RowSource::Transactions,
                4,
                &SkipReason::AfterCutoff {
                    date: date(4, 1),
                    as_of: date(3, 31),
                }
            ),
            (
                RowSource::Transactions,
                5,
                &SkipReason::MissingTransactionDate
            ),
        ]
    );
}

#[test]
fn test_audit_from_files() {
    let (beginning, transactions) = load();
    let mut intake = MovementIntake::new(date(3, 31));
    intake.extend(beginning, transactions);
    let batch = intake.finish();

    let mut summaries = compute_lot_ledger(&batch.movements, date(3, 31));
    sort_for_audit(&mut summaries);

    // LOT-2 nets to zero and is dropped; the OK lot sorts first.
    let lots: Vec<&str> = summaries.iter().map(|s| s.lot_number.as_str()).collect();
    assert_eq!(lots, vec!["LOT-3", "LOT-1"]);
    assert_eq!(summaries[0].status, AuditStatus::Ok);
    assert_eq!(summaries[0].final_balance, Decimal::new(125, 1));
    assert_eq!(summaries[1].status, AuditStatus::Error);
    assert_eq!(summaries[1].final_balance, qty(-10));
    // Stored where the latest transaction left it, not at the beginning location.
    assert_eq!(summaries[1].location.as_deref(), Some("WH2"));

    let totals = AuditTotals::from_summaries(&summaries);
    assert_eq!(totals.lots, 2);
    assert_eq!(totals.error_lots, 1);
    assert_eq!(totals.total_balance, Decimal::new(25, 1));

    let dc_only = LotQuery {
        fg_type: Some(FgType::Dc),
        ..LotQuery::default()
    }
    .apply(summaries.clone());
    assert_eq!(dc_only.len(), 1);
    assert_eq!(dc_only[0].lot_number.as_str(), "LOT-3");

    let products = rollup_by_product(&summaries);
    let codes: Vec<&str> = products.iter().map(|p| p.product_code.as_str()).collect();
    assert_eq!(codes, vec!["FG100", "FG300"]);
}

#[test]
fn test_earlier_cutoff_changes_status() {
    let (beginning, transactions) = load();
    let mut intake = MovementIntake::new(date(3, 3));
    intake.extend(beginning, transactions);
    let batch = intake.finish();

    let summaries = compute_lot_ledger(&batch.movements, date(3, 3));
    let lot_1 = summaries
        .iter()
        .find(|s| s.lot_number.as_str() == "LOT-1")
        .unwrap();
    assert_eq!(lot_1.final_balance, qty(80));
    assert_eq!(lot_1.minimum_running_balance, qty(70));
    assert_eq!(lot_1.status, AuditStatus::Ok);
    // The WH2 transaction is after the cutoff; the latest one left carries no warehouse.
    assert_eq!(lot_1.location, None);
}
