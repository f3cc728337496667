//! Derived views over lot summaries.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::LotSummary;
use crate::types::{AuditStatus, FgType, ProductCode};

/// Order summaries for the audit report.
///
/// Status text descending, then product code, then lot number. Because the
/// status is compared as text, `OK` lots come before `ERROR` lots.
pub fn sort_for_audit(summaries: &mut [LotSummary]) {
    summaries.sort_by(|a, b| {
        Reverse(a.status.to_string())
            .cmp(&Reverse(b.status.to_string()))
            .then_with(|| a.product_code.cmp(&b.product_code))
            .then_with(|| a.lot_number.cmp(&b.lot_number))
    });
}

/// Lots holding a balance strictly above `tolerance`.
#[must_use]
pub fn positive_balances(summaries: &[LotSummary], tolerance: Decimal) -> Vec<LotSummary> {
    summaries
        .iter()
        .filter(|s| s.final_balance > tolerance)
        .cloned()
        .collect()
}

/// On-hand totals for one product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductBalance {
    pub product_code: ProductCode,
    pub fg_type: FgType,
    pub lot_count: usize,
    pub error_lot_count: usize,
    pub total_balance: Decimal,
}

/// Sum lot balances per product code, ordered by product code.
#[must_use]
pub fn rollup_by_product(summaries: &[LotSummary]) -> Vec<ProductBalance> {
    let mut by_product: BTreeMap<&ProductCode, ProductBalance> = BTreeMap::new();
    for summary in summaries {
        let entry = by_product
            .entry(&summary.product_code)
            .or_insert_with(|| ProductBalance {
                product_code: summary.product_code.clone(),
                fg_type: summary.fg_type,
                lot_count: 0,
                error_lot_count: 0,
                total_balance: Decimal::ZERO,
            });
        entry.fg_type = entry.fg_type.max(summary.fg_type);
        entry.lot_count += 1;
        if summary.status.is_error() {
            entry.error_lot_count += 1;
        }
        entry.total_balance += summary.final_balance;
    }
    by_product.into_values().collect()
}

/// Report footer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditTotals {
    pub lots: usize,
    pub ok_lots: usize,
    pub error_lots: usize,
    pub total_balance: Decimal,
}

impl AuditTotals {
    #[must_use]
    pub fn from_summaries(summaries: &[LotSummary]) -> Self {
        summaries.iter().fold(Self::default(), |mut totals, s| {
            totals.lots += 1;
            match s.status {
                AuditStatus::Ok => totals.ok_lots += 1,
                AuditStatus::Error => totals.error_lots += 1,
            }
            totals.total_balance += s.final_balance;
            totals
        })
    }
}
