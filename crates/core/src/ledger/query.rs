//! Pre- and post-filters around reconstruction.

use chrono::NaiveDate;

use super::{LotSummary, Movement};
use crate::types::{FgType, MovementKind};

/// Optional filters applied to lot summaries.
///
/// Product and lot filters are case-insensitive substring matches; blank
/// filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotQuery {
    /// Substring of the product code.
    pub product: Option<String>,
    /// Substring of the lot number.
    pub lot: Option<String>,
    /// Exact finished-goods family.
    pub fg_type: Option<FgType>,
}

impl LotQuery {
    /// Returns true if `summary` passes every configured filter.
    #[must_use]
    pub fn matches(&self, summary: &LotSummary) -> bool {
        let product_ok = self
            .product
            .as_deref()
            .is_none_or(|needle| summary.product_code.contains_ignore_case(needle));
        let lot_ok = self
            .lot
            .as_deref()
            .is_none_or(|needle| summary.lot_number.contains_ignore_case(needle));
        let fg_ok = self.fg_type.is_none_or(|fg| summary.fg_type == fg);
        product_ok && lot_ok && fg_ok
    }

    /// Keep only the summaries matching this query, preserving order.
    #[must_use]
    pub fn apply(&self, summaries: Vec<LotSummary>) -> Vec<LotSummary> {
        summaries.into_iter().filter(|s| self.matches(s)).collect()
    }

    /// Returns true if no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product.is_none() && self.lot.is_none() && self.fg_type.is_none()
    }
}

/// Drop transactions dated after `as_of`.
///
/// Beginning inventory is always kept. Callers apply this before
/// [`super::compute_lot_ledger`].
pub fn retain_as_of(movements: &mut Vec<Movement>, as_of: NaiveDate) {
    movements.retain(|m| match m.kind {
        MovementKind::BeginningInventory => true,
        MovementKind::Transaction => m.occurred_at.is_some_and(|date| date <= as_of),
    });
}
