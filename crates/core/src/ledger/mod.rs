//! Lot ledger reconstruction.
//!
//! Given the beginning inventory and the dated transactions of any number of
//! lots, replays each lot's movements in a total order and derives its running
//! balances, totals and negative-balance audit status.
//!
//! # Replay order
//!
//! Within a lot, movements are sorted by `(kind, occurred_at, id)`:
//!
//! 1. beginning inventory before transactions ([`MovementKind`] ordering),
//! 2. undated movements before dated ones (`None < Some`, the source's
//!    `NULLS FIRST`),
//! 3. the movement's row id, so same-day transactions replay in insertion
//!    order no matter how the input slice is arranged.
//!
//! Movements with identical keys keep their relative input order.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fg_inventory_core::ledger::{Movement, compute_lot_ledger};
//! use fg_inventory_core::{AuditStatus, LotNumber, MovementId, ProductCode};
//! use rust_decimal::Decimal;
//!
//! let lot = LotNumber::parse("lot-1").unwrap();
//! let product = ProductCode::parse("fg100").unwrap();
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//!
//! let movements = vec![
//!     Movement::beginning(MovementId::new(1), product.clone(), lot.clone(), Decimal::from(100)),
//!     Movement::transaction(MovementId::new(2), product.clone(), lot.clone(), day(2), Decimal::ZERO, Decimal::from(130)),
//! ];
//!
//! let summaries = compute_lot_ledger(&movements, day(31));
//! assert_eq!(summaries.len(), 1);
//! assert_eq!(summaries[0].final_balance, Decimal::from(-30));
//! assert_eq!(summaries[0].status, AuditStatus::Error);
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    AuditStatus, BALANCE_TOLERANCE, FgType, LotNumber, MovementId, MovementKind, ProductCode,
    is_below_zero, is_effectively_zero,
};

pub mod query;
pub mod report;

pub use query::{LotQuery, retain_as_of};
pub use report::{AuditTotals, ProductBalance, positive_balances, rollup_by_product, sort_for_audit};

// =============================================================================
// Input
// =============================================================================

/// One quantity change applied to a lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Row insertion id; the last replay tiebreak.
    pub id: MovementId,
    /// Lot the movement applies to.
    pub lot_number: LotNumber,
    /// Product the lot belongs to.
    pub product_code: ProductCode,
    /// Finished-goods family of the row.
    pub fg_type: FgType,
    /// Beginning inventory or transaction.
    pub kind: MovementKind,
    /// Transaction date; `None` for beginning inventory.
    pub occurred_at: Option<NaiveDate>,
    /// Quantity received.
    pub quantity_in: Decimal,
    /// Quantity issued.
    pub quantity_out: Decimal,
    /// Transaction type as recorded upstream (e.g. `IN`, `OUT`).
    pub transaction_type: Option<String>,
    /// Upstream document reference.
    pub source_ref_no: Option<String>,
    /// Warehouse or storage location.
    pub location: Option<String>,
}

impl Movement {
    /// A beginning-inventory movement: a single undated IN.
    #[must_use]
    pub fn beginning(
        id: MovementId,
        product_code: ProductCode,
        lot_number: LotNumber,
        quantity: Decimal,
    ) -> Self {
        Self {
            id,
            fg_type: FgType::from_product_code(&product_code),
            lot_number,
            product_code,
            kind: MovementKind::BeginningInventory,
            occurred_at: None,
            quantity_in: quantity,
            quantity_out: Decimal::ZERO,
            transaction_type: None,
            source_ref_no: None,
            location: None,
        }
    }

    /// A dated transaction movement.
    #[must_use]
    pub fn transaction(
        id: MovementId,
        product_code: ProductCode,
        lot_number: LotNumber,
        occurred_at: NaiveDate,
        quantity_in: Decimal,
        quantity_out: Decimal,
    ) -> Self {
        Self {
            id,
            fg_type: FgType::from_product_code(&product_code),
            lot_number,
            product_code,
            kind: MovementKind::Transaction,
            occurred_at: Some(occurred_at),
            quantity_in,
            quantity_out,
            transaction_type: None,
            source_ref_no: None,
            location: None,
        }
    }

    /// Override the family inferred from the product code.
    #[must_use]
    pub const fn with_fg_type(mut self, fg_type: FgType) -> Self {
        self.fg_type = fg_type;
        self
    }

    /// Attach the upstream transaction type.
    #[must_use]
    pub fn with_transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    /// Attach the upstream document reference.
    #[must_use]
    pub fn with_source_ref_no(mut self, source_ref_no: impl Into<String>) -> Self {
        self.source_ref_no = Some(source_ref_no.into());
        self
    }

    /// Attach a location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Net effect on the lot balance.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.quantity_in - self.quantity_out
    }

    fn replay_key(&self) -> (MovementKind, Option<NaiveDate>, MovementId) {
        (self.kind, self.occurred_at, self.id)
    }
}

/// Knobs for ledger reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Magnitude under which a balance counts as zero, applied both to the
    /// zero-net filter and to negative-balance detection.
    pub tolerance: Decimal,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            tolerance: BALANCE_TOLERANCE,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// The running balance after one replayed movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotLedgerEntry {
    /// Id of the replayed movement.
    pub movement_id: MovementId,
    /// Beginning inventory or transaction.
    pub kind: MovementKind,
    /// Transaction date; `None` for beginning inventory.
    pub occurred_at: Option<NaiveDate>,
    /// Quantity received.
    pub quantity_in: Decimal,
    /// Quantity issued.
    pub quantity_out: Decimal,
    /// Balance after applying this movement.
    pub running_balance: Decimal,
    /// Whether `running_balance` is below zero beyond tolerance.
    pub negative: bool,
    /// Upstream transaction type, if any.
    pub transaction_type: Option<String>,
    /// Upstream document reference, if any.
    pub source_ref_no: Option<String>,
    /// Location, if any.
    pub location: Option<String>,
}

/// Aggregate view of one lot's replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotSummary {
    pub lot_number: LotNumber,
    /// Greatest product code seen on the lot's rows.
    pub product_code: ProductCode,
    pub fg_type: FgType,
    pub total_in: Decimal,
    pub total_out: Decimal,
    /// Running balance after the last movement.
    pub final_balance: Decimal,
    /// Lowest running balance reached during replay.
    pub minimum_running_balance: Decimal,
    pub status: AuditStatus,
    pub movement_count: usize,
    /// Where the lot is stored: the location of its latest transaction, or
    /// of its beginning inventory if it has no transactions.
    pub location: Option<String>,
    /// Cutoff date the movements were selected for.
    pub as_of: NaiveDate,
}

impl LotSummary {
    /// `total_in - total_out`; equals `final_balance` by construction.
    #[must_use]
    pub fn calculated_difference(&self) -> Decimal {
        self.total_in - self.total_out
    }
}

/// A lot's full replay: every step plus the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotLedger {
    pub summary: LotSummary,
    pub entries: Vec<LotLedgerEntry>,
}

impl LotLedger {
    /// Running balances in replay order.
    #[must_use]
    pub fn running_balances(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.running_balance).collect()
    }

    /// First entry whose running balance went negative.
    #[must_use]
    pub fn first_negative(&self) -> Option<&LotLedgerEntry> {
        self.entries.iter().find(|e| e.negative)
    }
}

// =============================================================================
// Reconstruction
// =============================================================================

/// Summarize every lot that still holds stock or ever went negative.
///
/// `movements` must already be restricted to the `as_of_date` cutoff (see
/// [`retain_as_of`]); the date is recorded on each summary, not applied.
/// Uses the default 0.001 tolerance. Output is ordered by lot number.
#[must_use]
pub fn compute_lot_ledger(movements: &[Movement], as_of_date: NaiveDate) -> Vec<LotSummary> {
    compute_lot_ledger_with(movements, as_of_date, &LedgerSettings::default())
}

/// [`compute_lot_ledger`] with explicit settings.
#[must_use]
pub fn compute_lot_ledger_with(
    movements: &[Movement],
    as_of_date: NaiveDate,
    settings: &LedgerSettings,
) -> Vec<LotSummary> {
    reconstruct_ledgers(movements, as_of_date, settings)
        .into_iter()
        .map(|ledger| ledger.summary)
        .filter(|summary| is_reportable(summary, settings.tolerance))
        .collect()
}

/// Replay every lot present in `movements`, without the zero-net filter.
///
/// Ordered by lot number.
#[must_use]
pub fn reconstruct_ledgers(
    movements: &[Movement],
    as_of_date: NaiveDate,
    settings: &LedgerSettings,
) -> Vec<LotLedger> {
    let mut by_lot: BTreeMap<&LotNumber, Vec<&Movement>> = BTreeMap::new();
    for movement in movements {
        by_lot.entry(&movement.lot_number).or_default().push(movement);
    }

    by_lot
        .into_values()
        .filter_map(|lot_movements| replay(lot_movements, as_of_date, settings))
        .collect()
}

/// Replay a single lot for drill-down.
///
/// Returns `None` if no movement belongs to `lot`.
#[must_use]
pub fn lot_audit_trail(
    lot: &LotNumber,
    movements: &[Movement],
    as_of_date: NaiveDate,
    settings: &LedgerSettings,
) -> Option<LotLedger> {
    let lot_movements = movements
        .iter()
        .filter(|m| &m.lot_number == lot)
        .collect();
    replay(lot_movements, as_of_date, settings)
}

/// A lot is kept if it still holds a non-zero balance or ever went negative.
fn is_reportable(summary: &LotSummary, tolerance: Decimal) -> bool {
    !is_effectively_zero(summary.final_balance, tolerance) || summary.status.is_error()
}

fn replay(
    mut movements: Vec<&Movement>,
    as_of_date: NaiveDate,
    settings: &LedgerSettings,
) -> Option<LotLedger> {
    movements.sort_by_key(|m| m.replay_key());
    let first = movements.first()?;

    let lot_number = first.lot_number.clone();
    let mut product_code = &first.product_code;
    let mut fg_type = first.fg_type;
    let mut total_in = Decimal::ZERO;
    let mut total_out = Decimal::ZERO;
    let mut running = Decimal::ZERO;
    let mut minimum: Option<Decimal> = None;
    let mut entries = Vec::with_capacity(movements.len());

    for movement in &movements {
        running += movement.net();
        total_in += movement.quantity_in;
        total_out += movement.quantity_out;
        minimum = Some(minimum.map_or(running, |min| min.min(running)));

        if movement.product_code > *product_code {
            product_code = &movement.product_code;
        }
        fg_type = fg_type.max(movement.fg_type);

        entries.push(LotLedgerEntry {
            movement_id: movement.id,
            kind: movement.kind,
            occurred_at: movement.occurred_at,
            quantity_in: movement.quantity_in,
            quantity_out: movement.quantity_out,
            running_balance: running,
            negative: is_below_zero(running, settings.tolerance),
            transaction_type: movement.transaction_type.clone(),
            source_ref_no: movement.source_ref_no.clone(),
            location: movement.location.clone(),
        });
    }

    let location = movements
        .iter()
        .rev()
        .find(|m| m.kind == MovementKind::Transaction)
        .or(Some(first))
        .and_then(|m| m.location.clone());

    let minimum_running_balance = minimum.unwrap_or_default();
    let status = if is_below_zero(minimum_running_balance, settings.tolerance) {
        AuditStatus::Error
    } else {
        AuditStatus::Ok
    };

    Some(LotLedger {
        summary: LotSummary {
            lot_number,
            product_code: product_code.clone(),
            fg_type,
            total_in,
            total_out,
            final_balance: running,
            minimum_running_balance,
            status,
            movement_count: entries.len(),
            location,
            as_of: as_of_date,
        },
        entries,
    })
}
