//! Integration tests for the finished-goods lot ledger.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fg-inventory-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `ledger_properties` - Ordering, prefix-sum and reporting properties
//! - `ledger_randomized` - Seeded random ledgers checked against a naive replay
//! - `intake_files` - YAML/JSON rows through intake and into the audit
//!
//! This crate only holds shared fixtures.

use chrono::NaiveDate;
use fg_inventory_core::ledger::Movement;
use fg_inventory_core::{LotNumber, MovementId, ProductCode};
use rust_decimal::Decimal;

/// Builds movements with sequential ids, the way intake assigns them.
#[derive(Debug, Default)]
pub struct MovementBuilder {
    next_id: i32,
    movements: Vec<Movement>,
}

impl MovementBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> MovementId {
        self.next_id += 1;
        MovementId::new(self.next_id)
    }

    /// Add a beginning-inventory row.
    ///
    /// # Panics
    ///
    /// Panics if `product` or `lot` is blank.
    #[must_use]
    pub fn beginning(mut self, product: &str, lot: &str, qty: Decimal) -> Self {
        let id = self.next_id();
        self.movements
            .push(Movement::beginning(id, code(product), lot_number(lot), qty));
        self
    }

    /// Add a dated transaction.
    ///
    /// # Panics
    ///
    /// Panics if `product` or `lot` is blank.
    #[must_use]
    pub fn transaction(
        mut self,
        product: &str,
        lot: &str,
        date: NaiveDate,
        quantity_in: Decimal,
        quantity_out: Decimal,
    ) -> Self {
        let id = self.next_id();
        self.movements.push(Movement::transaction(
            id,
            code(product),
            lot_number(lot),
            date,
            quantity_in,
            quantity_out,
        ));
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<Movement> {
        self.movements
    }
}

/// Parse a product code fixture.
///
/// # Panics
///
/// Panics if `value` is blank or too long.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn code(value: &str) -> ProductCode {
    ProductCode::parse(value).unwrap()
}

/// Parse a lot number fixture.
///
/// # Panics
///
/// Panics if `value` is blank or too long.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn lot_number(value: &str) -> LotNumber {
    LotNumber::parse(value).unwrap()
}

/// A date in 2025.
///
/// # Panics
///
/// Panics if the month/day pair is not a calendar date.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// Whole-unit quantity.
#[must_use]
pub fn qty(units: i64) -> Decimal {
    Decimal::from(units)
}

/// Quantity in thousandths, e.g. `milli(-2)` is -0.002.
#[must_use]
pub fn milli(thousandths: i64) -> Decimal {
    Decimal::new(thousandths, 3)
}
