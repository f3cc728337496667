//! Normalization of raw inventory rows into [`Movement`]s.
//!
//! Upstream tables are loose: codes carry stray whitespace, quantities may be
//! missing, dates may be absent. [`MovementIntake`] applies the same
//! coercions the reporting queries always did before any ledger is replayed:
//!
//! - product codes and lot numbers are trimmed and upper-cased,
//! - rows with a blank product code or lot number are skipped,
//! - missing quantities count as zero,
//! - transactions without a date, or dated after the cutoff, are skipped,
//! - an unrecognized `fg_type` is ignored in favor of the product-code
//!   inference and recorded as an [`IgnoredValue`].
//!
//! Accepted rows get sequential [`MovementId`]s in acceptance order. Once
//! the id space is used up every further row is skipped.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::Movement;
use crate::types::{FgType, LotNumber, MovementId, ProductCode};

/// A row of the beginning-inventory sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginningInventoryRow {
    pub product_code: Option<String>,
    pub lot_number: Option<String>,
    pub qty: Option<Decimal>,
    /// Explicit family; inferred from the product code when absent.
    pub fg_type: Option<String>,
    pub location: Option<String>,
}

/// A row of the transactions table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub product_code: Option<String>,
    pub lot_number: Option<String>,
    pub quantity_in: Option<Decimal>,
    pub quantity_out: Option<Decimal>,
    pub transaction_date: Option<NaiveDate>,
    pub transaction_type: Option<String>,
    pub source_ref_no: Option<String>,
    pub warehouse: Option<String>,
}

/// Which upstream table a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSource {
    BeginningInventory,
    Transactions,
}

impl std::fmt::Display for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeginningInventory => write!(f, "beginning_inventory"),
            Self::Transactions => write!(f, "transactions"),
        }
    }
}

/// Why a row was not turned into a movement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[error("product code is missing or blank")]
    MissingProductCode,
    #[error("lot number is missing or blank")]
    MissingLotNumber,
    #[error("code is invalid: {0}")]
    InvalidCode(String),
    #[error("transaction date is missing")]
    MissingTransactionDate,
    #[error("transaction dated {date} is after the {as_of} cutoff")]
    AfterCutoff { date: NaiveDate, as_of: NaiveDate },
    #[error("no movement ids left")]
    IdsExhausted,
}

/// A rejected row and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub source: RowSource,
    /// Zero-based position within its source.
    pub position: usize,
    pub reason: SkipReason,
}

/// A field value dropped from an accepted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredValue {
    pub source: RowSource,
    /// Zero-based position within its source.
    pub position: usize,
    pub field: &'static str,
    pub value: String,
}

/// Outcome of an intake run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeBatch {
    pub movements: Vec<Movement>,
    pub skipped: Vec<SkippedRow>,
    pub ignored: Vec<IgnoredValue>,
}

/// Accumulates raw rows into movements for a given cutoff date.
#[derive(Debug, Clone)]
pub struct MovementIntake {
    as_of: NaiveDate,
    next_id: Option<i32>,
    beginning_seen: usize,
    transactions_seen: usize,
    batch: IntakeBatch,
}

impl MovementIntake {
    /// Start an intake for movements up to and including `as_of`.
    #[must_use]
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            next_id: Some(1),
            beginning_seen: 0,
            transactions_seen: 0,
            batch: IntakeBatch::default(),
        }
    }

    /// The cutoff date of this intake.
    #[must_use]
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Accept a beginning-inventory row.
    ///
    /// Returns the assigned id, or `None` if the row was skipped.
    pub fn push_beginning(&mut self, row: BeginningInventoryRow) -> Option<MovementId> {
        let position = self.beginning_seen;
        self.beginning_seen += 1;

        let codes = normalize_codes(row.product_code.as_deref(), row.lot_number.as_deref());
        let (product_code, lot_number) = match codes {
            Ok(codes) => codes,
            Err(reason) => {
                self.skip(RowSource::BeginningInventory, position, reason);
                return None;
            }
        };

        let Some(id) = self.allocate_id() else {
            self.skip(
                RowSource::BeginningInventory,
                position,
                SkipReason::IdsExhausted,
            );
            return None;
        };

        let inferred = FgType::from_product_code(&product_code);
        let fg_type = match non_blank(row.fg_type) {
            None => inferred,
            Some(raw) => raw.parse::<FgType>().unwrap_or_else(|_| {
                self.batch.ignored.push(IgnoredValue {
                    source: RowSource::BeginningInventory,
                    position,
                    field: "fg_type",
                    value: raw,
                });
                inferred
            }),
        };

        let mut movement = Movement::beginning(
            id,
            product_code,
            lot_number,
            row.qty.unwrap_or_default(),
        )
        .with_fg_type(fg_type)
        .with_transaction_type("BEGINV");
        movement.location = non_blank(row.location);
        self.batch.movements.push(movement);
        Some(id)
    }

    /// Accept a transaction row.
    ///
    /// Returns the assigned id, or `None` if the row was skipped.
    pub fn push_transaction(&mut self, row: TransactionRow) -> Option<MovementId> {
        let position = self.transactions_seen;
        self.transactions_seen += 1;

        let codes = normalize_codes(row.product_code.as_deref(), row.lot_number.as_deref());
        let (product_code, lot_number) = match codes {
            Ok(codes) => codes,
            Err(reason) => {
                self.skip(RowSource::Transactions, position, reason);
                return None;
            }
        };

        let Some(date) = row.transaction_date else {
            self.skip(
                RowSource::Transactions,
                position,
                SkipReason::MissingTransactionDate,
            );
            return None;
        };
        if date > self.as_of {
            let as_of = self.as_of;
            self.skip(
                RowSource::Transactions,
                position,
                SkipReason::AfterCutoff { date, as_of },
            );
            return None;
        }

        let Some(id) = self.allocate_id() else {
            self.skip(RowSource::Transactions, position, SkipReason::IdsExhausted);
            return None;
        };
        let mut movement = Movement::transaction(
            id,
            product_code,
            lot_number,
            date,
            row.quantity_in.unwrap_or_default(),
            row.quantity_out.unwrap_or_default(),
        );
        movement.transaction_type = non_blank(row.transaction_type);
        movement.source_ref_no = non_blank(row.source_ref_no);
        movement.location = non_blank(row.warehouse);
        self.batch.movements.push(movement);
        Some(id)
    }

    /// Accept every row of both sources, beginning inventory first.
    pub fn extend(
        &mut self,
        beginning: impl IntoIterator<Item = BeginningInventoryRow>,
        transactions: impl IntoIterator<Item = TransactionRow>,
    ) {
        for row in beginning {
            self.push_beginning(row);
        }
        for row in transactions {
            self.push_transaction(row);
        }
    }

    /// Finish the intake.
    #[must_use]
    pub fn finish(self) -> IntakeBatch {
        self.batch
    }

    fn allocate_id(&mut self) -> Option<MovementId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(MovementId::new(id))
    }

    fn skip(&mut self, source: RowSource, position: usize, reason: SkipReason) {
        self.batch.skipped.push(SkippedRow {
            source,
            position,
            reason,
        });
    }
}

fn normalize_codes(
    product: Option<&str>,
    lot: Option<&str>,
) -> Result<(ProductCode, LotNumber), SkipReason> {
    let product = product
        .filter(|s| !s.trim().is_empty())
        .ok_or(SkipReason::MissingProductCode)?;
    let lot = lot
        .filter(|s| !s.trim().is_empty())
        .ok_or(SkipReason::MissingLotNumber)?;
    let product = ProductCode::parse(product).map_err(|e| SkipReason::InvalidCode(e.to_string()))?;
    let lot = LotNumber::parse(lot).map_err(|e| SkipReason::InvalidCode(e.to_string()))?;
    Ok((product, lot))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
