//! Movement files: reading, parsing and intake.
//!
//! Each input file holds a list of rows, either as YAML or JSON (picked by
//! extension):
//!
//! ```yaml
//! # beginning inventory
//! - product_code: FG100
//!   lot_number: LOT-1
//!   qty: "100"
//!
//! # transactions
//! - product_code: FG100
//!   lot_number: LOT-1
//!   transaction_date: 2025-03-02
//!   transaction_type: OUT
//!   quantity_out: "30"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fg_inventory_core::intake::{BeginningInventoryRow, IntakeBatch, MovementIntake, TransactionRow};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(CliError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parse a list of rows from file contents.
///
/// # Errors
///
/// Returns an error if the extension is unsupported or the content does not
/// parse as a list of `T`.
pub fn parse_rows<T: DeserializeOwned>(path: &Path, content: &str) -> Result<Vec<T>, CliError> {
    match FileFormat::from_path(path)? {
        FileFormat::Yaml => {
            // An empty YAML document is an empty list, not an error.
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_yaml::from_str(content).map_err(|source| CliError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        FileFormat::Json => serde_json::from_str(content).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn read_rows<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, CliError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    debug!(path = %path.display(), "Reading movement file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_rows(path, &content)
}

/// Where to read movements from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFiles {
    pub beginning: Option<PathBuf>,
    pub transactions: Option<PathBuf>,
}

/// Read both files and normalize their rows for the `as_of` cutoff.
///
/// # Errors
///
/// Returns an error if neither file is given, or if a file cannot be read
/// or parsed.
pub async fn load_movements(files: &MovementFiles, as_of: NaiveDate) -> Result<IntakeBatch, CliError> {
    if files.beginning.is_none() && files.transactions.is_none() {
        return Err(CliError::NoInput);
    }

    let (beginning, transactions) = tokio::try_join!(
        read_rows::<BeginningInventoryRow>(files.beginning.as_deref()),
        read_rows::<TransactionRow>(files.transactions.as_deref()),
    )?;

    Ok(intake_rows(beginning, transactions, as_of))
}

/// Run rows through intake, logging every skipped row.
#[must_use]
pub fn intake_rows(
    beginning: Vec<BeginningInventoryRow>,
    transactions: Vec<TransactionRow>,
    as_of: NaiveDate,
) -> IntakeBatch {
    let beginning_rows = beginning.len();
    let transaction_rows = transactions.len();

    let mut intake = MovementIntake::new(as_of);
    intake.extend(beginning, transactions);
    let batch = intake.finish();

    for skipped in &batch.skipped {
        warn!(
            source = %skipped.source,
            position = skipped.position,
            reason = %skipped.reason,
            "Skipping row"
        );
    }
    for ignored in &batch.ignored {
        warn!(
            source = %ignored.source,
            position = ignored.position,
            field = ignored.field,
            value = %ignored.value,
            "Ignoring unrecognized value"
        );
    }
    info!(
        %as_of,
        beginning_rows,
        transaction_rows,
        movements = batch.movements.len(),
        skipped = batch.skipped.len(),
        ignored = batch.ignored.len(),
        "Loaded movements"
    );

    batch
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_yaml_rows() {
        let yaml = r#"
- product_code: fg100
  lot_number: lot-1
  qty: "100"
- product_code: FG-200
  lot_number: LOT-2
  qty: 7.5
  fg_type: MB
"#;
        let rows: Vec<BeginningInventoryRow> =
            parse_rows(Path::new("beginv.yaml"), yaml).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].qty, Some(Decimal::from(100)));
        assert_eq!(rows[1].fg_type.as_deref(), Some("MB"));
    }

    #[test]
    fn test_parse_json_rows() {
        let json = r#"[{"product_code":"FG100","lot_number":"L1","transaction_date":"2025-03-02","quantity_out":"30"}]"#;
        let rows: Vec<TransactionRow> = parse_rows(Path::new("tx.JSON"), json).unwrap();
        assert_eq!(rows[0].quantity_out, Some(Decimal::from(30)));
        assert_eq!(rows[0].quantity_in, None);
    }

    #[test]
    fn test_empty_yaml_is_empty_list() {
        let rows: Vec<TransactionRow> = parse_rows(Path::new("tx.yml"), "  \n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let result: Result<Vec<TransactionRow>, _> = parse_rows(Path::new("tx.csv"), "");
        assert!(matches!(result, Err(CliError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result: Result<Vec<TransactionRow>, _> = parse_rows(Path::new("tx.json"), "{");
        assert!(matches!(result, Err(CliError::Json { .. })));
    }

    #[tokio::test]
    async fn test_load_requires_input() {
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let result = load_movements(&MovementFiles::default(), as_of).await;
        assert!(matches!(result, Err(CliError::NoInput)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let files = MovementFiles {
            beginning: Some(PathBuf::from("/nonexistent/fgi/beginv.yaml")),
            transactions: None,
        };
        let result = load_movements(&files, as_of).await;
        assert!(matches!(result, Err(CliError::Read { .. })));
    }

    #[test]
    fn test_intake_rows_keeps_row_with_unknown_fg_type() {
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let row = BeginningInventoryRow {
            product_code: Some("FG100".to_string()),
            lot_number: Some("L1".to_string()),
            qty: Some(Decimal::ONE),
            fg_type: Some("FG".to_string()),
            ..BeginningInventoryRow::default()
        };
        let batch = intake_rows(vec![row], Vec::new(), as_of);
        assert_eq!(batch.movements.len(), 1);
        assert_eq!(batch.ignored.len(), 1);
        assert_eq!(batch.ignored[0].value, "FG");
    }

    #[test]
    fn test_intake_rows_applies_cutoff() {
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let tx = |d: u32| TransactionRow {
            product_code: Some("FG100".to_string()),
            lot_number: Some("L1".to_string()),
            quantity_in: Some(Decimal::ONE),
            transaction_date: NaiveDate::from_ymd_opt(2025, 3, d),
            ..TransactionRow::default()
        };
        let batch = intake_rows(Vec::new(), vec![tx(1), tx(2), tx(3)], as_of);
        assert_eq!(batch.movements.len(), 2);
        assert_eq!(batch.skipped.len(), 1);
    }
}
