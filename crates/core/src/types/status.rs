//! Classification enums for movements and lots.

use serde::{Deserialize, Serialize};

use super::code::ProductCode;

/// Where a movement comes from.
///
/// The derived ordering is the primary replay key: beginning inventory is
/// always replayed before any transaction of the same lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Starting quantity of a lot as of system adoption.
    BeginningInventory,
    /// A dated IN/OUT transaction.
    Transaction,
}

impl MovementKind {
    /// Short label used in audit trails (`BEGINV` for beginning inventory).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeginningInventory => "BEGINV",
            Self::Transaction => "TRANSACTION",
        }
    }
}

/// Result of a lot's negative-balance audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    /// The running balance never dropped below the tolerance.
    #[default]
    Ok,
    /// The running balance went negative at least once.
    Error,
}

impl AuditStatus {
    /// Returns true for [`AuditStatus::Error`].
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" => Ok(Self::Ok),
            "ERROR" => Ok(Self::Error),
            _ => Err(format!("invalid audit status: {s}")),
        }
    }
}

/// Finished-goods family.
///
/// Declared `Dc` before `Mb` so the derived ordering matches the text
/// ordering of the codes; a lot's family is the maximum over its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FgType {
    #[serde(rename = "DC")]
    Dc,
    #[serde(rename = "MB")]
    Mb,
}

impl FgType {
    /// Infer the family from a product code: codes with a dash are `DC`.
    #[must_use]
    pub fn from_product_code(product: &ProductCode) -> Self {
        if product.as_str().contains('-') {
            Self::Dc
        } else {
            Self::Mb
        }
    }
}

impl std::fmt::Display for FgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dc => write!(f, "DC"),
            Self::Mb => write!(f, "MB"),
        }
    }
}

impl std::str::FromStr for FgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DC" => Ok(Self::Dc),
            "MB" => Ok(Self::Mb),
            _ => Err(format!("invalid fg type: {s}")),
        }
    }
}
