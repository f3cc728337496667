//! FG Inventory Core - Lot ledger reconstruction for finished-goods stock.
//!
//! This crate is shared by the inventory tooling:
//! - `cli` - Command-line audit and balance reports
//! - `integration-tests` - Black-box checks of the ledger
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no logging. Movement data is handed in by the caller and
//! every report is recomputed from it on each call.
//!
//! # Modules
//!
//! - [`types`] - Normalized codes, ids, statuses and quantity tolerance
//! - [`ledger`] - Per-lot replay, running balances and audit summaries
//! - [`intake`] - Normalization of raw upstream rows into movements

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod intake;
pub mod ledger;
pub mod types;

pub use types::*;
