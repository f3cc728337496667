//! Core types for finished-goods inventory.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod id;
pub mod quantity;
pub mod status;

pub use code::{CodeError, LotNumber, ProductCode};
pub use id::*;
pub use quantity::{BALANCE_TOLERANCE, is_below_zero, is_effectively_zero};
pub use status::*;
