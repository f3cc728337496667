//! Newtype IDs for type-safe record references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different record types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// IDs are ordered so they can serve as a stable sort key.
///
/// # Example
///
/// ```rust
/// # use fg_inventory_core::define_id;
/// define_id!(BatchId);
/// define_id!(EndorsementId);
///
/// let batch_id = BatchId::new(1);
/// let endorsement_id = EndorsementId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: BatchId = endorsement_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Row insertion id of a movement; the tiebreak after kind and date.
define_id!(MovementId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_id_ordering() {
        assert!(MovementId::new(1) < MovementId::new(2));
        assert_eq!(MovementId::from(7).as_i32(), 7);
        assert_eq!(i32::from(MovementId::new(3)), 3);
    }

    #[test]
    fn test_movement_id_serde_transparent() {
        let json = serde_json::to_string(&MovementId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
