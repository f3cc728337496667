//! Normalized product codes and lot numbers.
//!
//! Codes arrive from operators and legacy sheets with inconsistent case and
//! stray whitespace. Both are trimmed and upper-cased on construction, so two
//! codes compare equal exactly when the source's `UPPER(TRIM(..))` would.

/// Errors that can occur when parsing a code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// The input is empty after trimming.
    #[error("{kind} cannot be empty")]
    Empty {
        /// Which code was being parsed.
        kind: &'static str,
    },
    /// The input is too long.
    #[error("{kind} must be at most {max} characters")]
    TooLong {
        /// Which code was being parsed.
        kind: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
}

/// Macro to define a normalized code wrapper.
///
/// Creates a newtype around `String` that:
/// - trims and upper-cases its input in `parse()`
/// - rejects empty input and input longer than `MAX_LENGTH`
/// - (de)serializes as a plain string, normalizing on the way in
/// - orders and hashes by its normalized text
///
/// # Example
///
/// ```rust
/// # use fg_inventory_core::define_code;
/// define_code!(BinCode, "bin code");
///
/// let bin = BinCode::parse("  a-01 ").unwrap();
/// assert_eq!(bin.as_str(), "A-01");
/// assert!(BinCode::parse("   ").is_err());
/// ```
#[macro_export]
macro_rules! define_code {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Maximum length of the normalized code.
            pub const MAX_LENGTH: usize = 64;

            /// Parse and normalize a code.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is blank or longer than
            /// `MAX_LENGTH` characters after normalization.
            pub fn parse(s: &str) -> Result<Self, $crate::CodeError> {
                let normalized = s.trim().to_uppercase();
                if normalized.is_empty() {
                    return Err($crate::CodeError::Empty { kind: $kind });
                }
                // Upper-casing can lengthen text (`ß` becomes `SS`).
                if normalized.chars().count() > Self::MAX_LENGTH {
                    return Err($crate::CodeError::TooLong {
                        kind: $kind,
                        max: Self::MAX_LENGTH,
                    });
                }
                Ok(Self(normalized))
            }

            /// Returns the normalized code as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Case-insensitive substring match, as SQL `ILIKE '%needle%'`.
            ///
            /// A blank needle matches every code.
            #[must_use]
            pub fn contains_ignore_case(&self, needle: &str) -> bool {
                self.0.contains(&needle.trim().to_uppercase())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::CodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::CodeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> Self {
                code.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_code!(ProductCode, "product code");
define_code!(LotNumber, "lot number");
