//! Error type shared by the reducer, the domain calculator, and adapters.
//!
//! # Failure Modes
//!
//! | Failure | Raised by | Behavior |
//! |---------|-----------|----------|
//! | `EmptyInput` | reducer, domain | No partial chart is produced |
//! | `UnknownKind` | record conversion | Fails fast, never guesses a kind |
//! | `NonFiniteValue` | record conversion, adapters, reducer | Non-finite inputs or an overflowing running total |
//! | `AdapterValidation` | adapters | Carries adapter name and record context |
//! | `MisplacedStart` | reducer | `start` only opens a sequence |
//! | `InvalidHeadroom` | domain | Headroom must be finite and `>= 1.0` |

use std::fmt;

/// Errors from waterfall construction and reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum WaterfallError {
    /// Zero items were given where at least one is required.
    EmptyInput,
    /// An item's kind is outside the recognized set.
    UnknownKind {
        index: usize,
        label: String,
        kind: String,
    },
    /// A numeric field is `NaN` or infinite.
    NonFiniteValue {
        index: Option<usize>,
        label: String,
        field: &'static str,
        value: f64,
    },
    /// A domain record could not be normalized into items.
    AdapterValidation {
        adapter: &'static str,
        context: String,
        message: String,
    },
    /// A `start` item appeared after the first position.
    MisplacedStart { index: usize, label: String },
    /// Axis headroom was not a finite factor `>= 1.0`.
    InvalidHeadroom(f64),
}

impl WaterfallError {
    /// Build an adapter-scoped validation error.
    pub fn adapter(
        adapter: &'static str,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::AdapterValidation {
            adapter,
            context: context.into(),
            message: message.into(),
        }
    }

    /// Short stable identifier, used by callers that render an error state.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::UnknownKind { .. } => "unknown_kind",
            Self::NonFiniteValue { .. } => "non_finite_value",
            Self::AdapterValidation { .. } => "adapter_validation",
            Self::MisplacedStart { .. } => "misplaced_start",
            Self::InvalidHeadroom(_) => "invalid_headroom",
        }
    }
}

impl fmt::Display for WaterfallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "waterfall requires at least one item"),
            Self::UnknownKind { index, label, kind } => {
                write!(f, "item {index} ('{label}'): unknown kind '{kind}'")
            }
            Self::NonFiniteValue {
                index: Some(index),
                label,
                field,
                value,
            } => write!(f, "item {index} ('{label}'): {field} is not finite ({value})"),
            Self::NonFiniteValue {
                index: None,
                label,
                field,
                value,
            } => write!(f, "'{label}': {field} is not finite ({value})"),
            Self::AdapterValidation {
                adapter,
                context,
                message,
            } => write!(f, "{adapter} adapter: {context}: {message}"),
            Self::MisplacedStart { index, label } => write!(
                f,
                "item {index} ('{label}'): start is only allowed as the first item"
            ),
            Self::InvalidHeadroom(h) => {
                write!(f, "headroom must be a finite factor >= 1.0, got {h}")
            }
        }
    }
}

impl std::error::Error for WaterfallError {}

/// Result alias for waterfall operations.
pub type Result<T> = std::result::Result<T, WaterfallError>;

/// Reject `NaN` and infinities with field context.
pub fn ensure_finite(
    index: Option<usize>,
    label: &str,
    field: &'static str,
    value: f64,
) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WaterfallError::NonFiniteValue {
            index,
            label: label.to_owned(),
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_kind() {
        let err = WaterfallError::UnknownKind {
            index: 2,
            label: "Freight".into(),
            kind: "bogus".into(),
        };
        assert_eq!(err.to_string(), "item 2 ('Freight'): unknown kind 'bogus'");
        assert_eq!(err.code(), "unknown_kind");
    }

    #[test]
    fn display_adapter_error() {
        let err = WaterfallError::adapter("weekly-cash", "week 4", "bucket missing");
        assert_eq!(err.to_string(), "weekly-cash adapter: week 4: bucket missing");
    }

    #[test]
    fn ensure_finite_passes_through() {
        assert_eq!(ensure_finite(None, "x", "value", 12.5), Ok(12.5));
    }

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = ensure_finite(Some(1), "Payroll", "value", bad).unwrap_err();
            assert_eq!(err.code(), "non_finite_value");
        }
    }

    #[test]
    fn errors_are_std_errors() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&WaterfallError::EmptyInput);
    }
}
