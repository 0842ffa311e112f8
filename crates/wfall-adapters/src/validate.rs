//! Shared field checks for adapters.

use wfall_core::WaterfallError;
use wfall_core::error::ensure_finite;

/// Finite check with the record label as context.
pub(crate) fn finite(label: &str, field: &'static str, value: f64) -> Result<f64, WaterfallError> {
    ensure_finite(None, label, field, value)
}

/// Optional finite check; `None` passes through.
pub(crate) fn finite_opt(
    label: &str,
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, WaterfallError> {
    value.map(|v| finite(label, field, v)).transpose()
}

/// A field that may be absent in JSON but is required by the adapter.
pub(crate) fn required(
    adapter: &'static str,
    context: &str,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, WaterfallError> {
    match value {
        Some(v) => finite(context, field, v),
        None => Err(WaterfallError::adapter(
            adapter,
            context,
            format!("missing required field '{field}'"),
        )),
    }
}

/// Share of `base` as a percentage, `None` when the base is not positive.
pub(crate) fn percent_of(amount: f64, base: Option<f64>) -> Option<f64> {
    base.filter(|b| *b > 0.0).map(|b| amount / b * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reports_missing_field() {
        let err = required("pnl", "Marketing", "amount", None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pnl adapter: Marketing: missing required field 'amount'"
        );
    }

    #[test]
    fn required_rejects_nan() {
        let err = required("pnl", "Marketing", "amount", Some(f64::NAN)).unwrap_err();
        assert_eq!(err.code(), "non_finite_value");
    }

    #[test]
    fn percent_of_guards_zero_base() {
        assert_eq!(percent_of(25.0, Some(200.0)), Some(12.5));
        assert_eq!(percent_of(25.0, Some(0.0)), None);
        assert_eq!(percent_of(25.0, None), None);
    }

    #[test]
    fn finite_opt_passes_none() {
        assert_eq!(finite_opt("x", "f", None), Ok(None));
    }
}
