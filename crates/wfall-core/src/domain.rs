//! Axis bounds derived from reducer output.
//!
//! The upper bound covers the largest running total (and the opening value),
//! scaled by a headroom factor. The lower bound is zero unless a running total
//! dips below it, in which case the most negative total is scaled the same way.
//!
//! Overlays that share one chart (best/base/worst bands) must size the axis
//! with a single call over the union of every band, see [`Domain::union`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaterfallError, ensure_finite};
use crate::reduce::Waterfall;

/// Headroom used when the caller has no preference.
pub const DEFAULT_HEADROOM: f64 = 1.1;

/// Closed value interval for a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// Axis length in value units.
    #[inline]
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Domain for one reduced waterfall.
    pub fn for_waterfall(waterfall: &Waterfall, headroom: f64) -> Result<Self> {
        Self::union(&[waterfall], headroom)
    }

    /// One domain covering every band of an overlay.
    ///
    /// Each band contributes its running totals plus its first segment's
    /// `value`. That is the applied signed delta, not the raw item value: a
    /// leading `outflow` of `25` contributes `-25`, which equals its running
    /// total, so the bounds never widen past the drawn bars.
    pub fn union(waterfalls: &[&Waterfall], headroom: f64) -> Result<Self> {
        let values: Vec<f64> = waterfalls
            .iter()
            .flat_map(|w| w.first_value().into_iter().chain(w.running_totals()))
            .collect();
        domain(&values, headroom)
    }
}

fn check_headroom(headroom: f64) -> Result<f64> {
    if headroom.is_finite() && headroom >= 1.0 {
        Ok(headroom)
    } else {
        Err(WaterfallError::InvalidHeadroom(headroom))
    }
}

/// Compute axis bounds for a set of running totals.
pub fn domain(values: &[f64], headroom: f64) -> Result<Domain> {
    let headroom = check_headroom(headroom)?;
    if values.is_empty() {
        return Err(WaterfallError::EmptyInput);
    }

    let (lo, hi) = values.iter().enumerate().try_fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), (index, &v)| {
            let v = ensure_finite(Some(index), "domain", "runningTotal", v)?;
            Ok::<_, WaterfallError>((lo.min(v), hi.max(v)))
        },
    )?;

    let max = if hi > 0.0 { hi * headroom } else { 0.0 };
    let min = if lo < 0.0 { lo * headroom } else { 0.0 };
    Ok(Domain {
        min: ensure_finite(None, "domain", "min", min)?,
        max: ensure_finite(None, "domain", "max", max)?,
    })
}
