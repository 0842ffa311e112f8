//! Left-to-right fold that turns items into bar segments.
//!
//! # Invariants
//!
//! 1. **One segment per item**, in input order. Items are never sorted.
//! 2. **Locality**: segment `i` depends only on the running total after
//!    segment `i - 1` and on item `i`.
//! 3. **Conservation**: `final_total` equals the `start` value plus inflow
//!    magnitudes minus outflow magnitudes. Subtotal and end items never move it.
//! 4. **Non-negative geometry**: `magnitude >= 0` and `base_offset` is the lower
//!    end of the bar's span.
//! 5. **Finite totals**: a running total that overflows to infinity is a
//!    `NonFiniteValue` error on the item that caused it.
//!
//! The sign convention for outflows is irrelevant: `25000` and `-25000` tagged
//! `outflow` produce the same segment.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaterfallError, ensure_finite};
use crate::item::{ItemKind, ItemRecord, WaterfallItem};

/// Render geometry for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub label: String,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Signed amount the bar stands for: the applied change for inflow and
    /// outflow, the level for start, subtotal and end.
    pub value: f64,
    /// Lower end of the bar.
    pub base_offset: f64,
    /// Bar length, always `>= 0`.
    pub magnitude: f64,
    pub running_total_before: f64,
    pub running_total_after: f64,
    pub is_positive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_of_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_percent_of_revenue: Option<f64>,
}

impl Segment {
    /// Upper end of the bar.
    #[inline]
    #[must_use]
    pub fn top(&self) -> f64 {
        self.base_offset + self.magnitude
    }
}

/// Reducer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waterfall {
    pub segments: Vec<Segment>,
    pub final_total: f64,
}

impl Waterfall {
    /// Running total after each segment, in order.
    pub fn running_totals(&self) -> impl Iterator<Item = f64> + '_ {
        self.segments.iter().map(|s| s.running_total_after)
    }

    /// Value of the first segment (the opening bar in most screens).
    #[must_use]
    pub fn first_value(&self) -> Option<f64> {
        self.segments.first().map(|s| s.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Fold accumulator. Each step consumes it and returns the next one.
struct Fold {
    running_total: f64,
    ended: bool,
    segments: Vec<Segment>,
}

impl Fold {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            running_total: 0.0,
            ended: false,
            segments: Vec::with_capacity(capacity),
        }
    }

    fn apply(mut self, index: usize, item: &WaterfallItem) -> Result<Self> {
        item.validate(index)?;

        if self.ended {
            #[cfg(feature = "tracing")]
            tracing::warn!(index, label = %item.label, "item follows an end item");
        }

        let before = self.running_total;
        let (after, value, lo, hi, is_positive) = match item.kind {
            ItemKind::Start => {
                if index != 0 {
                    return Err(WaterfallError::MisplacedStart {
                        index,
                        label: item.label.clone(),
                    });
                }
                let after = item.value;
                (after, after, 0.0, after, after >= 0.0)
            }
            ItemKind::Inflow => {
                let delta = item.value.abs();
                let after = before + delta;
                (after, delta, before, after, true)
            }
            ItemKind::Outflow => {
                let delta = item.value.abs();
                let after = before - delta;
                (after, -delta, after, before, false)
            }
            ItemKind::Subtotal | ItemKind::End => (before, before, 0.0, before, before >= 0.0),
        };

        let after = ensure_finite(Some(index), &item.label, "runningTotal", after)?;
        let base_offset = lo.min(hi);
        self.segments.push(Segment {
            label: item.label.clone(),
            kind: item.kind,
            color: item.color.clone(),
            value,
            base_offset,
            magnitude: lo.max(hi) - base_offset,
            running_total_before: before,
            running_total_after: after,
            is_positive,
            description: item.description.clone(),
            percent_of_revenue: item.percent_of_revenue,
            previous_percent_of_revenue: item.previous_percent_of_revenue,
        });
        self.running_total = after;
        self.ended |= item.kind == ItemKind::End;
        Ok(self)
    }
}

/// Reduce typed items into segments and a final total.
pub fn reduce(items: &[WaterfallItem]) -> Result<Waterfall> {
    if items.is_empty() {
        return Err(WaterfallError::EmptyInput);
    }

    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("reduce", items = items.len()).entered();

    let fold = items
        .iter()
        .enumerate()
        .try_fold(Fold::with_capacity(items.len()), |fold, (index, item)| {
            fold.apply(index, item)
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(final_total = fold.running_total, "waterfall reduced");

    Ok(Waterfall {
        final_total: fold.running_total,
        segments: fold.segments,
    })
}

/// Convert wire records (checking kind and finiteness) and reduce them.
pub fn reduce_records(records: &[ItemRecord]) -> Result<Waterfall> {
    if records.is_empty() {
        return Err(WaterfallError::EmptyInput);
    }
    let items = records
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, record)| record.into_item(index))
        .collect::<Result<Vec<_>>>()?;
    reduce(&items)
}
