//! Draw instructions: bar geometry, value labels, and tooltip payloads.
//!
//! # Invariants
//!
//! 1. One instruction per segment, same order, `category_index` = position.
//! 2. Bars are in value units (`base`, `height >= 0`); pixels are the
//!    charting collaborator's concern.
//! 3. A label goes outside its bar when `magnitude / track_width` is below the
//!    threshold (strictly), inside otherwise.

use serde::{Deserialize, Serialize};
use wfall_core::{Domain, ItemKind, Segment, Waterfall, WaterfallError};

use crate::config::RenderConfig;
use crate::format::{compact_currency_with, percent, signed_compact_currency};

/// Bars narrower than this share of the track get their label outside.
pub const LABEL_INSIDE_THRESHOLD: f64 = 0.12;

/// Where the value label sits relative to its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPlacement {
    /// Adjacent to the bar.
    Outside,
    /// Inside, aligned to the bar's far end (deltas).
    InsideEnd,
    /// Inside, centered (totals).
    InsideCenter,
}

/// Decide label placement for a bar.
#[must_use]
pub fn place_label(
    magnitude: f64,
    track_width: f64,
    threshold: f64,
    kind: ItemKind,
) -> LabelPlacement {
    if !(track_width > 0.0) || magnitude / track_width < threshold {
        LabelPlacement::Outside
    } else if kind.is_delta() {
        LabelPlacement::InsideEnd
    } else {
        LabelPlacement::InsideCenter
    }
}

/// Bar rectangle in value units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarRect {
    pub base: f64,
    pub height: f64,
}

/// Cost-share increase versus the previous period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erosion {
    pub current_pct: f64,
    pub previous_pct: f64,
    pub delta_pts: f64,
    pub text: String,
}

/// Hover payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub category: String,
    pub magnitude: String,
    pub running_total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erosion: Option<Erosion>,
}

/// Everything a chart needs to draw one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawInstruction {
    pub category_index: usize,
    pub category: String,
    pub kind: ItemKind,
    pub bar: BarRect,
    pub fill: String,
    pub value_label: String,
    pub placement: LabelPlacement,
    pub tooltip: Tooltip,
}

fn erosion(segment: &Segment) -> Option<Erosion> {
    if segment.kind != ItemKind::Outflow {
        return None;
    }
    let current = segment.percent_of_revenue?;
    let previous = segment.previous_percent_of_revenue?;
    (current > previous).then(|| {
        let delta = current - previous;
        Erosion {
            current_pct: current,
            previous_pct: previous,
            delta_pts: delta,
            text: format!(
                "{} of revenue, up {:.1} pts from {}",
                percent(current, 1),
                delta,
                percent(previous, 1)
            ),
        }
    })
}

fn instruction(
    index: usize,
    segment: &Segment,
    track_width: f64,
    config: &RenderConfig,
) -> DrawInstruction {
    let symbol = config.currency_symbol.as_str();
    let value_label = if segment.kind.is_delta() {
        signed_compact_currency(segment.value, symbol, config.decimals)
    } else {
        compact_currency_with(segment.value, symbol, config.decimals)
    };

    DrawInstruction {
        category_index: index,
        category: segment.label.clone(),
        kind: segment.kind,
        bar: BarRect {
            base: segment.base_offset,
            height: segment.magnitude,
        },
        fill: config.palette.fill(segment).to_owned(),
        value_label,
        placement: place_label(
            segment.magnitude,
            track_width,
            config.label_threshold,
            segment.kind,
        ),
        tooltip: Tooltip {
            category: segment.label.clone(),
            magnitude: compact_currency_with(segment.magnitude, symbol, config.decimals),
            running_total: compact_currency_with(
                segment.running_total_after,
                symbol,
                config.decimals,
            ),
            description: segment.description.clone(),
            erosion: erosion(segment),
        },
    }
}

/// Draw instructions against an axis the caller already sized, e.g. the
/// shared domain of a scenario overlay.
#[must_use]
pub fn to_draw_instructions_in(
    waterfall: &Waterfall,
    domain: &Domain,
    config: &RenderConfig,
) -> Vec<DrawInstruction> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "draw_instructions",
        segments = waterfall.len(),
        min = domain.min,
        max = domain.max
    )
    .entered();

    let track_width = config.track_width.unwrap_or_else(|| domain.span());
    waterfall
        .segments
        .iter()
        .enumerate()
        .map(|(index, segment)| instruction(index, segment, track_width, config))
        .collect()
}

/// Size the axis from the waterfall itself, then build draw instructions.
pub fn to_draw_instructions(
    waterfall: &Waterfall,
    config: &RenderConfig,
) -> Result<Vec<DrawInstruction>, WaterfallError> {
    let domain = Domain::for_waterfall(waterfall, config.headroom)?;
    Ok(to_draw_instructions_in(waterfall, &domain, config))
}
