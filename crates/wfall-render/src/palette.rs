//! Bar fills.
//!
//! One color authority: the kind picks the fill, and only `end` (and a
//! negative `start`) consult the sign. Subtotals have their own color rather
//! than a faded variant of another. An item's explicit `color` wins.

use serde::{Deserialize, Serialize};
use wfall_core::{ItemKind, Segment};

/// Hex fills per bar role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub start: String,
    pub inflow: String,
    pub outflow: String,
    pub subtotal: String,
    pub end_positive: String,
    pub end_negative: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            start: "#3b82f6".into(),
            inflow: "#22c55e".into(),
            outflow: "#ef4444".into(),
            subtotal: "#64748b".into(),
            end_positive: "#1d4ed8".into(),
            end_negative: "#b91c1c".into(),
        }
    }
}

impl Palette {
    /// Fill for a segment.
    #[must_use]
    pub fn fill<'a>(&'a self, segment: &'a Segment) -> &'a str {
        if let Some(color) = segment.color.as_deref() {
            return color;
        }
        match segment.kind {
            ItemKind::Start if segment.is_positive => &self.start,
            ItemKind::Start => &self.end_negative,
            ItemKind::Inflow => &self.inflow,
            ItemKind::Outflow => &self.outflow,
            ItemKind::Subtotal => &self.subtotal,
            ItemKind::End if segment.is_positive => &self.end_positive,
            ItemKind::End => &self.end_negative,
        }
    }
}

/// `#rgb` or `#rrggbb`.
pub(crate) fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
