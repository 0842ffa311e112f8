//! The canonical input shape: one labeled financial delta.
//!
//! Two representations exist:
//! - [`WaterfallItem`] is typed; its `kind` is an [`ItemKind`].
//! - [`ItemRecord`] is the JSON wire shape whose `kind` is free text, so that
//!   an unrecognized kind surfaces as [`WaterfallError::UnknownKind`] instead of
//!   a deserializer message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaterfallError, ensure_finite};

/// How an item affects the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Sets the running total to the item's value.
    Start,
    /// Adds the item's magnitude.
    Inflow,
    /// Subtracts the item's magnitude.
    Outflow,
    /// Full-height reference bar; the total is not changed.
    Subtotal,
    /// Terminal full-height bar colored by the sign of the total.
    End,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Start,
        ItemKind::Inflow,
        ItemKind::Outflow,
        ItemKind::Subtotal,
        ItemKind::End,
    ];

    /// Parse a wire spelling. Only the exact lowercase names are accepted.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(Self::Start),
            "inflow" => Some(Self::Inflow),
            "outflow" => Some(Self::Outflow),
            "subtotal" => Some(Self::Subtotal),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
            Self::Subtotal => "subtotal",
            Self::End => "end",
        }
    }

    /// Kinds whose bar shows a change rather than a level.
    #[must_use]
    pub const fn is_delta(self) -> bool {
        matches!(self, Self::Inflow | Self::Outflow)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled delta, ready for the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallItem {
    pub label: String,
    pub value: f64,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_of_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_percent_of_revenue: Option<f64>,
}

impl WaterfallItem {
    /// Create an item with no presentation metadata.
    pub fn new(label: impl Into<String>, value: f64, kind: ItemKind) -> Self {
        Self {
            label: label.into(),
            value,
            kind,
            color: None,
            description: None,
            percent_of_revenue: None,
            previous_percent_of_revenue: None,
        }
    }

    pub fn start(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, value, ItemKind::Start)
    }

    pub fn inflow(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, value, ItemKind::Inflow)
    }

    pub fn outflow(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, value, ItemKind::Outflow)
    }

    /// Subtotal and end items take their height from the running total, so
    /// their value is informational only.
    pub fn subtotal(label: impl Into<String>) -> Self {
        Self::new(label, 0.0, ItemKind::Subtotal)
    }

    pub fn end(label: impl Into<String>) -> Self {
        Self::new(label, 0.0, ItemKind::End)
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach cost-share annotations used for erosion callouts.
    #[must_use]
    pub fn with_revenue_share(mut self, current: f64, previous: Option<f64>) -> Self {
        self.percent_of_revenue = Some(current);
        self.previous_percent_of_revenue = previous;
        self
    }

    /// Check that every numeric field is finite.
    pub fn validate(&self, index: usize) -> Result<()> {
        ensure_finite(Some(index), &self.label, "value", self.value)?;
        if let Some(pct) = self.percent_of_revenue {
            ensure_finite(Some(index), &self.label, "percentOfRevenue", pct)?;
        }
        if let Some(pct) = self.previous_percent_of_revenue {
            ensure_finite(Some(index), &self.label, "previousPercentOfRevenue", pct)?;
        }
        Ok(())
    }
}

/// JSON wire shape of an item, as produced by a data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub label: String,
    pub value: f64,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_of_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_percent_of_revenue: Option<f64>,
}

impl ItemRecord {
    /// Validate kind membership and finiteness, producing a typed item.
    pub fn into_item(self, index: usize) -> Result<WaterfallItem> {
        let Some(kind) = ItemKind::parse(&self.kind) else {
            return Err(WaterfallError::UnknownKind {
                index,
                label: self.label,
                kind: self.kind,
            });
        };
        let item = WaterfallItem {
            label: self.label,
            value: self.value,
            kind,
            color: self.color,
            description: self.description,
            percent_of_revenue: self.percent_of_revenue,
            previous_percent_of_revenue: self.previous_percent_of_revenue,
        };
        item.validate(index)?;
        Ok(item)
    }
}

impl From<WaterfallItem> for ItemRecord {
    fn from(item: WaterfallItem) -> Self {
        Self {
            label: item.label,
            value: item.value,
            kind: item.kind.as_str().to_owned(),
            color: item.color,
            description: item.description,
            percent_of_revenue: item.percent_of_revenue,
            previous_percent_of_revenue: item.previous_percent_of_revenue,
        }
    }
}
