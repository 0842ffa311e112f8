//! P&L and margin waterfalls: revenue, sequential cost lines, subtotals.
//!
//! Cost lines are accepted with either sign and always emitted as outflow
//! magnitudes. Each line carries its share of revenue, and its share of the
//! previous period's revenue when both previous figures are present, so the
//! render layer can flag cost-share erosion.

use serde::{Deserialize, Serialize};
use wfall_core::{WaterfallError, WaterfallItem};

use crate::IntoWaterfall;
use crate::validate::{finite_opt, percent_of, required};

/// One cost line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlLine {
    pub label: String,
    pub amount: Option<f64>,
    #[serde(default)]
    pub previous_amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl PnlLine {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount: Some(amount),
            previous_amount: None,
            description: None,
            color: None,
        }
    }

    #[must_use]
    pub fn previous(mut self, amount: f64) -> Self {
        self.previous_amount = Some(amount);
        self
    }
}

/// A run of cost lines, optionally closed by a named subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlSection {
    pub lines: Vec<PnlLine>,
    #[serde(default)]
    pub subtotal: Option<String>,
}

impl PnlSection {
    pub fn new(lines: Vec<PnlLine>) -> Self {
        Self {
            lines,
            subtotal: None,
        }
    }

    #[must_use]
    pub fn closed_by(mut self, subtotal: impl Into<String>) -> Self {
        self.subtotal = Some(subtotal.into());
        self
    }
}

fn default_revenue_label() -> String {
    "Revenue".to_owned()
}

fn default_result_label() -> String {
    "Net Income".to_owned()
}

/// Income statement for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlStatement {
    #[serde(default = "default_revenue_label")]
    pub revenue_label: String,
    pub revenue: Option<f64>,
    #[serde(default)]
    pub previous_revenue: Option<f64>,
    pub sections: Vec<PnlSection>,
    #[serde(default = "default_result_label")]
    pub result_label: String,
}

impl PnlStatement {
    pub fn new(revenue: f64, sections: Vec<PnlSection>) -> Self {
        Self {
            revenue_label: default_revenue_label(),
            revenue: Some(revenue),
            previous_revenue: None,
            sections,
            result_label: default_result_label(),
        }
    }

    #[must_use]
    pub fn previous_revenue(mut self, revenue: f64) -> Self {
        self.previous_revenue = Some(revenue);
        self
    }

    #[must_use]
    pub fn result_label(mut self, label: impl Into<String>) -> Self {
        self.result_label = label.into();
        self
    }
}

impl IntoWaterfall for PnlStatement {
    const ADAPTER: &'static str = "pnl";

    fn to_items(&self) -> Result<Vec<WaterfallItem>, WaterfallError> {
        let revenue = required(Self::ADAPTER, &self.revenue_label, "revenue", self.revenue)?;
        if revenue <= 0.0 {
            return Err(WaterfallError::adapter(
                Self::ADAPTER,
                self.revenue_label.as_str(),
                "revenue must be positive",
            ));
        }
        let previous_revenue =
            finite_opt(&self.revenue_label, "previousRevenue", self.previous_revenue)?;

        let line_count: usize = self.sections.iter().map(|s| s.lines.len() + 1).sum();
        let mut items = Vec::with_capacity(line_count + 2);
        items.push(
            WaterfallItem::start(self.revenue_label.clone(), revenue).with_revenue_share(
                100.0,
                previous_revenue.filter(|r| *r > 0.0).map(|_| 100.0),
            ),
        );

        for section in &self.sections {
            for line in &section.lines {
                let amount = required(Self::ADAPTER, &line.label, "amount", line.amount)?.abs();
                let previous = finite_opt(&line.label, "previousAmount", line.previous_amount)?;
                let current_pct = amount / revenue * 100.0;
                let previous_pct = previous.and_then(|p| percent_of(p.abs(), previous_revenue));

                let mut item = WaterfallItem::outflow(line.label.clone(), amount)
                    .with_revenue_share(current_pct, previous_pct);
                item.description = line.description.clone();
                item.color = line.color.clone();
                items.push(item);
            }
            if let Some(label) = &section.subtotal {
                items.push(WaterfallItem::subtotal(label.clone()));
            }
        }

        items.push(WaterfallItem::end(self.result_label.clone()));
        Ok(items)
    }
}
