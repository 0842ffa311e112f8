//! Cash-flow waterfall: opening balance, itemized movements, closing balance.
//!
//! Movements keep their input order. Inflows-before-outflows is a layout
//! choice of the caller, not something this adapter imposes.

use serde::{Deserialize, Serialize};
use wfall_core::{WaterfallError, WaterfallItem};

use crate::IntoWaterfall;
use crate::validate::required;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "inflow")]
    In,
    #[serde(alias = "outflow")]
    Out,
}

/// One itemized receipt or payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovement {
    pub label: String,
    /// Signed when `direction` is absent; otherwise a magnitude (a negative
    /// amount is accepted for outflows).
    pub amount: Option<f64>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CashMovement {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount: Some(amount),
            direction: None,
            description: None,
            color: None,
        }
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

fn default_opening_label() -> String {
    "Starting Cash".to_owned()
}

fn default_closing_label() -> String {
    "Ending Cash".to_owned()
}

/// Cash position over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    #[serde(default = "default_opening_label")]
    pub opening_label: String,
    pub opening_balance: Option<f64>,
    pub movements: Vec<CashMovement>,
    #[serde(default = "default_closing_label")]
    pub closing_label: String,
}

impl CashFlowStatement {
    pub fn new(opening_balance: f64, movements: Vec<CashMovement>) -> Self {
        Self {
            opening_label: default_opening_label(),
            opening_balance: Some(opening_balance),
            movements,
            closing_label: default_closing_label(),
        }
    }
}

impl IntoWaterfall for CashFlowStatement {
    const ADAPTER: &'static str = "cash-flow";

    fn to_items(&self) -> Result<Vec<WaterfallItem>, WaterfallError> {
        let opening = required(
            Self::ADAPTER,
            &self.opening_label,
            "openingBalance",
            self.opening_balance,
        )?;

        let mut items = Vec::with_capacity(self.movements.len() + 2);
        items.push(WaterfallItem::start(self.opening_label.clone(), opening));

        for (i, movement) in self.movements.iter().enumerate() {
            let context = format!("movement {} ('{}')", i + 1, movement.label);
            let amount = required(Self::ADAPTER, &context, "amount", movement.amount)?;

            let mut item = match movement.direction {
                Some(Direction::In) if amount < 0.0 => {
                    return Err(WaterfallError::adapter(
                        Self::ADAPTER,
                        context,
                        "negative amount tagged as inflow",
                    ));
                }
                Some(Direction::In) => WaterfallItem::inflow(movement.label.clone(), amount),
                Some(Direction::Out) => {
                    WaterfallItem::outflow(movement.label.clone(), amount.abs())
                }
                None if amount < 0.0 => WaterfallItem::outflow(movement.label.clone(), -amount),
                None => WaterfallItem::inflow(movement.label.clone(), amount),
            };
            item.description = movement.description.clone();
            item.color = movement.color.clone();
            items.push(item);
        }

        items.push(WaterfallItem::end(self.closing_label.clone()));
        Ok(items)
    }
}
