//! Per-order economics: revenue per order down to contribution per order.

use serde::{Deserialize, Serialize};
use wfall_core::{WaterfallError, WaterfallItem};

use crate::IntoWaterfall;
use crate::validate::{finite_opt, percent_of, required};

/// One per-order cost deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCost {
    pub label: String,
    pub per_order: Option<f64>,
    #[serde(default)]
    pub previous_per_order: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UnitCost {
    pub fn new(label: impl Into<String>, per_order: f64) -> Self {
        Self {
            label: label.into(),
            per_order: Some(per_order),
            previous_per_order: None,
            description: None,
        }
    }
}

fn default_revenue_label() -> String {
    "Revenue / Order".to_owned()
}

fn default_margin_label() -> String {
    "Contribution / Order".to_owned()
}

/// Unit economics of an average order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostPerOrder {
    #[serde(default = "default_revenue_label")]
    pub revenue_label: String,
    pub revenue_per_order: Option<f64>,
    #[serde(default)]
    pub previous_revenue_per_order: Option<f64>,
    pub costs: Vec<UnitCost>,
    #[serde(default = "default_margin_label")]
    pub margin_label: String,
}

impl CostPerOrder {
    pub fn new(revenue_per_order: f64, costs: Vec<UnitCost>) -> Self {
        Self {
            revenue_label: default_revenue_label(),
            revenue_per_order: Some(revenue_per_order),
            previous_revenue_per_order: None,
            costs,
            margin_label: default_margin_label(),
        }
    }
}

impl IntoWaterfall for CostPerOrder {
    const ADAPTER: &'static str = "cost-per-order";

    fn to_items(&self) -> Result<Vec<WaterfallItem>, WaterfallError> {
        let revenue = required(
            Self::ADAPTER,
            &self.revenue_label,
            "revenuePerOrder",
            self.revenue_per_order,
        )?;
        if revenue < 0.0 {
            return Err(WaterfallError::adapter(
                Self::ADAPTER,
                self.revenue_label.as_str(),
                "revenue per order must not be negative",
            ));
        }
        let previous_revenue = finite_opt(
            &self.revenue_label,
            "previousRevenuePerOrder",
            self.previous_revenue_per_order,
        )?;

        let mut items = Vec::with_capacity(self.costs.len() + 2);
        items.push(WaterfallItem::start(self.revenue_label.clone(), revenue));

        for cost in &self.costs {
            let amount = required(Self::ADAPTER, &cost.label, "perOrder", cost.per_order)?.abs();
            let previous = finite_opt(&cost.label, "previousPerOrder", cost.previous_per_order)?;
            let mut item = WaterfallItem::outflow(cost.label.clone(), amount);
            if let Some(pct) = percent_of(amount, Some(revenue)) {
                item = item.with_revenue_share(
                    pct,
                    previous.and_then(|p| percent_of(p.abs(), previous_revenue)),
                );
            }
            item.description = cost.description.clone();
            items.push(item);
        }

        items.push(WaterfallItem::end(self.margin_label.clone()));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> CostPerOrder {
        CostPerOrder::new(
            62.0,
            vec![
                UnitCost::new("Product cost", -21.7),
                UnitCost::new("Shipping", 8.5),
                UnitCost::new("Payment fees", 1.86),
                UnitCost::new("CAC", 18.0),
            ],
        )
    }

    #[test]
    fn reduces_to_contribution_per_order() {
        let w = order().reduce().unwrap();
        assert!((w.final_total - 11.94).abs() < 1e-9);
        assert_eq!(w.segments.last().unwrap().label, "Contribution / Order");
    }

    #[test]
    fn costs_are_magnitudes() {
        let items = order().to_items().unwrap();
        assert_eq!(items[1].value, 21.7);
        assert!((items[1].percent_of_revenue.unwrap() - 35.0).abs() < 1e-9);
    }

    #[test]
    fn negative_margin_is_allowed() {
        let w = CostPerOrder::new(10.0, vec![UnitCost::new("Shipping", 14.0)])
            .reduce()
            .unwrap();
        assert_eq!(w.final_total, -4.0);
        assert!(!w.segments.last().unwrap().is_positive);
    }

    #[test]
    fn zero_revenue_skips_shares() {
        let items = CostPerOrder::new(0.0, vec![UnitCost::new("Fee", 1.0)])
            .to_items()
            .unwrap();
        assert_eq!(items[1].percent_of_revenue, None);
    }

    #[test]
    fn previous_share_uses_previous_revenue() {
        let mut cpo = CostPerOrder::new(50.0, vec![UnitCost {
            previous_per_order: Some(4.0),
            ..UnitCost::new("Shipping", 6.0)
        }]);
        cpo.previous_revenue_per_order = Some(40.0);
        let items = cpo.to_items().unwrap();
        assert!((items[1].percent_of_revenue.unwrap() - 12.0).abs() < 1e-9);
        assert!((items[1].previous_percent_of_revenue.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn missing_cost_is_rejected() {
        let json = r#"{"revenuePerOrder":62,"costs":[{"label":"CAC"}]}"#;
        let cpo: CostPerOrder = serde_json::from_str(json).unwrap();
        assert_eq!(
            cpo.to_items().unwrap_err().to_string(),
            "cost-per-order adapter: CAC: missing required field 'perOrder'"
        );
    }
}
