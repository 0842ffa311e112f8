//! Product margin under tariffs: revenue, landed cost components, margin.
//!
//! The tariff item carries its current and previous-rate share of revenue so
//! a rate increase shows up as an erosion callout.

use serde::{Deserialize, Serialize};
use wfall_core::{WaterfallError, WaterfallItem};

use crate::IntoWaterfall;
use crate::validate::required;

/// One product row of the tariff margin screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffMarginRow {
    pub product: String,
    pub units: Option<f64>,
    pub unit_price: Option<f64>,
    pub unit_cost: Option<f64>,
    /// Duty as a fraction of unit cost (`0.25` = 25%).
    pub tariff_rate: Option<f64>,
    #[serde(default)]
    pub previous_tariff_rate: Option<f64>,
    #[serde(default)]
    pub freight_per_unit: Option<f64>,
}

impl TariffMarginRow {
    pub fn new(
        product: impl Into<String>,
        units: f64,
        unit_price: f64,
        unit_cost: f64,
        tariff_rate: f64,
    ) -> Self {
        Self {
            product: product.into(),
            units: Some(units),
            unit_price: Some(unit_price),
            unit_cost: Some(unit_cost),
            tariff_rate: Some(tariff_rate),
            previous_tariff_rate: None,
            freight_per_unit: None,
        }
    }

    #[must_use]
    pub fn previous_rate(mut self, rate: f64) -> Self {
        self.previous_tariff_rate = Some(rate);
        self
    }

    #[must_use]
    pub fn freight(mut self, per_unit: f64) -> Self {
        self.freight_per_unit = Some(per_unit);
        self
    }

    fn non_negative(&self, field: &'static str, value: Option<f64>) -> Result<f64, WaterfallError> {
        let value = required(Self::ADAPTER, &self.product, field, value)?;
        if value < 0.0 {
            return Err(WaterfallError::adapter(
                Self::ADAPTER,
                self.product.as_str(),
                format!("'{field}' must not be negative"),
            ));
        }
        Ok(value)
    }
}

impl IntoWaterfall for TariffMarginRow {
    const ADAPTER: &'static str = "tariff-margin";

    fn to_items(&self) -> Result<Vec<WaterfallItem>, WaterfallError> {
        let units = self.non_negative("units", self.units)?;
        let price = self.non_negative("unitPrice", self.unit_price)?;
        let cost = self.non_negative("unitCost", self.unit_cost)?;
        let rate = self.non_negative("tariffRate", self.tariff_rate)?;
        let previous_rate = self
            .previous_tariff_rate
            .map(|prev| self.non_negative("previousTariffRate", Some(prev)))
            .transpose()?;
        let freight = self
            .freight_per_unit
            .map(|f| self.non_negative("freightPerUnit", Some(f)))
            .transpose()?;

        let revenue = units * price;
        let cogs = units * cost;
        let duty = cogs * rate;
        let share = |amount: f64| (revenue > 0.0).then(|| amount / revenue * 100.0);

        let mut items = Vec::with_capacity(5);
        items.push(WaterfallItem::start(format!("{} Revenue", self.product), revenue));

        let mut cogs_item = WaterfallItem::outflow("Product Cost", cogs);
        cogs_item.percent_of_revenue = share(cogs);
        items.push(cogs_item);

        let mut duty_item = WaterfallItem::outflow("Tariff", duty)
            .with_description(format!("{:.1}% of product cost", rate * 100.0));
        duty_item.percent_of_revenue = share(duty);
        duty_item.previous_percent_of_revenue =
            previous_rate.and_then(|prev| share(cogs * prev));
        items.push(duty_item);

        if let Some(freight) = freight {
            let amount = units * freight;
            let mut freight_item = WaterfallItem::outflow("Freight", amount);
            freight_item.percent_of_revenue = share(amount);
            items.push(freight_item);
        }

        items.push(WaterfallItem::end("Margin"));
        Ok(items)
    }
}
