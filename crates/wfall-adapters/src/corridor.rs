//! Weekly cash buckets and the 13-week corridor overlay.
//!
//! # Invariants
//!
//! 1. Weeks are numbered `1..=horizon` and each appears exactly once; a gap or
//!    a duplicate is an adapter error naming the week.
//! 2. Buckets are emitted in week order regardless of record order.
//! 3. Corridor bands share one axis (one domain call over all bands).

use serde::{Deserialize, Serialize};
use wfall_core::{Scenario, ScenarioOverlay, WaterfallError, WaterfallItem, reduce_scenarios};

use crate::IntoWaterfall;
use crate::validate::{finite, required};

/// Default forecast horizon in weeks.
pub const DEFAULT_HORIZON: u32 = 13;

/// Receipts and disbursements for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub week: u32,
    pub inflow: Option<f64>,
    pub outflow: Option<f64>,
}

impl WeekBucket {
    pub fn new(week: u32, inflow: f64, outflow: f64) -> Self {
        Self {
            week,
            inflow: Some(inflow),
            outflow: Some(outflow),
        }
    }
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON
}

fn default_opening_label() -> String {
    "Opening Cash".to_owned()
}

/// A rolling weekly cash forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCashForecast {
    pub opening_balance: Option<f64>,
    pub weeks: Vec<WeekBucket>,
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    /// Insert a checkpoint subtotal after every N weeks.
    #[serde(default)]
    pub subtotal_every: Option<u32>,
    #[serde(default = "default_opening_label")]
    pub opening_label: String,
    /// Defaults to `"Week {horizon} Cash"`.
    #[serde(default)]
    pub closing_label: Option<String>,
}

impl WeeklyCashForecast {
    pub fn new(opening_balance: f64, weeks: Vec<WeekBucket>) -> Self {
        let horizon = u32::try_from(weeks.len()).unwrap_or(u32::MAX);
        Self {
            opening_balance: Some(opening_balance),
            weeks,
            horizon,
            subtotal_every: None,
            opening_label: default_opening_label(),
            closing_label: None,
        }
    }

    #[must_use]
    pub fn subtotal_every(mut self, weeks: u32) -> Self {
        self.subtotal_every = Some(weeks);
        self
    }

    /// Buckets ordered by week, checking coverage of `1..=horizon`.
    fn ordered_buckets(&self) -> Result<Vec<&WeekBucket>, WaterfallError> {
        let adapter = <Self as IntoWaterfall>::ADAPTER;
        if self.horizon == 0 {
            return Err(WaterfallError::adapter(adapter, "horizon", "must be at least 1 week"));
        }
        let mut ordered: Vec<&WeekBucket> = Vec::with_capacity(self.weeks.len());
        for bucket in &self.weeks {
            if bucket.week == 0 || bucket.week > self.horizon {
                return Err(WaterfallError::adapter(
                    adapter,
                    format!("week {}", bucket.week),
                    format!("outside forecast horizon 1..={}", self.horizon),
                ));
            }
            ordered.push(bucket);
        }
        ordered.sort_by_key(|bucket| bucket.week);

        let mut expected = 1u32;
        for (i, bucket) in ordered.iter().enumerate() {
            if i > 0 && ordered[i - 1].week == bucket.week {
                return Err(WaterfallError::adapter(
                    adapter,
                    format!("week {}", bucket.week),
                    "duplicate bucket",
                ));
            }
            if bucket.week != expected {
                break;
            }
            expected += 1;
        }
        if expected <= self.horizon {
            return Err(WaterfallError::adapter(
                adapter,
                format!("week {expected}"),
                "bucket missing",
            ));
        }
        Ok(ordered)
    }

    fn scaled_items(&self, factors: ScenarioFactors) -> Result<Vec<WaterfallItem>, WaterfallError> {
        let adapter = <Self as IntoWaterfall>::ADAPTER;
        let opening = required(adapter, &self.opening_label, "openingBalance", self.opening_balance)?;
        let every = match self.subtotal_every {
            Some(0) => {
                return Err(WaterfallError::adapter(
                    adapter,
                    "subtotalEvery",
                    "must be at least 1 week",
                ));
            }
            other => other,
        };

        let buckets = self.ordered_buckets()?;
        let mut items = Vec::with_capacity(buckets.len() * 2 + 2);
        items.push(WaterfallItem::start(self.opening_label.clone(), opening));

        for bucket in buckets {
            let context = format!("week {}", bucket.week);
            let inflow = required(adapter, &context, "inflow", bucket.inflow)?;
            let outflow = required(adapter, &context, "outflow", bucket.outflow)?;
            items.push(WaterfallItem::inflow(
                format!("W{} in", bucket.week),
                inflow.abs() * factors.inflow,
            ));
            items.push(WaterfallItem::outflow(
                format!("W{} out", bucket.week),
                outflow.abs() * factors.outflow,
            ));
            if let Some(n) = every {
                if bucket.week % n == 0 && bucket.week != self.horizon {
                    items.push(WaterfallItem::subtotal(format!("Through W{}", bucket.week)));
                }
            }
        }

        let closing = self
            .closing_label
            .clone()
            .unwrap_or_else(|| format!("Week {} Cash", self.horizon));
        items.push(WaterfallItem::end(closing));
        Ok(items)
    }
}

impl IntoWaterfall for WeeklyCashForecast {
    const ADAPTER: &'static str = "weekly-cash";

    fn to_items(&self) -> Result<Vec<WaterfallItem>, WaterfallError> {
        self.scaled_items(ScenarioFactors::IDENTITY)
    }
}

/// Multipliers applied to weekly receipts and disbursements for one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFactors {
    pub inflow: f64,
    pub outflow: f64,
}

impl ScenarioFactors {
    pub const IDENTITY: ScenarioFactors = ScenarioFactors {
        inflow: 1.0,
        outflow: 1.0,
    };

    fn validate(self, scenario: Scenario) -> Result<Self, WaterfallError> {
        let label = scenario.as_str();
        let inflow = finite(label, "inflow", self.inflow)?;
        let outflow = finite(label, "outflow", self.outflow)?;
        if inflow < 0.0 || outflow < 0.0 {
            return Err(WaterfallError::adapter(
                CorridorInput::ADAPTER,
                format!("{scenario} factors"),
                "multipliers must be non-negative",
            ));
        }
        Ok(self)
    }
}

fn default_best() -> ScenarioFactors {
    ScenarioFactors {
        inflow: 1.1,
        outflow: 0.95,
    }
}

fn default_worst() -> ScenarioFactors {
    ScenarioFactors {
        inflow: 0.85,
        outflow: 1.1,
    }
}

/// Weekly forecast plus best/base/worst multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorInput {
    pub forecast: WeeklyCashForecast,
    #[serde(default = "default_best")]
    pub best: ScenarioFactors,
    #[serde(default = "default_base")]
    pub base: ScenarioFactors,
    #[serde(default = "default_worst")]
    pub worst: ScenarioFactors,
}

fn default_base() -> ScenarioFactors {
    ScenarioFactors::IDENTITY
}

impl CorridorInput {
    pub const ADAPTER: &'static str = "corridor";

    pub fn new(forecast: WeeklyCashForecast) -> Self {
        Self {
            forecast,
            best: default_best(),
            base: ScenarioFactors::IDENTITY,
            worst: default_worst(),
        }
    }

    /// Items for every band, in best/base/worst order.
    pub fn bands(&self) -> Result<Vec<(Scenario, Vec<WaterfallItem>)>, WaterfallError> {
        [
            (Scenario::Best, self.best),
            (Scenario::Base, self.base),
            (Scenario::Worst, self.worst),
        ]
        .into_iter()
        .map(|(scenario, factors)| -> Result<_, WaterfallError> {
            let factors = factors.validate(scenario)?;
            Ok((scenario, self.forecast.scaled_items(factors)?))
        })
        .collect()
    }

    /// Reduce all bands onto one shared axis.
    pub fn overlay(&self, headroom: f64) -> Result<ScenarioOverlay, WaterfallError> {
        reduce_scenarios(&self.bands()?, headroom)
    }
}
