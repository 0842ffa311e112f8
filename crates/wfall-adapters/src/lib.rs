#![forbid(unsafe_code)]

//! Variant adapters: domain records in, canonical waterfall items out.
//!
//! Each screen of the dashboard keeps its data in its own shape (weekly cash
//! buckets, P&L lines, per-order costs, tariff rows). An adapter owns the sign
//! and shape normalization for one of those shapes:
//!
//! - every numeric field is checked for finiteness before an item is built;
//! - required fields that are optional in JSON are checked for presence and
//!   reported as [`WaterfallError::AdapterValidation`] with record context;
//! - outflow magnitudes are emitted non-negative, direction lives in the kind.
//!
//! Adapters never reorder records.

pub mod cash_flow;
pub mod corridor;
pub mod cost_per_order;
pub mod pnl;
pub mod tariff;
mod validate;

use wfall_core::{Waterfall, WaterfallError, WaterfallItem, reduce};

pub use cash_flow::{CashFlowStatement, CashMovement, Direction};
pub use corridor::{CorridorInput, ScenarioFactors, WeekBucket, WeeklyCashForecast};
pub use cost_per_order::{CostPerOrder, UnitCost};
pub use pnl::{PnlLine, PnlSection, PnlStatement};
pub use tariff::TariffMarginRow;

/// A domain record that can be normalized into waterfall items.
pub trait IntoWaterfall {
    /// Stable adapter name used in error context and logs.
    const ADAPTER: &'static str;

    /// Validate the record and emit canonical items in order.
    fn to_items(&self) -> Result<Vec<WaterfallItem>, WaterfallError>;

    /// Normalize and reduce in one step.
    fn reduce(&self) -> Result<Waterfall, WaterfallError> {
        let items = self.to_items()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(adapter = Self::ADAPTER, items = items.len(), "adapter emitted items");
        reduce(&items)
    }
}
