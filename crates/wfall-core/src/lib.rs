#![forbid(unsafe_code)]

//! Core: waterfall item model, running-total reducer, and axis domains.
//!
//! # Role in the workspace
//! `wfall-core` owns the only stateful logic of the dashboard charts: a
//! left-to-right fold turning ordered, labeled financial deltas into bar
//! segments with a running total. Adapters (`wfall-adapters`) feed it
//! canonical items; the render contract (`wfall-render`) consumes its output.
//!
//! # Primary responsibilities
//! - **Item model**: [`WaterfallItem`], [`ItemKind`], and the JSON wire shape
//!   [`ItemRecord`].
//! - **Reducer**: [`reduce`] / [`reduce_records`] producing a [`Waterfall`].
//! - **Domain**: [`domain`] and [`Domain`] for axis bounds with headroom.
//! - **Overlays**: [`reduce_scenarios`] for best/base/worst bands on one axis.
//!
//! Everything here is pure and synchronous; calls share no state.

pub mod domain;
pub mod error;
pub mod item;
pub mod reduce;
pub mod scenario;

pub use domain::{DEFAULT_HEADROOM, Domain, domain};
pub use error::{Result, WaterfallError};
pub use item::{ItemKind, ItemRecord, WaterfallItem};
pub use reduce::{Segment, Waterfall, reduce, reduce_records};
pub use scenario::{Band, Scenario, ScenarioOverlay, reduce_scenarios};
