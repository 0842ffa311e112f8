#![forbid(unsafe_code)]

//! Render contract: reducer output in, draw instructions out.
//!
//! A charting collaborator receives one [`DrawInstruction`] per segment with
//! its bar in value units, a fill, a compact value label, where that label
//! goes, and the tooltip payload. Axis sizing comes from
//! [`wfall_core::Domain`]; overlays pass their shared domain to
//! [`to_draw_instructions_in`].
//!
//! [`text::render_bars`] draws the same instructions as plain-text rows.

pub mod config;
pub mod draw;
pub mod format;
pub mod palette;
pub mod text;

pub use config::{RenderConfig, RenderConfigError, RenderConfigParse};
pub use draw::{
    BarRect, DrawInstruction, Erosion, LABEL_INSIDE_THRESHOLD, LabelPlacement, Tooltip,
    place_label, to_draw_instructions, to_draw_instructions_in,
};
pub use format::{compact_currency, compact_currency_with, percent, signed_compact_currency};
pub use palette::Palette;
pub use text::render_bars;
