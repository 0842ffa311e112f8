//! Render configuration with environment overrides.
//!
//! Environment variables:
//! - `WFALL_HEADROOM` (float `>= 1.0`)
//! - `WFALL_LABEL_THRESHOLD` (float in `(0, 1)`)
//! - `WFALL_TRACK_WIDTH` (positive float; defaults to the domain span)
//! - `WFALL_CURRENCY` (symbol, e.g. `$`)
//! - `WFALL_DECIMALS` (integer `0..=4`)
//! - `WFALL_COLOR_START`, `WFALL_COLOR_INFLOW`, `WFALL_COLOR_OUTFLOW`,
//!   `WFALL_COLOR_SUBTOTAL`, `WFALL_COLOR_END_POSITIVE`,
//!   `WFALL_COLOR_END_NEGATIVE` (`#rgb` / `#rrggbb`)
//!
//! A malformed value keeps the default and is reported as a
//! [`RenderConfigError`].

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use wfall_core::DEFAULT_HEADROOM;

use crate::draw::LABEL_INSIDE_THRESHOLD;
use crate::palette::{Palette, is_hex_color};

const ENV_HEADROOM: &str = "WFALL_HEADROOM";
const ENV_LABEL_THRESHOLD: &str = "WFALL_LABEL_THRESHOLD";
const ENV_TRACK_WIDTH: &str = "WFALL_TRACK_WIDTH";
const ENV_CURRENCY: &str = "WFALL_CURRENCY";
const ENV_DECIMALS: &str = "WFALL_DECIMALS";
const ENV_COLORS: [(&str, &str); 6] = [
    ("WFALL_COLOR_START", "start"),
    ("WFALL_COLOR_INFLOW", "inflow"),
    ("WFALL_COLOR_OUTFLOW", "outflow"),
    ("WFALL_COLOR_SUBTOTAL", "subtotal"),
    ("WFALL_COLOR_END_POSITIVE", "end_positive"),
    ("WFALL_COLOR_END_NEGATIVE", "end_negative"),
];

const MAX_DECIMALS: usize = 4;

/// Presentation knobs for draw instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub headroom: f64,
    pub label_threshold: f64,
    pub track_width: Option<f64>,
    pub currency_symbol: String,
    pub decimals: usize,
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            headroom: DEFAULT_HEADROOM,
            label_threshold: LABEL_INSIDE_THRESHOLD,
            track_width: None,
            currency_symbol: "$".into(),
            decimals: 1,
            palette: Palette::default(),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct RenderConfigParse {
    pub config: RenderConfig,
    pub errors: Vec<RenderConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl RenderConfigError {
    pub fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for RenderConfigError {}

impl RenderConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> RenderConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> RenderConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Like [`from_env_with_diagnostics`](Self::from_env_with_diagnostics),
    /// reading `WFALL_*` values through `get` instead of the process env.
    #[must_use]
    pub fn from_lookup<F>(get: F) -> RenderConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        from_env_with(get)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<RenderConfigError>> {
        let mut errors = Vec::new();
        if !(self.headroom.is_finite() && self.headroom >= 1.0) {
            errors.push(RenderConfigError::new(
                "headroom",
                self.headroom.to_string(),
                "expected finite factor >= 1.0",
            ));
        }
        if !(self.label_threshold > 0.0 && self.label_threshold < 1.0) {
            errors.push(RenderConfigError::new(
                "label_threshold",
                self.label_threshold.to_string(),
                "expected ratio in (0, 1)",
            ));
        }
        if let Some(width) = self.track_width {
            if !(width.is_finite() && width > 0.0) {
                errors.push(RenderConfigError::new(
                    "track_width",
                    width.to_string(),
                    "expected positive finite width",
                ));
            }
        }
        if self.decimals > MAX_DECIMALS {
            errors.push(RenderConfigError::new(
                "decimals",
                self.decimals.to_string(),
                format!("expected 0..={MAX_DECIMALS}"),
            ));
        }
        for (field, color) in self.palette_fields() {
            if !is_hex_color(color) {
                errors.push(RenderConfigError::new(field, color, "expected #rgb or #rrggbb"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn palette_fields(&self) -> [(&'static str, &str); 6] {
        let p = &self.palette;
        [
            ("start", p.start.as_str()),
            ("inflow", p.inflow.as_str()),
            ("outflow", p.outflow.as_str()),
            ("subtotal", p.subtotal.as_str()),
            ("end_positive", p.end_positive.as_str()),
            ("end_negative", p.end_negative.as_str()),
        ]
    }

    fn palette_slot(&mut self, field: &str) -> Option<&mut String> {
        let p = &mut self.palette;
        match field {
            "start" => Some(&mut p.start),
            "inflow" => Some(&mut p.inflow),
            "outflow" => Some(&mut p.outflow),
            "subtotal" => Some(&mut p.subtotal),
            "end_positive" => Some(&mut p.end_positive),
            "end_negative" => Some(&mut p.end_negative),
            _ => None,
        }
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn from_env_with<F>(mut get: F) -> RenderConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = RenderConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_HEADROOM) {
        match parse_f64(&value).filter(|v| *v >= 1.0) {
            Some(parsed) => config.headroom = parsed,
            None => errors.push(RenderConfigError::new(
                "headroom",
                value,
                "expected finite factor >= 1.0",
            )),
        }
    }

    if let Some(value) = get(ENV_LABEL_THRESHOLD) {
        match parse_f64(&value).filter(|v| *v > 0.0 && *v < 1.0) {
            Some(parsed) => config.label_threshold = parsed,
            None => errors.push(RenderConfigError::new(
                "label_threshold",
                value,
                "expected ratio in (0, 1)",
            )),
        }
    }

    if let Some(value) = get(ENV_TRACK_WIDTH) {
        match parse_f64(&value).filter(|v| *v > 0.0) {
            Some(parsed) => config.track_width = Some(parsed),
            None => errors.push(RenderConfigError::new(
                "track_width",
                value,
                "expected positive finite width",
            )),
        }
    }

    if let Some(value) = get(ENV_CURRENCY) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(RenderConfigError::new(
                "currency_symbol",
                value,
                "expected non-empty symbol",
            ));
        } else {
            config.currency_symbol = trimmed.to_owned();
        }
    }

    if let Some(value) = get(ENV_DECIMALS) {
        match value.trim().parse::<usize>().ok().filter(|d| *d <= MAX_DECIMALS) {
            Some(parsed) => config.decimals = parsed,
            None => errors.push(RenderConfigError::new(
                "decimals",
                value,
                format!("expected integer 0..={MAX_DECIMALS}"),
            )),
        }
    }

    for (key, field) in ENV_COLORS {
        let Some(value) = get(key) else { continue };
        let trimmed = value.trim();
        if !is_hex_color(trimmed) {
            errors.push(RenderConfigError::new(field, value, "expected #rgb or #rrggbb"));
            continue;
        }
        if let Some(slot) = config.palette_slot(field) {
            *slot = trimmed.to_owned();
        }
    }

    if let Err(mut validation) = config.validate() {
        errors.append(&mut validation);
    }

    RenderConfigParse { config, errors }
}
