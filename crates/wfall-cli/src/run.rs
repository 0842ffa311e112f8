//! Input → adapter → reducer → render pipeline behind the `wfall` binary.
//!
//! # Failure Modes
//!
//! | Failure | Code | Cause |
//! |---------|------|-------|
//! | `Io` | `io` | Input path unreadable |
//! | `Json` | `invalid_json` | Input is not the adapter's record shape |
//! | `Waterfall` | [`WaterfallError::code`] | Validation, reduction, or domain failure |
//! | `Encode` | `encode` | Output serialization failed |
//!
//! Every failure becomes the same neutral object on stdout:
//! `{"error": {"code": ..., "message": ...}}`.

use std::fmt;
use std::fs;
use std::io::{self, Read};

use serde::Serialize;
use serde::de::DeserializeOwned;
use wfall_adapters::{
    CashFlowStatement, CorridorInput, CostPerOrder, IntoWaterfall, PnlStatement, TariffMarginRow,
    WeeklyCashForecast,
};
use wfall_core::{Domain, ItemRecord, Scenario, Waterfall, WaterfallError, reduce_records};
use wfall_render::{
    DrawInstruction, RenderConfig, RenderConfigParse, render_bars, to_draw_instructions_in,
};

use crate::cli::{Adapter, Opts, OutputFormat};

/// Anything that stops the pipeline.
#[derive(Debug)]
pub enum CliError {
    Io { path: String, message: String },
    Json(String),
    Waterfall(WaterfallError),
    Encode(String),
}

impl CliError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Json(_) => "invalid_json",
            Self::Waterfall(err) => err.code(),
            Self::Encode(_) => "encode",
        }
    }

    /// Neutral error object printed in place of a chart.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "error": { "code": self.code(), "message": self.to_string() }
        })
        .to_string()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Json(message) => write!(f, "invalid input: {message}"),
            Self::Waterfall(err) => write!(f, "{err}"),
            Self::Encode(message) => write!(f, "cannot encode output: {message}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Waterfall(err) => Some(err),
            _ => None,
        }
    }
}

impl From<WaterfallError> for CliError {
    fn from(err: WaterfallError) -> Self {
        Self::Waterfall(err)
    }
}

/// Read the whole input from `path`, or stdin when `None`.
pub fn read_input(path: Option<&str>) -> Result<String, CliError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| CliError::Io {
            path: path.to_owned(),
            message: e.to_string(),
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::Io {
                    path: "<stdin>".to_owned(),
                    message: e.to_string(),
                })?;
            Ok(buf)
        }
    }
}

/// Render config from `WFALL_*` env vars with CLI overrides applied.
#[must_use]
pub fn render_config(opts: &Opts) -> RenderConfig {
    apply_overrides(opts, RenderConfig::from_env_with_diagnostics())
}

fn apply_overrides(opts: &Opts, parsed: RenderConfigParse) -> RenderConfig {
    for err in &parsed.errors {
        tracing::warn!(
            setting = err.field,
            value = %err.value,
            "ignoring render setting: {}",
            err.message
        );
    }
    let mut config = parsed.config;
    if let Some(headroom) = opts.headroom {
        config.headroom = headroom;
    }
    config
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartOutput {
    final_total: f64,
    domain: Domain,
    instructions: Vec<DrawInstruction>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BandOutput {
    scenario: Scenario,
    final_total: f64,
    instructions: Vec<DrawInstruction>,
}

#[derive(Serialize)]
struct CorridorOutput {
    domain: Domain,
    bands: Vec<BandOutput>,
}

fn parse<T: DeserializeOwned>(input: &str) -> Result<T, CliError> {
    serde_json::from_str(input).map_err(|e| CliError::Json(e.to_string()))
}

fn reduce_with<T: DeserializeOwned + IntoWaterfall>(input: &str) -> Result<Waterfall, CliError> {
    let record: T = parse(input)?;
    tracing::debug!(adapter = T::ADAPTER, "parsed record");
    Ok(record.reduce()?)
}

fn encode<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Encode(e.to_string()))
}

fn render_single(
    opts: &Opts,
    config: &RenderConfig,
    waterfall: Waterfall,
) -> Result<String, CliError> {
    let domain = Domain::for_waterfall(&waterfall, config.headroom)?;
    let instructions = to_draw_instructions_in(&waterfall, &domain, config);
    tracing::info!(
        adapter = %opts.adapter,
        segments = waterfall.len(),
        final_total = waterfall.final_total,
        "rendered waterfall"
    );

    match opts.format {
        OutputFormat::Json => encode(&ChartOutput {
            final_total: waterfall.final_total,
            domain,
            instructions,
        }),
        OutputFormat::Text => Ok(render_bars(&instructions, &domain, opts.width)),
    }
}

fn render_corridor(opts: &Opts, config: &RenderConfig, input: &str) -> Result<String, CliError> {
    let corridor: CorridorInput = parse(input)?;
    let overlay = corridor.overlay(config.headroom)?;
    tracing::info!(
        bands = overlay.bands.len(),
        min = overlay.domain.min,
        max = overlay.domain.max,
        "rendered corridor"
    );

    let bands: Vec<BandOutput> = overlay
        .bands
        .iter()
        .map(|band| BandOutput {
            scenario: band.scenario,
            final_total: band.waterfall.final_total,
            instructions: to_draw_instructions_in(&band.waterfall, &overlay.domain, config),
        })
        .collect();

    match opts.format {
        OutputFormat::Json => encode(&CorridorOutput {
            domain: overlay.domain,
            bands,
        }),
        OutputFormat::Text => Ok(bands
            .iter()
            .map(|band| {
                format!(
                    "[{}]\n{}",
                    band.scenario,
                    render_bars(&band.instructions, &overlay.domain, opts.width)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

/// Turn one input document into the chosen output.
pub fn render(opts: &Opts, config: &RenderConfig, input: &str) -> Result<String, CliError> {
    let waterfall = match opts.adapter {
        Adapter::Corridor => return render_corridor(opts, config, input),
        Adapter::Items => {
            let records: Vec<ItemRecord> = parse(input)?;
            reduce_records(&records)?
        }
        Adapter::CashFlow => reduce_with::<CashFlowStatement>(input)?,
        Adapter::Weekly => reduce_with::<WeeklyCashForecast>(input)?,
        Adapter::Pnl => reduce_with::<PnlStatement>(input)?,
        Adapter::CostPerOrder => reduce_with::<CostPerOrder>(input)?,
        Adapter::Tariff => reduce_with::<TariffMarginRow>(input)?,
    };
    render_single(opts, config, waterfall)
}
