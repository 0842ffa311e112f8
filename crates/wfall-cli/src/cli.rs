#![forbid(unsafe_code)]

//! Command-line argument parsing for `wfall`.
//!
//! Parses args manually and accepts `WFALL_*` environment overrides. Render
//! settings (`WFALL_HEADROOM`, `WFALL_CURRENCY`, colors) are read by
//! [`wfall_render::RenderConfig::from_env`]; flags given here win over them.

use std::env;
use std::fmt;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
wfall: waterfall draw instructions from financial records

USAGE:
    wfall [OPTIONS] < records.json

OPTIONS:
    --input=PATH       Read JSON from PATH instead of stdin
    --adapter=NAME     Record shape (default: items, see ADAPTERS)
    --format=FORMAT    Output: 'json' or 'text' (default: json)
    --width=N          Track width in cells for text output (default: 60)
    --headroom=F       Axis headroom factor, at least 1.0 (default: 1.1)
    --log=LEVEL        Log filter for stderr, e.g. 'debug' (default: RUST_LOG or warn)
    --help, -h         Show this help message
    --version, -V      Show version

ADAPTERS:
    items            Array of {label, value, kind} records
    cash-flow        Opening balance, movements, closing total
    weekly           Weekly cash buckets over a forecast horizon
    corridor         Weekly forecast drawn as best/base/worst bands
    pnl              Revenue, cost sections with subtotals, net result
    cost-per-order   Per-order revenue, unit costs, contribution
    tariff           Landed cost bridge for one product row

ENVIRONMENT VARIABLES:
    WFALL_ADAPTER           Override --adapter
    WFALL_FORMAT            Override --format
    WFALL_WIDTH             Override --width
    WFALL_HEADROOM          Axis headroom factor
    WFALL_LABEL_THRESHOLD   Bar/track ratio below which labels go outside
    WFALL_TRACK_WIDTH       Fixed track width in value units
    WFALL_CURRENCY          Currency symbol (default: $)
    WFALL_DECIMALS          Decimals in compact labels (default: 1)
    WFALL_COLOR_*           START, INFLOW, OUTFLOW, SUBTOTAL, END_POSITIVE, END_NEGATIVE";

/// Which record shape the input holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    Items,
    CashFlow,
    Weekly,
    Corridor,
    Pnl,
    CostPerOrder,
    Tariff,
}

impl Adapter {
    pub const ALL: [Adapter; 7] = [
        Adapter::Items,
        Adapter::CashFlow,
        Adapter::Weekly,
        Adapter::Corridor,
        Adapter::Pnl,
        Adapter::CostPerOrder,
        Adapter::Tariff,
    ];

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Adapter::Items => "items",
            Adapter::CashFlow => "cash-flow",
            Adapter::Weekly => "weekly",
            Adapter::Corridor => "corridor",
            Adapter::Pnl => "pnl",
            Adapter::CostPerOrder => "cost-per-order",
            Adapter::Tariff => "tariff",
        }
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Input path; `None` reads stdin.
    pub input: Option<String>,
    pub adapter: Adapter,
    pub format: OutputFormat,
    /// Track width in cells for text bars.
    pub width: usize,
    /// Headroom override; `None` keeps the render config value.
    pub headroom: Option<f64>,
    /// Log filter directive.
    pub log: Option<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            input: None,
            adapter: Adapter::Items,
            format: OutputFormat::Json,
            width: 60,
            headroom: None,
            log: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("wfall {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment defaults; malformed values are ignored here.
        if let Some(val) = get_env("WFALL_ADAPTER")
            && let Some(adapter) = Adapter::parse(&val)
        {
            opts.adapter = adapter;
        }
        if let Some(val) = get_env("WFALL_FORMAT")
            && let Some(format) = OutputFormat::parse(&val)
        {
            opts.format = format;
        }
        if let Some(val) = get_env("WFALL_WIDTH")
            && let Ok(n) = val.trim().parse()
        {
            opts.width = n;
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--input=") {
                        if val.is_empty() || val == "-" {
                            opts.input = None;
                        } else {
                            opts.input = Some(val.to_string());
                        }
                    } else if let Some(val) = other.strip_prefix("--adapter=") {
                        opts.adapter =
                            Adapter::parse(val).ok_or_else(|| ParseError::InvalidValue {
                                flag: "--adapter",
                                value: val.to_string(),
                            })?;
                    } else if let Some(val) = other.strip_prefix("--format=") {
                        opts.format =
                            OutputFormat::parse(val).ok_or_else(|| ParseError::InvalidValue {
                                flag: "--format",
                                value: val.to_string(),
                            })?;
                    } else if let Some(val) = other.strip_prefix("--width=") {
                        match val.parse() {
                            Ok(n) => opts.width = n,
                            Err(_) => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--width",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--headroom=") {
                        match val.parse::<f64>() {
                            Ok(h) if h.is_finite() && h >= 1.0 => opts.headroom = Some(h),
                            _ => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--headroom",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        if !val.trim().is_empty() {
                            opts.log = Some(val.to_string());
                        }
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Opts, ParseError> {
        let map: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Opts::parse_from_env_and_args(args.iter().copied(), |key| map.get(key).cloned())
    }

    #[test]
    fn default_opts() {
        let opts = parse(&[], &[]).unwrap();
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.adapter, Adapter::Items);
        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.width, 60);
    }

    #[test]
    fn all_flags() {
        let opts = parse(
            &[
                "--input=pnl.json",
                "--adapter=pnl",
                "--format=text",
                "--width=40",
                "--headroom=1.25",
                "--log=debug",
            ],
            &[],
        )
        .unwrap();
        assert_eq!(opts.input.as_deref(), Some("pnl.json"));
        assert_eq!(opts.adapter, Adapter::Pnl);
        assert_eq!(opts.format, OutputFormat::Text);
        assert_eq!(opts.width, 40);
        assert_eq!(opts.headroom, Some(1.25));
        assert_eq!(opts.log.as_deref(), Some("debug"));
    }

    #[test]
    fn dash_input_means_stdin() {
        let opts = parse(&["--input=-"], &[]).unwrap();
        assert_eq!(opts.input, None);
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = [
            ("WFALL_ADAPTER", "tariff"),
            ("WFALL_FORMAT", "text"),
            ("WFALL_WIDTH", "30"),
        ];
        let opts = parse(&[], &env).unwrap();
        assert_eq!(opts.adapter, Adapter::Tariff);
        assert_eq!(opts.format, OutputFormat::Text);
        assert_eq!(opts.width, 30);

        let opts = parse(&["--adapter=corridor", "--width=80"], &env).unwrap();
        assert_eq!(opts.adapter, Adapter::Corridor);
        assert_eq!(opts.width, 80);
    }

    #[test]
    fn malformed_env_is_ignored() {
        let opts = parse(&[], &[("WFALL_ADAPTER", "ledger"), ("WFALL_WIDTH", "wide")]).unwrap();
        assert_eq!(opts.adapter, Adapter::Items);
        assert_eq!(opts.width, 60);
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            parse(&["--adapter=ledger"], &[]),
            Err(ParseError::InvalidValue {
                flag: "--adapter",
                value: "ledger".into()
            })
        );
        assert_eq!(
            parse(&["--headroom=0.9"], &[]),
            Err(ParseError::InvalidValue {
                flag: "--headroom",
                value: "0.9".into()
            })
        );
        assert!(parse(&["--width=-1"], &[]).is_err());
        assert!(parse(&["--format=svg"], &[]).is_err());
    }

    #[test]
    fn help_version_unknown() {
        assert_eq!(parse(&["-h"], &[]), Err(ParseError::Help));
        assert_eq!(parse(&["--version"], &[]), Err(ParseError::Version));
        assert_eq!(
            parse(&["--bogus"], &[]),
            Err(ParseError::UnknownArg("--bogus".into()))
        );
    }

    #[test]
    fn adapter_names_round_trip() {
        for adapter in Adapter::ALL {
            assert_eq!(Adapter::parse(adapter.as_str()), Some(adapter));
        }
        assert_eq!(Adapter::parse(" Cash-Flow "), Some(Adapter::CashFlow));
    }

    #[test]
    fn help_lists_every_adapter() {
        for adapter in Adapter::ALL {
            assert!(HELP_TEXT.contains(adapter.as_str()), "{adapter}");
        }
        assert!(HELP_TEXT.contains("WFALL_HEADROOM"));
    }
}
