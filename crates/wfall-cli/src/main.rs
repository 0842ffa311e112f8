#![forbid(unsafe_code)]

//! `wfall` binary entry point.

use std::io;
use std::process;

use tracing_subscriber::EnvFilter;
use wfall_cli::cli::Opts;
use wfall_cli::run;

fn init_logging(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let opts = Opts::parse();
    init_logging(opts.log.as_deref());

    let config = run::render_config(&opts);
    let result = run::read_input(opts.input.as_deref())
        .and_then(|input| run::render(&opts, &config, &input));

    match result {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            println!("{}", err.to_json());
            process::exit(1);
        }
    }
}
