//! `stratum` entry point: parse arguments, install reporting, run a command.

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stratum_cli::cli::Cli;
use stratum_cli::commands::run;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    run(&cli, &mut stdout).map_err(color_eyre::eyre::Report::from)
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
