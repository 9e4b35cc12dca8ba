mod cli;
mod commands;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (warn unless RUST_LOG or --verbose says otherwise)
    let default_filter = if args.verbose {
        "beatbattle_cli=debug,beatbattle_core=debug"
    } else {
        "beatbattle_cli=warn,beatbattle_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Validate { chart } => commands::validate::run(&chart),
        Command::Info { chart, json } => commands::info::run(&chart, json),
        Command::Generate {
            bpm,
            measures,
            beats_per_measure,
            name,
            output,
        } => commands::generate::run(
            bpm,
            measures,
            beats_per_measure,
            name.as_deref(),
            output.as_deref(),
        ),
        Command::Simulate {
            chart,
            inputs,
            config,
            tick,
            events,
            json,
        } => commands::simulate::run(
            &chart,
            inputs.as_deref(),
            config.as_deref(),
            tick,
            events,
            json,
        ),
    }
}
