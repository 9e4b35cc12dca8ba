//! CLI argument definitions for beatbattle.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "beatbattle")]
#[command(about = "Rhythm battle chart checker and simulator", version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a chart file and list every problem found
    Validate {
        /// Chart file (JSON)
        chart: String,
    },
    /// Show chart metadata and statistics
    Info {
        /// Chart file (JSON)
        chart: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a practice chart
    Generate {
        /// Tempo in beats per minute
        #[arg(long, default_value = "120")]
        bpm: u32,
        /// Number of measures
        #[arg(long, default_value = "8")]
        measures: u32,
        /// Beats in each measure
        #[arg(long, default_value = "8")]
        beats_per_measure: u32,
        /// Chart name
        #[arg(long)]
        name: Option<String>,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Play a chart against scripted input and report the outcome
    Simulate {
        /// Chart file (JSON)
        chart: String,
        /// Input script ("press <t>" / "release <t>" per line)
        #[arg(short, long, value_name = "FILE")]
        inputs: Option<String>,
        /// Engine config (TOML)
        #[arg(long, value_name = "FILE", env = "BEATBATTLE_CONFIG")]
        config: Option<String>,
        /// Simulation tick in seconds
        #[arg(long, default_value = "0.008")]
        tick: f64,
        /// Print every battle notification
        #[arg(long)]
        events: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
