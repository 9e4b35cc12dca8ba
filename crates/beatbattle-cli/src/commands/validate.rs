//! Validate command for checking chart files.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

/// Validate a chart and print every issue
pub fn run(chart_path: &str) -> Result<()> {
    let chart = super::load_chart(chart_path)?;
    let report = chart.validate();

    if report.is_valid() {
        println!(
            "{} {} ({} events)",
            "OK".green().bold(),
            chart.name,
            chart.events().len()
        );
        return Ok(());
    }

    println!("{} {}", "INVALID".red().bold(), chart.name);
    for message in report.messages() {
        println!("  - {}", message);
    }
    bail!("{} has {} validation issue(s)", chart_path, report.len());
}
