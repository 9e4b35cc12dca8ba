//! Generate command for writing practice charts.

use anyhow::{Result, bail};
use beatbattle_core::ChartModel;
use tracing::info;

pub fn run(
    bpm: u32,
    measures: u32,
    beats_per_measure: u32,
    name: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let mut chart = ChartModel::test_pattern(bpm, measures, beats_per_measure);
    if let Some(name) = name {
        chart.name = name.to_string();
    }

    let validation = chart.validate();
    if !validation.is_valid() {
        bail!("Cannot generate chart: {}", validation);
    }

    let content = chart.to_json_string()?;
    if let Some(output_path) = output {
        std::fs::write(output_path, &content)?;
        info!("Wrote {} events to {}", chart.events().len(), output_path);
        eprintln!("Generated: {}", output_path);
    } else {
        println!("{}", content);
    }

    Ok(())
}
