//! Info command for showing chart metadata.

use anyhow::Result;
use beatbattle_core::ChartStatistics;
use serde::Serialize;

use crate::report;

#[derive(Serialize)]
struct ChartInfo<'a> {
    name: &'a str,
    description: &'a str,
    difficulty: u8,
    bpm: u32,
    measures: u32,
    beats_per_measure: u32,
    lookahead_seconds: f64,
    statistics: ChartStatistics,
    valid: bool,
    issues: Vec<String>,
}

pub fn run(chart_path: &str, json: bool) -> Result<()> {
    let chart = super::load_chart(chart_path)?;
    let validation = chart.validate();

    if json {
        let info = ChartInfo {
            name: &chart.name,
            description: &chart.description,
            difficulty: chart.difficulty,
            bpm: chart.bpm,
            measures: chart.measures,
            beats_per_measure: chart.beats_per_measure,
            lookahead_seconds: chart.lookahead_seconds,
            statistics: chart.statistics(),
            valid: validation.is_valid(),
            issues: validation.messages(),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", report::format_chart_info(&chart, &validation));
    }

    Ok(())
}
