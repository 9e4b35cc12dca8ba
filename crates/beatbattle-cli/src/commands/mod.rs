//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod generate;
pub mod info;
pub mod simulate;
pub mod validate;

use anyhow::{Context, Result};
use beatbattle_core::ChartModel;

/// Load a chart file, naming the path in the error
fn load_chart(path: &str) -> Result<ChartModel> {
    ChartModel::load(path).with_context(|| format!("Failed to load chart: {}", path))
}
