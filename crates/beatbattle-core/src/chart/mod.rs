//! Chart-related types and data structures.
//!
//! This module contains types for describing a battle chart:
//! - `BeatEvent`, `EventKind` - a single tap or hold placed on a (measure, beat) grid
//! - `ChartModel` - tempo metadata plus the time-ordered event list
//! - `ChartIssue`, `ValidationReport` - load-time validation results

mod event;
mod model;
mod validation;

pub use event::*;
pub use model::*;
pub use validation::*;

/// Legal ranges for chart parameters.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const BPM: RangeInclusive<u32> = 60..=300;
    pub const MEASURES: RangeInclusive<u32> = 1..=32;
    pub const BEATS_PER_MEASURE: RangeInclusive<u32> = 4..=16;
    pub const DIFFICULTY: RangeInclusive<u8> = 1..=5;

    /// Lookahead ("fixed drop time") in seconds.
    pub const LOOKAHEAD_MIN: f64 = 0.5;
    pub const LOOKAHEAD_MAX: f64 = 5.0;
}
