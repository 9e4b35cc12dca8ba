use thiserror::Error;

/// A single problem found while validating a chart
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartIssue {
    #[error("BPM {0} is outside 60..=300")]
    BpmOutOfRange(u32),

    #[error("Measure count {0} is outside 1..=32")]
    MeasuresOutOfRange(u32),

    #[error("Beats per measure {0} is outside 4..=16")]
    BeatsPerMeasureOutOfRange(u32),

    #[error("Lookahead {0}s is outside 0.5..=5.0")]
    LookaheadOutOfRange(f64),

    #[error("Difficulty {0} is outside 1..=5")]
    DifficultyOutOfRange(u8),

    #[error("Event {position}: measure {measure} is past the last measure ({measures} total)")]
    MeasureOutOfRange {
        position: String,
        measure: u32,
        measures: u32,
    },

    #[error("Event {position}: beat {beat} is past the end of the measure ({beats_per_measure} beats)")]
    BeatOutOfRange {
        position: String,
        beat: u32,
        beats_per_measure: u32,
    },

    #[error("Hold {position}: end beat {end_beat} must be after the start beat")]
    HoldEndNotAfterStart { position: String, end_beat: u32 },

    #[error("Hold {position}: end beat {end_beat} crosses the measure boundary ({beats_per_measure} beats)")]
    HoldCrossesMeasure {
        position: String,
        end_beat: u32,
        beats_per_measure: u32,
    },

    #[error("Duplicate events at {position} ({count} events)")]
    DuplicatePosition { position: String, count: usize },

    #[error("Hold {hold} overlaps event {other}")]
    HoldOverlap { hold: String, other: String },
}

/// Full list of problems found by `ChartModel::validate`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ChartIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ChartIssue>) -> Self {
        Self { issues }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ChartIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable messages, one per issue
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "no issues");
        }
        write!(f, "{} issue(s): {}", self.issues.len(), self.messages().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::default();
        assert!(report.is_valid());
        assert_eq!(report.to_string(), "no issues");
    }

    #[test]
    fn test_report_display_joins_messages() {
        let report = ValidationReport::new(vec![
            ChartIssue::BpmOutOfRange(10),
            ChartIssue::DuplicatePosition {
                position: "M1:B1".to_string(),
                count: 2,
            },
        ]);
        assert!(!report.is_valid());
        assert_eq!(
            report.to_string(),
            "2 issue(s): BPM 10 is outside 60..=300; Duplicate events at M1:B1 (2 events)"
        );
    }
}
