use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use super::ChartIssue;

/// Note kind of a beat event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, IntoStaticStr,
)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    #[strum(serialize = "TAP")]
    Tap,
    /// Sustained note from the event's beat up to `end_beat` of the same measure.
    #[strum(serialize = "HOLD")]
    Hold { end_beat: u32 },
}

impl EventKind {
    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// A single event placed on the chart grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeatEvent {
    pub measure: u32,
    pub beat: u32,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl BeatEvent {
    pub fn tap(measure: u32, beat: u32) -> Self {
        Self {
            measure,
            beat,
            kind: EventKind::Tap,
        }
    }

    pub fn hold(measure: u32, beat: u32, end_beat: u32) -> Self {
        Self {
            measure,
            beat,
            kind: EventKind::Hold { end_beat },
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self.kind, EventKind::Hold { .. })
    }

    pub fn is_tap(&self) -> bool {
        matches!(self.kind, EventKind::Tap)
    }

    pub fn hold_end_beat(&self) -> Option<u32> {
        match self.kind {
            EventKind::Hold { end_beat } => Some(end_beat),
            EventKind::Tap => None,
        }
    }

    /// Length of a hold in beats (0 for taps)
    pub fn duration_in_beats(&self) -> u32 {
        self.hold_end_beat()
            .map(|end| end.saturating_sub(self.beat))
            .unwrap_or(0)
    }

    /// Grid key used for ordering and lookups
    pub fn position(&self) -> (u32, u32) {
        (self.measure, self.beat)
    }

    /// One-based label shown to chart authors, e.g. "M1:B3"
    pub fn position_label(&self) -> String {
        format!("M{}:B{}", self.measure + 1, self.beat + 1)
    }

    /// Range checks against the chart grid.
    pub(crate) fn check_range(
        &self,
        measures: u32,
        beats_per_measure: u32,
        issues: &mut Vec<ChartIssue>,
    ) {
        if self.measure >= measures {
            issues.push(ChartIssue::MeasureOutOfRange {
                position: self.position_label(),
                measure: self.measure,
                measures,
            });
        }
        if self.beat >= beats_per_measure {
            issues.push(ChartIssue::BeatOutOfRange {
                position: self.position_label(),
                beat: self.beat,
                beats_per_measure,
            });
        }
        if let EventKind::Hold { end_beat } = self.kind {
            if end_beat <= self.beat {
                issues.push(ChartIssue::HoldEndNotAfterStart {
                    position: self.position_label(),
                    end_beat,
                });
            }
            if end_beat >= beats_per_measure {
                issues.push(ChartIssue::HoldCrossesMeasure {
                    position: self.position_label(),
                    end_beat,
                    beats_per_measure,
                });
            }
        }
    }
}

impl std::fmt::Display for BeatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EventKind::Tap => write!(f, "{} {}", self.kind, self.position_label()),
            EventKind::Hold { end_beat } => write!(
                f,
                "{} {} -> B{}",
                self.kind,
                self.position_label(),
                end_beat + 1
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_duration_in_beats() {
        assert_eq!(BeatEvent::hold(0, 2, 6).duration_in_beats(), 4);
        assert_eq!(BeatEvent::tap(0, 2).duration_in_beats(), 0);
    }

    #[test]
    fn test_position_label_is_one_based() {
        assert_eq!(BeatEvent::tap(0, 0).position_label(), "M1:B1");
        assert_eq!(BeatEvent::tap(3, 7).position_label(), "M4:B8");
    }

    #[test]
    fn test_check_range_flags_every_problem() {
        let mut issues = Vec::new();
        BeatEvent::hold(8, 9, 9).check_range(8, 8, &mut issues);
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_check_range_accepts_valid_hold() {
        let mut issues = Vec::new();
        BeatEvent::hold(0, 2, 7).check_range(1, 8, &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&BeatEvent::hold(1, 2, 5)).unwrap();
        assert_eq!(json, r#"{"measure":1,"beat":2,"type":"hold","end_beat":5}"#);

        let tap: BeatEvent = serde_json::from_str(r#"{"measure":0,"beat":4,"type":"tap"}"#).unwrap();
        assert_eq!(tap, BeatEvent::tap(0, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(BeatEvent::tap(0, 0).to_string(), "TAP M1:B1");
        assert_eq!(BeatEvent::hold(0, 2, 6).to_string(), "HOLD M1:B3 -> B7");
    }
}
