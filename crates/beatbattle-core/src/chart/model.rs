use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::limits;
use super::{BeatEvent, ChartIssue, ValidationReport};
use crate::error::{Error, Result};

const DEFAULT_NAME: &str = "New Battle Chart";

/// Battle chart: tempo metadata plus events ordered by (measure, beat).
///
/// Events are kept sorted at all times. A chart deserialized from an asset may
/// still contain duplicate positions; those are reported by [`ChartModel::validate`]
/// rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChartAsset")]
pub struct ChartModel {
    pub bpm: u32,
    pub measures: u32,
    pub beats_per_measure: u32,
    /// Seconds before its judgement time that a note becomes live
    pub lookahead_seconds: f64,
    pub name: String,
    pub description: String,
    pub difficulty: u8,
    events: Vec<BeatEvent>,
}

/// Serialized form; events may arrive in any order.
#[derive(Deserialize)]
struct ChartAsset {
    bpm: u32,
    measures: u32,
    beats_per_measure: u32,
    lookahead_seconds: f64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    #[serde(default)]
    events: Vec<BeatEvent>,
}

fn default_difficulty() -> u8 {
    *limits::DIFFICULTY.start()
}

impl From<ChartAsset> for ChartModel {
    fn from(asset: ChartAsset) -> Self {
        let mut events = asset.events;
        events.sort_by_key(BeatEvent::position);
        Self {
            bpm: asset.bpm,
            measures: asset.measures,
            beats_per_measure: asset.beats_per_measure,
            lookahead_seconds: asset.lookahead_seconds,
            name: asset.name,
            description: asset.description,
            difficulty: asset.difficulty,
            events,
        }
    }
}

/// Event counts and duration of a chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartStatistics {
    pub event_count: usize,
    pub tap_count: usize,
    pub hold_count: usize,
    pub total_duration: f64,
}

impl Default for ChartModel {
    fn default() -> Self {
        Self::new(120, 8, 8, 2.0)
    }
}

impl ChartModel {
    pub fn new(bpm: u32, measures: u32, beats_per_measure: u32, lookahead_seconds: f64) -> Self {
        Self {
            bpm,
            measures,
            beats_per_measure,
            lookahead_seconds,
            name: DEFAULT_NAME.to_string(),
            description: String::new(),
            difficulty: default_difficulty(),
            events: Vec::new(),
        }
    }

    /// Build a chart from an arbitrary event list, sorting it by position.
    pub fn with_events(mut self, events: impl IntoIterator<Item = BeatEvent>) -> Self {
        self.events = events.into_iter().collect();
        self.events.sort_by_key(BeatEvent::position);
        self
    }

    /// Events in (measure, beat) order
    pub fn events(&self) -> &[BeatEvent] {
        &self.events
    }

    pub fn event_at(&self, measure: u32, beat: u32) -> Option<&BeatEvent> {
        self.events
            .binary_search_by_key(&(measure, beat), BeatEvent::position)
            .ok()
            .map(|idx| &self.events[idx])
    }

    /// Insert an event, keeping time order. Fails if the position is taken.
    pub fn add_event(&mut self, event: BeatEvent) -> Result<()> {
        match self
            .events
            .binary_search_by_key(&event.position(), BeatEvent::position)
        {
            Ok(_) => {
                warn!("Position {} already has an event", event.position_label());
                Err(Error::Conflict {
                    measure: event.measure,
                    beat: event.beat,
                })
            }
            Err(idx) => {
                debug!("Added event: {}", event);
                self.events.insert(idx, event);
                Ok(())
            }
        }
    }

    pub fn remove_event_at(&mut self, measure: u32, beat: u32) -> bool {
        match self
            .events
            .binary_search_by_key(&(measure, beat), BeatEvent::position)
        {
            Ok(idx) => {
                let removed = self.events.remove(idx);
                debug!("Removed event: {}", removed);
                true
            }
            Err(_) => false,
        }
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Seconds per beat, 0 for a degenerate tempo
    pub fn beat_duration(&self) -> f64 {
        if self.bpm == 0 {
            return 0.0;
        }
        60.0 / self.bpm as f64
    }

    pub fn absolute_time_of(&self, event: &BeatEvent) -> f64 {
        if self.bpm == 0 || self.beats_per_measure == 0 {
            return 0.0;
        }
        let beat = self.beat_duration();
        event.measure as f64 * self.beats_per_measure as f64 * beat + event.beat as f64 * beat
    }

    pub fn hold_duration_of(&self, event: &BeatEvent) -> f64 {
        if self.bpm == 0 || self.beats_per_measure == 0 {
            return 0.0;
        }
        event.duration_in_beats() as f64 * self.beat_duration()
    }

    pub fn total_duration(&self) -> f64 {
        if self.bpm == 0 || self.beats_per_measure == 0 {
            return 0.0;
        }
        self.measures as f64 * self.beats_per_measure as f64 * self.beat_duration()
    }

    /// Check parameter ranges, event ranges, duplicate positions and hold spans.
    ///
    /// Never fails: every problem found is collected into the report.
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        if !limits::BPM.contains(&self.bpm) {
            issues.push(ChartIssue::BpmOutOfRange(self.bpm));
        }
        if !limits::MEASURES.contains(&self.measures) {
            issues.push(ChartIssue::MeasuresOutOfRange(self.measures));
        }
        if !limits::BEATS_PER_MEASURE.contains(&self.beats_per_measure) {
            issues.push(ChartIssue::BeatsPerMeasureOutOfRange(self.beats_per_measure));
        }
        if !(limits::LOOKAHEAD_MIN..=limits::LOOKAHEAD_MAX).contains(&self.lookahead_seconds) {
            issues.push(ChartIssue::LookaheadOutOfRange(self.lookahead_seconds));
        }
        if !limits::DIFFICULTY.contains(&self.difficulty) {
            issues.push(ChartIssue::DifficultyOutOfRange(self.difficulty));
        }

        for event in &self.events {
            event.check_range(self.measures, self.beats_per_measure, &mut issues);
        }

        // Events are sorted, so equal positions are adjacent
        for group in self.events.chunk_by(|a, b| a.position() == b.position()) {
            if group.len() > 1 {
                issues.push(ChartIssue::DuplicatePosition {
                    position: group[0].position_label(),
                    count: group.len(),
                });
            }
        }

        for hold in self.events.iter().filter(|e| e.is_hold()) {
            let Some(end_beat) = hold.hold_end_beat() else {
                continue;
            };
            let span_start = (hold.measure, hold.beat.saturating_add(1));
            let from = self.events.partition_point(|e| e.position() < span_start);
            let mut last_reported = None;
            for other in self.events[from..]
                .iter()
                .take_while(|e| e.measure == hold.measure && e.beat <= end_beat)
            {
                if last_reported == Some(other.position()) {
                    continue;
                }
                last_reported = Some(other.position());
                issues.push(ChartIssue::HoldOverlap {
                    hold: hold.position_label(),
                    other: other.position_label(),
                });
            }
        }

        let report = ValidationReport::new(issues);
        if report.is_valid() {
            debug!("Chart validated: {}", self.name);
        } else {
            warn!("Chart validation failed: {} ({})", self.name, report);
        }
        report
    }

    pub fn statistics(&self) -> ChartStatistics {
        let hold_count = self.events.iter().filter(|e| e.is_hold()).count();
        ChartStatistics {
            event_count: self.events.len(),
            tap_count: self.events.len() - hold_count,
            hold_count,
            total_duration: self.total_duration(),
        }
    }

    /// Clamp parameters into their legal ranges (editor-side sanitising).
    pub fn clamp_parameters(&mut self) {
        self.bpm = self.bpm.clamp(*limits::BPM.start(), *limits::BPM.end());
        self.measures = self
            .measures
            .clamp(*limits::MEASURES.start(), *limits::MEASURES.end());
        self.beats_per_measure = self.beats_per_measure.clamp(
            *limits::BEATS_PER_MEASURE.start(),
            *limits::BEATS_PER_MEASURE.end(),
        );
        self.difficulty = self
            .difficulty
            .clamp(*limits::DIFFICULTY.start(), *limits::DIFFICULTY.end());
        self.lookahead_seconds = if self.lookahead_seconds.is_nan() {
            limits::LOOKAHEAD_MIN
        } else {
            self.lookahead_seconds
                .clamp(limits::LOOKAHEAD_MIN, limits::LOOKAHEAD_MAX)
        };
        if self.name.trim().is_empty() {
            self.name = DEFAULT_NAME.to_string();
        }
    }

    /// Simple practice pattern: a tap on beat 1 of every measure, plus a tap on
    /// beat 5 and a one-beat hold from beat 3 to beat 4 of every other measure
    /// when measures have more than four beats. Shorter measures get taps only.
    pub fn test_pattern(bpm: u32, measures: u32, beats_per_measure: u32) -> Self {
        let mut chart = Self::new(bpm, measures, beats_per_measure, 2.0);
        chart.name = "Test Pattern".to_string();

        for measure in 0..measures {
            chart.events.push(BeatEvent::tap(measure, 0));
            if measure % 2 == 0 && beats_per_measure > 4 {
                chart.events.push(BeatEvent::hold(measure, 2, 3));
            }
            if beats_per_measure > 4 {
                chart.events.push(BeatEvent::tap(measure, 4));
            }
        }

        info!(
            "Generated test pattern with {} events",
            chart.events.len()
        );
        chart
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let chart = Self::from_json_str(&content)?;
        info!(
            "Loaded chart '{}' from {:?} ({} events)",
            chart.name,
            path.as_ref(),
            chart.events.len()
        );
        Ok(chart)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
