//! Note lifecycle scheduling against the music clock.
//!
//! The scheduler walks the chart in time order, spawns notes `lookahead`
//! seconds before their judgement time, auto-misses notes whose late window
//! elapsed without a press, and removes resolved notes from the live set once
//! their grace period is over.

mod note;

pub use note::*;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chart::ChartModel;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::events::{BattleEvent, EventSink};
use crate::judge::JudgementWindows;

/// Notes that changed state during one `advance` call
#[derive(Debug, Clone, Default)]
pub struct AdvanceReport {
    pub spawned: Vec<LiveNote>,
    pub auto_missed: Vec<LiveNote>,
    pub processed: Vec<LiveNote>,
}

impl AdvanceReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.auto_missed.is_empty() && self.processed.is_empty()
    }
}

pub struct NoteScheduler {
    chart: Option<Arc<ChartModel>>,
    /// Event indices sorted by absolute time (stable: ties keep chart order)
    order: Vec<usize>,
    /// Next entry of `order` to spawn
    cursor: usize,
    live: Vec<LiveNote>,
    windows: JudgementWindows,
    grace_period: f64,
    last_now: Option<f64>,
}

impl NoteScheduler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            chart: None,
            order: Vec::new(),
            cursor: 0,
            live: Vec::new(),
            windows: config.windows,
            grace_period: config.grace_period,
            last_now: None,
        }
    }

    /// Validate and load a chart, resetting the cursor and live set.
    ///
    /// An invalid chart is rejected with the full validation report and the
    /// scheduler is left untouched.
    pub fn load_chart(&mut self, chart: Arc<ChartModel>) -> Result<()> {
        let report = chart.validate();
        if !report.is_valid() {
            warn!("Refusing to load chart '{}': {}", chart.name, report);
            return Err(Error::InvalidChart(report));
        }

        let mut order: Vec<usize> = (0..chart.events().len()).collect();
        order.sort_by(|&a, &b| {
            let ta = chart.absolute_time_of(&chart.events()[a]);
            let tb = chart.absolute_time_of(&chart.events()[b]);
            ta.total_cmp(&tb)
        });

        info!(
            "Loaded chart '{}' ({} events, {:.2}s)",
            chart.name,
            order.len(),
            chart.total_duration()
        );

        self.order = order;
        self.chart = Some(chart);
        self.reset();
        Ok(())
    }

    /// Clear cursor and live set. The loaded chart is kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.live.clear();
        self.last_now = None;
    }

    pub fn chart(&self) -> Option<&Arc<ChartModel>> {
        self.chart.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.chart.is_some()
    }

    pub(crate) fn ensure_loaded(&self) -> Result<&Arc<ChartModel>> {
        self.chart.as_ref().ok_or(Error::NoChartLoaded)
    }

    /// Advance to judgement time `now`.
    ///
    /// Runs, in order: removal of resolved notes whose grace period elapsed,
    /// spawning, window entry, and auto-miss. Calling it again with the same
    /// `now` emits nothing new.
    pub fn advance(&mut self, now: f64, sink: &mut dyn EventSink) -> Result<AdvanceReport> {
        let chart = Arc::clone(self.ensure_loaded()?);
        if let Some(last) = self.last_now
            && now < last
        {
            return Err(Error::invariant(format!(
                "music time went backwards ({last:.4}s -> {now:.4}s)"
            )));
        }
        self.last_now = Some(now);

        let mut report = AdvanceReport::default();

        let grace = self.grace_period;
        let mut idx = 0;
        while idx < self.live.len() {
            let expired = self.live[idx]
                .resolved_time
                .is_some_and(|resolved| now > resolved + grace);
            if expired {
                let note = self.live.remove(idx);
                sink.emit(BattleEvent::NoteProcessed(note));
                report.processed.push(note);
            } else {
                idx += 1;
            }
        }

        while let Some(&event_idx) = self.order.get(self.cursor) {
            let event = chart.events()[event_idx];
            let center = chart.absolute_time_of(&event);
            if center - chart.lookahead_seconds > now {
                break;
            }
            let note = LiveNote::spawn(
                NoteId(self.cursor),
                event,
                center,
                chart.hold_duration_of(&event),
                now,
            );
            debug!("Spawned note {} ({}) at {:.3}s", note.id, event, now);
            sink.emit(BattleEvent::NoteSpawned(note));
            report.spawned.push(note);
            self.live.push(note);
            self.cursor += 1;
        }

        let late = self.windows.late;
        for note in &mut self.live {
            if note.state == NoteState::Spawned && now >= note.judge_window_center - late {
                note.state = NoteState::PressPending;
            }
            if note.state.accepts_press() && note.judge_window_center + late < now {
                note.resolve(Resolution::AutoMiss, now);
                debug!("Auto-missed note {} ({})", note.id, note.event);
                sink.emit(BattleEvent::NoteAutoMiss(*note));
                report.auto_missed.push(*note);
            }
        }

        Ok(report)
    }

    /// Earliest unresolved note whose window contains a press at `time`
    pub fn find_press_target(&self, time: f64) -> Option<NoteId> {
        self.live
            .iter()
            .find(|note| {
                note.state.accepts_press() && self.windows.contains(note.offset(time))
            })
            .map(|note| note.id)
    }

    pub fn note(&self, id: NoteId) -> Option<&LiveNote> {
        self.live.iter().find(|note| note.id == id)
    }

    fn note_mut(&mut self, id: NoteId) -> Result<&mut LiveNote> {
        self.live
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| Error::invariant(format!("note {id} is not in the live set")))
    }

    /// Move a pressed hold note into `Holding`
    pub fn begin_hold(&mut self, id: NoteId) -> Result<LiveNote> {
        let note = self.note_mut(id)?;
        if !note.event.is_hold() || !note.state.accepts_press() {
            return Err(Error::invariant(format!(
                "note {id} cannot start holding from {:?}",
                note.state
            )));
        }
        note.state = NoteState::Holding;
        Ok(*note)
    }

    /// Resolve a note that is still awaiting judgement
    pub fn resolve(&mut self, id: NoteId, resolution: Resolution, time: f64) -> Result<LiveNote> {
        let note = self.note_mut(id)?;
        if note.is_resolved() {
            return Err(Error::invariant(format!("note {id} is already resolved")));
        }
        note.resolve(resolution, time);
        Ok(*note)
    }

    pub fn live_notes(&self) -> &[LiveNote] {
        &self.live
    }

    /// Events not yet spawned
    pub fn pending_count(&self) -> usize {
        self.order.len().saturating_sub(self.cursor)
    }

    pub fn total_notes(&self) -> usize {
        self.order.len()
    }

    /// Fraction of the chart duration elapsed, in [0, 1]
    pub fn progress(&self) -> f64 {
        let (Some(chart), Some(now)) = (&self.chart, self.last_now) else {
            return 0.0;
        };
        let total = chart.total_duration();
        if total <= 0.0 {
            return 0.0;
        }
        (now / total).clamp(0.0, 1.0)
    }

    /// Every event spawned and the live set drained
    pub fn is_completed(&self) -> bool {
        self.chart.is_some() && self.cursor >= self.order.len() && self.live.is_empty()
    }
}
