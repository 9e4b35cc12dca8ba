use serde::Serialize;
use tracing::{debug, trace, warn};

use super::{BattleStatistics, DamagePolicy, FixedDamage, Judgement, JudgementWindows, MissCause};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::events::{BattleEvent, EventSink};
use crate::scheduler::{LiveNote, NoteId, NoteScheduler, Resolution};

/// Hold note currently being sustained
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveHold {
    pub note: NoteId,
    /// Judgement time of the hold's start beat; a late press does not
    /// extend the hold past its end beat
    pub start_time: f64,
    pub duration: f64,
    /// Completed fraction in [0, 1]
    pub progress: f64,
}

impl ActiveHold {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    fn progress_at(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }
}

/// Combo and most recent result
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JudgementState {
    pub combo: u32,
    pub last_judgement: Option<Judgement>,
    pub last_judgement_time: Option<f64>,
    pub active_hold: Option<ActiveHold>,
}

/// Result of a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// No note to judge; combo untouched
    Ignored,
    Judged(Judgement),
    HoldStarted(NoteId),
}

/// Scores input against the scheduler's live notes.
///
/// The engine never copies notes: every state change goes through the
/// scheduler, and every resolution is emitted to the sink before the call
/// returns.
#[derive(Debug)]
pub struct JudgementEngine {
    windows: JudgementWindows,
    damage: Box<dyn DamagePolicy>,
    state: JudgementState,
    stats: BattleStatistics,
}

impl JudgementEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            windows: config.windows,
            damage: Box::new(FixedDamage(config.miss_damage)),
            state: JudgementState::default(),
            stats: BattleStatistics::default(),
        }
    }

    pub fn with_damage_policy(mut self, policy: Box<dyn DamagePolicy>) -> Self {
        self.damage = policy;
        self
    }

    pub fn windows(&self) -> &JudgementWindows {
        &self.windows
    }

    /// Handle a press at time `t`.
    ///
    /// The earliest unresolved note whose window contains `t` is judged. A
    /// press while a hold is active, or with no note in range, is ignored.
    pub fn process_press(
        &mut self,
        t: f64,
        scheduler: &mut NoteScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<PressOutcome> {
        scheduler.ensure_loaded()?;

        if let Some(hold) = &self.state.active_hold {
            trace!("Press at {:.3}s ignored while holding {}", t, hold.note);
            return Ok(PressOutcome::Ignored);
        }

        let Some(id) = scheduler.find_press_target(t) else {
            trace!("Press at {:.3}s matched no note", t);
            return Ok(PressOutcome::Ignored);
        };
        let note = *scheduler
            .note(id)
            .ok_or_else(|| Error::invariant(format!("press target {id} vanished")))?;

        if note.event.is_hold() {
            scheduler.begin_hold(id)?;
            let mut hold = ActiveHold {
                note: id,
                start_time: note.judge_window_center,
                duration: note.hold_duration,
                progress: 0.0,
            };
            hold.progress = hold.progress_at(t);
            self.state.active_hold = Some(hold);
            debug!("Hold {} started at {:.3}s", id, t);
            return Ok(PressOutcome::HoldStarted(id));
        }

        let judgement = self.windows.judge(note.offset(t)).ok_or_else(|| {
            Error::invariant(format!(
                "press at {t:.3}s outside the window of its target {id}"
            ))
        })?;
        let note = scheduler.resolve(id, Resolution::Judged(judgement), t)?;
        self.apply(judgement, t);
        debug!(
            "{} {} (offset {:+.3}s, combo {})",
            judgement,
            note.event,
            note.offset(t),
            self.state.combo
        );
        sink.emit(BattleEvent::JudgeResult { judgement, note });
        if judgement == Judgement::Miss {
            self.signal_damage(MissCause::TapMiss, &note, sink);
        }
        Ok(PressOutcome::Judged(judgement))
    }

    /// Handle a release at time `t`.
    ///
    /// Ends the active hold: Perfect once the hold's full duration has been
    /// sustained, Miss before that. Returns `None` when nothing was held.
    pub fn process_release(
        &mut self,
        t: f64,
        scheduler: &mut NoteScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Judgement>> {
        scheduler.ensure_loaded()?;

        let Some(hold) = self.state.active_hold else {
            trace!("Release at {:.3}s without an active hold", t);
            return Ok(None);
        };

        let (judgement, cause) = if t >= hold.end_time() {
            (Judgement::Perfect, None)
        } else {
            (
                Judgement::Miss,
                Some(MissCause::HoldReleased {
                    progress: hold.progress_at(t),
                }),
            )
        };
        self.finish_hold(judgement, t, cause, scheduler, sink)?;
        Ok(Some(judgement))
    }

    /// Update the active hold's progress and complete it once its full
    /// duration has elapsed. Must run every tick.
    pub fn advance_holds(
        &mut self,
        now: f64,
        scheduler: &mut NoteScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Judgement>> {
        let Some(hold) = self.state.active_hold.as_mut() else {
            return Ok(None);
        };
        hold.progress = hold.progress_at(now);

        if now >= hold.end_time() {
            self.finish_hold(Judgement::Perfect, now, None, scheduler, sink)?;
            return Ok(Some(Judgement::Perfect));
        }
        Ok(None)
    }

    /// Resolve the active hold as Miss because the clock stopped or the
    /// battle ended.
    pub fn force_resolve_hold(
        &mut self,
        now: f64,
        scheduler: &mut NoteScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<Option<LiveNote>> {
        let Some(hold) = self.state.active_hold else {
            return Ok(None);
        };
        warn!(
            "Hold {} interrupted at {:.1}% progress",
            hold.note,
            hold.progress * 100.0
        );
        let cause = MissCause::HoldInterrupted {
            progress: hold.progress,
        };
        let note = self.finish_hold(Judgement::Miss, now, Some(cause), scheduler, sink)?;
        Ok(Some(note))
    }

    /// Account for notes the scheduler auto-missed this tick
    pub fn record_auto_misses(&mut self, notes: &[LiveNote], sink: &mut dyn EventSink) {
        for note in notes {
            let time = note.resolved_time.unwrap_or(note.judge_window_center);
            self.state.combo = 0;
            self.state.last_judgement = Some(Judgement::Miss);
            self.state.last_judgement_time = Some(time);
            self.stats.auto_miss += 1;
            debug!("AUTO-MISS {}", note.event);
            sink.emit(BattleEvent::AutoMiss(*note));
            self.signal_damage(MissCause::AutoMiss, note, sink);
        }
    }

    fn finish_hold(
        &mut self,
        judgement: Judgement,
        time: f64,
        cause: Option<MissCause>,
        scheduler: &mut NoteScheduler,
        sink: &mut dyn EventSink,
    ) -> Result<LiveNote> {
        let hold = self
            .state
            .active_hold
            .take()
            .ok_or_else(|| Error::invariant("no active hold to finish"))?;
        let note = scheduler.resolve(hold.note, Resolution::Judged(judgement), time)?;

        self.apply(judgement, time);
        if judgement.is_hit() {
            self.stats.holds_completed += 1;
        }
        debug!("Hold {} -> {} (combo {})", note.event, judgement, self.state.combo);
        sink.emit(BattleEvent::HoldComplete { judgement, note });
        if let Some(cause) = cause {
            self.signal_damage(cause, &note, sink);
        }
        Ok(note)
    }

    fn apply(&mut self, judgement: Judgement, time: f64) {
        if judgement.is_hit() {
            self.state.combo += 1;
            self.stats.max_combo = self.stats.max_combo.max(self.state.combo);
        } else {
            self.state.combo = 0;
        }
        self.stats.record(judgement);
        self.state.last_judgement = Some(judgement);
        self.state.last_judgement_time = Some(time);
    }

    fn signal_damage(&mut self, cause: MissCause, note: &LiveNote, sink: &mut dyn EventSink) {
        let amount = self.damage.damage(cause, note);
        self.stats.total_damage += amount;
        sink.emit(BattleEvent::PlayerDamaged { amount });
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    pub fn last_judgement(&self) -> Option<Judgement> {
        self.state.last_judgement
    }

    pub fn last_judgement_time(&self) -> Option<f64> {
        self.state.last_judgement_time
    }

    pub fn active_hold(&self) -> Option<&ActiveHold> {
        self.state.active_hold.as_ref()
    }

    pub fn state(&self) -> &JudgementState {
        &self.state
    }

    pub fn statistics(&self) -> &BattleStatistics {
        &self.stats
    }

    pub fn reset(&mut self) {
        self.state = JudgementState::default();
        self.stats = BattleStatistics::default();
    }
}
