//! Battle session: the per-tick driving loop around scheduler and engine.

mod outcome;

pub use outcome::*;

use std::sync::Arc;

use serde::Serialize;
use strum::IntoStaticStr;
use tracing::{error, info};

use crate::chart::ChartModel;
use crate::clock::MusicClock;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::events::{BattleEvent, EventBus};
use crate::input::{InputEvent, InputKind};
use crate::judge::{DamagePolicy, Judgement, JudgementEngine};
use crate::scheduler::NoteScheduler;

/// Battle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr)]
pub enum BattlePhase {
    #[strum(serialize = "READY")]
    Ready,
    #[strum(serialize = "PLAYING")]
    Playing,
    #[strum(serialize = "PAUSED")]
    Paused,
    #[strum(serialize = "COMPLETED")]
    Completed,
    /// Stopped by an invariant violation; only a new chart load recovers
    #[strum(serialize = "ABORTED")]
    Aborted,
}

impl BattlePhase {
    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl std::fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Read-only snapshot for presentation, valid between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattleStatus {
    pub phase: BattlePhase,
    pub music_time: f64,
    pub progress: f64,
    pub combo: u32,
    pub last_judgement: Option<Judgement>,
    pub last_judgement_time: Option<f64>,
    pub hold_progress: Option<f64>,
    pub live_notes: usize,
}

/// One battle against one chart.
///
/// Each tick follows a fixed order: clock sample, scheduler advance (spawn,
/// auto-miss), auto-miss bookkeeping, input in arrival order, hold advance.
pub struct BattleSession<C: MusicClock> {
    clock: C,
    config: EngineConfig,
    scheduler: NoteScheduler,
    engine: JudgementEngine,
    bus: EventBus,
    phase: BattlePhase,
    music_time: f64,
}

impl<C: MusicClock> BattleSession<C> {
    pub fn new(clock: C, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            clock,
            scheduler: NoteScheduler::new(&config),
            engine: JudgementEngine::new(&config),
            config,
            bus: EventBus::new(),
            phase: BattlePhase::Ready,
            music_time: 0.0,
        })
    }

    pub fn with_damage_policy(mut self, policy: Box<dyn DamagePolicy>) -> Self {
        self.engine = self.engine.with_damage_policy(policy);
        self
    }

    /// Register a notification listener; listeners run in registration order
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&BattleEvent) + 'static,
    {
        self.bus.subscribe(listener);
    }

    /// Load a chart and return to `Ready`.
    ///
    /// On failure the previous chart and state are kept.
    pub fn load_chart(&mut self, chart: impl Into<Arc<ChartModel>>) -> Result<()> {
        self.scheduler.load_chart(chart.into())?;
        self.engine.reset();
        self.phase = BattlePhase::Ready;
        self.music_time = 0.0;
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        let chart = self.scheduler.ensure_loaded()?;
        if self.phase != BattlePhase::Ready {
            return Err(Error::invariant(format!(
                "cannot start a battle in phase {}",
                self.phase
            )));
        }
        info!("Battle started: '{}'", chart.name);
        self.phase = BattlePhase::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> bool {
        if self.phase == BattlePhase::Playing {
            info!("Battle paused at {:.3}s", self.music_time);
            self.phase = BattlePhase::Paused;
            return true;
        }
        false
    }

    pub fn resume(&mut self) -> bool {
        if self.phase == BattlePhase::Paused {
            info!("Battle resumed at {:.3}s", self.music_time);
            self.phase = BattlePhase::Playing;
            return true;
        }
        false
    }

    /// Run one simulation tick with the input transitions that arrived since
    /// the previous one.
    ///
    /// Outside `Playing` this is a no-op. Any error aborts the battle.
    pub fn tick(&mut self, inputs: &[InputEvent]) -> Result<()> {
        if self.phase != BattlePhase::Playing {
            return Ok(());
        }
        if let Err(e) = self.run_tick(inputs) {
            error!("Battle aborted: {}", e);
            self.phase = BattlePhase::Aborted;
            return Err(e);
        }
        Ok(())
    }

    fn run_tick(&mut self, inputs: &[InputEvent]) -> Result<()> {
        if !self.clock.is_playing() {
            self.engine
                .force_resolve_hold(self.music_time, &mut self.scheduler, &mut self.bus)?;
            return Ok(());
        }

        let now = self.clock.judgement_time();
        self.music_time = now;

        let report = self.scheduler.advance(now, &mut self.bus)?;
        self.engine
            .record_auto_misses(&report.auto_missed, &mut self.bus);

        for input in inputs {
            match input.kind {
                InputKind::Press => {
                    self.engine
                        .process_press(input.time, &mut self.scheduler, &mut self.bus)?;
                }
                InputKind::Release => {
                    self.engine
                        .process_release(input.time, &mut self.scheduler, &mut self.bus)?;
                }
            }
        }

        self.engine
            .advance_holds(now, &mut self.scheduler, &mut self.bus)?;

        if self.scheduler.is_completed() {
            info!("Chart completed at {:.3}s", now);
            self.phase = BattlePhase::Completed;
        }
        Ok(())
    }

    /// End the battle and report the outcome.
    ///
    /// An active hold is resolved as Miss. Notes that never resolved count
    /// against victory.
    pub fn finish(&mut self) -> Result<BattleOutcome> {
        let chart = Arc::clone(self.scheduler.ensure_loaded()?);

        if matches!(self.phase, BattlePhase::Playing | BattlePhase::Paused) {
            if let Err(e) =
                self.engine
                    .force_resolve_hold(self.music_time, &mut self.scheduler, &mut self.bus)
            {
                error!("Battle aborted: {}", e);
                self.phase = BattlePhase::Aborted;
                return Err(e);
            }
            self.phase = BattlePhase::Completed;
        }

        let outcome = BattleOutcome::from_statistics(
            self.engine.statistics(),
            chart.events().len(),
            &self.config.victory,
        );
        info!(
            "Battle finished: '{}' {} (accuracy {:.1}%, max combo {})",
            chart.name,
            if outcome.victory { "VICTORY" } else { "DEFEAT" },
            outcome.accuracy * 100.0,
            outcome.max_combo
        );
        Ok(outcome)
    }

    pub fn status(&self) -> BattleStatus {
        BattleStatus {
            phase: self.phase,
            music_time: self.music_time,
            progress: self.scheduler.progress(),
            combo: self.engine.combo(),
            last_judgement: self.engine.last_judgement(),
            last_judgement_time: self.engine.last_judgement_time(),
            hold_progress: self.engine.active_hold().map(|hold| hold.progress),
            live_notes: self.scheduler.live_notes().len(),
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.scheduler.progress()
    }

    pub fn is_completed(&self) -> bool {
        self.phase == BattlePhase::Completed
    }

    pub fn chart(&self) -> Option<&Arc<ChartModel>> {
        self.scheduler.chart()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &NoteScheduler {
        &self.scheduler
    }

    pub fn engine(&self) -> &JudgementEngine {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::BeatEvent;
    use crate::clock::ManualClock;

    fn make_session(events: impl IntoIterator<Item = BeatEvent>) -> BattleSession<ManualClock> {
        let mut session =
            BattleSession::new(ManualClock::playing_at(-2.0), EngineConfig::default()).unwrap();
        session
            .load_chart(ChartModel::new(120, 1, 8, 2.0).with_events(events))
            .unwrap();
        session
    }

    fn tick_at(session: &mut BattleSession<ManualClock>, now: f64, inputs: &[InputEvent]) {
        session.clock_mut().set_time(now);
        session.tick(inputs).unwrap();
    }

    #[test]
    fn test_start_requires_chart() {
        let mut session =
            BattleSession::new(ManualClock::new(), EngineConfig::default()).unwrap();
        assert!(matches!(session.start(), Err(Error::NoChartLoaded)));
        assert_eq!(session.phase(), BattlePhase::Ready);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.windows.good = 0.01;
        assert!(BattleSession::new(ManualClock::new(), config).is_err());
    }

    #[test]
    fn test_invalid_chart_keeps_previous() {
        let mut session = make_session([BeatEvent::tap(0, 0)]);
        let bad = ChartModel::new(500, 1, 8, 2.0);
        assert!(matches!(
            session.load_chart(bad),
            Err(Error::InvalidChart(_))
        ));
        assert_eq!(session.chart().map(|c| c.bpm), Some(120));
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut session = make_session([BeatEvent::tap(0, 0)]);
        tick_at(&mut session, 0.0, &[InputEvent::press(0.0)]);
        assert_eq!(session.status().live_notes, 0);
        assert_eq!(session.engine().combo(), 0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut session = make_session([BeatEvent::tap(0, 0)]);
        session.start().unwrap();
        assert!(session.pause());
        assert!(!session.pause());
        tick_at(&mut session, 0.0, &[]);
        assert_eq!(session.status().live_notes, 0);

        assert!(session.resume());
        tick_at(&mut session, 0.0, &[InputEvent::press(0.0)]);
        assert_eq!(session.engine().last_judgement(), Some(Judgement::Perfect));
    }

    #[test]
    fn test_completes_and_reports_victory() {
        let mut session = make_session([BeatEvent::tap(0, 0), BeatEvent::tap(0, 2)]);
        session.start().unwrap();
        tick_at(&mut session, 0.0, &[InputEvent::press(0.0)]);
        tick_at(&mut session, 1.0, &[InputEvent::press(1.02)]);
        tick_at(&mut session, 1.1, &[]);

        assert!(session.is_completed());
        let outcome = session.finish().unwrap();
        assert!(outcome.victory);
        assert_eq!(outcome.perfect, 2);
        assert_eq!(outcome.max_combo, 2);
        assert!(outcome.is_full_combo());
    }

    #[test]
    fn test_stopped_clock_interrupts_hold() {
        let mut session = make_session([BeatEvent::hold(0, 0, 2)]);
        session.start().unwrap();
        tick_at(&mut session, 0.0, &[InputEvent::press(0.0)]);
        tick_at(&mut session, 0.5, &[]);
        assert_eq!(session.status().hold_progress, Some(0.5));

        session.clock_mut().stop();
        session.tick(&[]).unwrap();
        assert_eq!(session.status().hold_progress, None);
        assert_eq!(session.engine().statistics().miss, 1);
    }

    #[test]
    fn test_finish_interrupts_hold() {
        let mut session = make_session([BeatEvent::hold(0, 0, 2)]);
        session.start().unwrap();
        tick_at(&mut session, 0.0, &[InputEvent::press(0.0)]);

        let outcome = session.finish().unwrap();
        assert_eq!(outcome.miss, 1);
        assert!(!outcome.victory);
        assert_eq!(session.phase(), BattlePhase::Completed);
    }

    #[test]
    fn test_time_reversal_aborts() {
        let mut session = make_session([BeatEvent::tap(0, 0)]);
        session.start().unwrap();
        tick_at(&mut session, 0.5, &[]);

        session.clock_mut().set_time(0.1);
        assert!(matches!(
            session.tick(&[]),
            Err(Error::InvariantViolation(_))
        ));
        assert_eq!(session.phase(), BattlePhase::Aborted);

        // Aborted sessions ignore further ticks
        session.clock_mut().set_time(1.0);
        assert!(session.tick(&[]).is_ok());
        assert!(session.start().is_err());
    }

    #[test]
    fn test_status_snapshot() {
        let mut session = make_session([BeatEvent::tap(0, 0)]);
        session.start().unwrap();
        tick_at(&mut session, 1.0, &[]);

        let status = session.status();
        assert_eq!(status.phase, BattlePhase::Playing);
        assert_eq!(status.music_time, 1.0);
        assert_eq!(status.progress, 0.25);
        assert_eq!(status.last_judgement, Some(Judgement::Miss));
        assert_eq!(status.live_notes, 1);

        // Resolved note leaves the live set on the next tick
        tick_at(&mut session, 1.1, &[]);
        assert_eq!(session.status().phase, BattlePhase::Completed);
        assert_eq!(session.status().live_notes, 0);
    }
}
