pub mod battle;
pub mod chart;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod judge;
pub mod scheduler;

pub use battle::{BattleOutcome, BattlePhase, BattleSession, BattleStatus, VictoryRule};
pub use chart::{BeatEvent, ChartIssue, ChartModel, ChartStatistics, EventKind, ValidationReport};
pub use clock::{ManualClock, MusicClock};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use events::{BattleEvent, EventBus, EventLog, EventSink};
pub use input::{InputEvent, InputKind, InputScript};
pub use judge::{
    ActiveHold, BattleStatistics, DamagePolicy, FixedDamage, HoldScaledDamage, Judgement,
    JudgementEngine, JudgementState, JudgementWindows, MissCause, PressOutcome,
};
pub use scheduler::{AdvanceReport, LiveNote, NoteId, NoteScheduler, NoteState, Resolution};
