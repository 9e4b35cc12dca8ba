//! Judgement of player input against live notes.
//!
//! This module contains:
//! - `JudgementWindows` / `Judgement` - timing thresholds and hit qualities
//! - `JudgementEngine` - press/release handling, hold tracking and combo
//! - `BattleStatistics` - per-battle judgement counters
//! - `DamagePolicy` - amount attached to each player-damaged signal

mod damage;
mod engine;
mod stats;
mod window;

pub use damage::*;
pub use engine::*;
pub use stats::*;
pub use window::*;
