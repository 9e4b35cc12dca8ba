use serde::Serialize;

use crate::scheduler::LiveNote;

/// Why a note was lost
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MissCause {
    /// Press landed outside the Good window
    TapMiss,
    /// Hold released early, at `progress` in [0, 1)
    HoldReleased { progress: f64 },
    /// Hold cut off by the clock stopping or the battle ending
    HoldInterrupted { progress: f64 },
    /// Window elapsed without input
    AutoMiss,
}

impl MissCause {
    /// Hold progress reached before the miss, 0 for non-hold causes
    pub fn hold_progress(&self) -> f64 {
        match self {
            Self::HoldReleased { progress } | Self::HoldInterrupted { progress } => *progress,
            Self::TapMiss | Self::AutoMiss => 0.0,
        }
    }
}

/// Decides the amount attached to each player-damaged signal.
///
/// The engine only reports that damage happened; health bookkeeping belongs
/// to the host.
pub trait DamagePolicy: std::fmt::Debug {
    fn damage(&self, cause: MissCause, note: &LiveNote) -> f64;
}

/// Same damage for every miss
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDamage(pub f64);

impl DamagePolicy for FixedDamage {
    fn damage(&self, _cause: MissCause, _note: &LiveNote) -> f64 {
        self.0
    }
}

/// Full damage for taps, reduced by the completed fraction for failed holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldScaledDamage(pub f64);

impl DamagePolicy for HoldScaledDamage {
    fn damage(&self, cause: MissCause, _note: &LiveNote) -> f64 {
        self.0 * (1.0 - cause.hold_progress().clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::BeatEvent;
    use crate::scheduler::NoteId;

    fn hold_note() -> LiveNote {
        LiveNote::spawn(NoteId(0), BeatEvent::hold(0, 0, 2), 0.0, 1.0, -2.0)
    }

    #[test]
    fn test_fixed_damage_ignores_cause() {
        let policy = FixedDamage(10.0);
        let note = hold_note();
        assert_eq!(policy.damage(MissCause::AutoMiss, &note), 10.0);
        assert_eq!(
            policy.damage(MissCause::HoldReleased { progress: 0.9 }, &note),
            10.0
        );
    }

    #[test]
    fn test_hold_scaled_damage() {
        let policy = HoldScaledDamage(10.0);
        let note = hold_note();
        assert_eq!(policy.damage(MissCause::TapMiss, &note), 10.0);
        assert_eq!(
            policy.damage(MissCause::HoldReleased { progress: 0.75 }, &note),
            2.5
        );
        assert_eq!(
            policy.damage(MissCause::HoldInterrupted { progress: 0.5 }, &note),
            5.0
        );
    }
}
