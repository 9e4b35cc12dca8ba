//! Judgement qualities and timing window thresholds.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::config::defaults;
use crate::error::{Error, Result};

/// Hit quality, best to worst
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, IntoStaticStr,
)]
pub enum Judgement {
    #[strum(serialize = "PERFECT")]
    Perfect,
    #[strum(serialize = "GOOD")]
    Good,
    #[strum(serialize = "MISS")]
    Miss,
}

impl Judgement {
    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    /// Perfect and Good keep the combo alive
    pub fn is_hit(&self) -> bool {
        !matches!(self, Self::Miss)
    }
}

impl std::fmt::Display for Judgement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Symmetric tolerances around a note's judgement time, in seconds.
///
/// `perfect < good < late`; `late` is also the auto-miss deadline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgementWindows {
    pub perfect: f64,
    pub good: f64,
    pub late: f64,
}

impl Default for JudgementWindows {
    fn default() -> Self {
        Self {
            perfect: defaults::PERFECT_WINDOW,
            good: defaults::GOOD_WINDOW,
            late: defaults::LATE_WINDOW,
        }
    }
}

impl JudgementWindows {
    pub fn new(perfect: f64, good: f64, late: f64) -> Result<Self> {
        let windows = Self {
            perfect,
            good,
            late,
        };
        windows.validate()?;
        Ok(windows)
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 < self.perfect && self.perfect < self.good && self.good < self.late;
        if !ordered || !self.late.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "judgement windows must satisfy 0 < perfect < good < late (got {} / {} / {})",
                self.perfect, self.good, self.late
            )));
        }
        Ok(())
    }

    /// Judge a press offset (press time minus note time).
    ///
    /// Returns `None` when the offset is outside the late window, meaning the
    /// press does not belong to this note at all.
    pub fn judge(&self, offset: f64) -> Option<Judgement> {
        let abs = offset.abs();
        if abs > self.late {
            return None;
        }
        if abs <= self.perfect {
            Some(Judgement::Perfect)
        } else if abs <= self.good {
            Some(Judgement::Good)
        } else {
            Some(Judgement::Miss)
        }
    }

    /// Whether a press at `offset` can target the note at all
    pub fn contains(&self, offset: f64) -> bool {
        offset.abs() <= self.late
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_boundaries() {
        let windows = JudgementWindows::new(0.05, 0.1, 0.2).unwrap();
        assert_eq!(windows.judge(0.0), Some(Judgement::Perfect));
        assert_eq!(windows.judge(-0.05), Some(Judgement::Perfect));
        assert_eq!(windows.judge(0.07), Some(Judgement::Good));
        assert_eq!(windows.judge(-0.1), Some(Judgement::Good));
        assert_eq!(windows.judge(0.15), Some(Judgement::Miss));
        assert_eq!(windows.judge(-0.2), Some(Judgement::Miss));
        assert_eq!(windows.judge(0.2001), None);
    }

    #[test]
    fn test_contains_matches_judge() {
        let windows = JudgementWindows::new(0.05, 0.1, 0.2).unwrap();
        assert!(windows.contains(0.2));
        assert!(windows.contains(-0.2));
        assert!(!windows.contains(0.2001));
        assert!(!windows.contains(-0.25));
        for offset in [-0.3, -0.2, -0.1, 0.0, 0.15, 0.2, 0.21] {
            assert_eq!(windows.contains(offset), windows.judge(offset).is_some());
        }
    }

    #[test]
    fn test_new_rejects_misordered_windows() {
        assert!(JudgementWindows::new(0.1, 0.05, 0.2).is_err());
        assert!(JudgementWindows::new(0.0, 0.05, 0.2).is_err());
        assert!(JudgementWindows::new(0.05, 0.2, 0.2).is_err());
        assert!(JudgementWindows::new(0.05, 0.1, f64::INFINITY).is_err());
    }

    #[test]
    fn test_judgement_ordering() {
        assert!(Judgement::Perfect < Judgement::Good);
        assert!(Judgement::Good < Judgement::Miss);
        assert!(Judgement::Good.is_hit());
        assert!(!Judgement::Miss.is_hit());
    }

    #[test]
    fn test_display() {
        assert_eq!(Judgement::Perfect.to_string(), "PERFECT");
        assert_eq!(Judgement::Miss.to_string(), "MISS");
    }
}
