use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::{Error, Result};
use crate::judge::BattleStatistics;

/// Conditions a finished battle must meet to count as a victory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryRule {
    /// Lowest accuracy, in [0, 1], that still wins
    pub min_accuracy: f64,
    /// Highest total damage that still wins; unlimited when unset
    pub max_damage: Option<f64>,
}

impl Default for VictoryRule {
    fn default() -> Self {
        Self {
            min_accuracy: defaults::MIN_ACCURACY,
            max_damage: None,
        }
    }
}

impl VictoryRule {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_accuracy) {
            return Err(Error::InvalidConfig(format!(
                "victory.min_accuracy must be within [0, 1] (got {})",
                self.min_accuracy
            )));
        }
        if let Some(max) = self.max_damage
            && !(max >= 0.0 && max.is_finite())
        {
            return Err(Error::InvalidConfig(format!(
                "victory.max_damage must be a non-negative number (got {max})"
            )));
        }
        Ok(())
    }
}

/// Summary handed back to the host when a battle ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattleOutcome {
    pub victory: bool,
    pub accuracy: f64,
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    pub auto_miss: u32,
    pub max_combo: u32,
    pub holds_completed: u32,
    pub total_damage: f64,
    /// Events in the chart
    pub notes: usize,
}

impl BattleOutcome {
    pub fn from_statistics(stats: &BattleStatistics, notes: usize, rule: &VictoryRule) -> Self {
        let accuracy = stats.accuracy();
        let all_resolved = stats.resolved_notes() as usize == notes;
        let within_damage = rule
            .max_damage
            .is_none_or(|max| stats.total_damage <= max);

        Self {
            victory: notes > 0 && all_resolved && accuracy >= rule.min_accuracy && within_damage,
            accuracy,
            perfect: stats.perfect,
            good: stats.good,
            miss: stats.miss,
            auto_miss: stats.auto_miss,
            max_combo: stats.max_combo,
            holds_completed: stats.holds_completed,
            total_damage: stats.total_damage,
            notes,
        }
    }

    /// Notes that received a judgement of any kind
    pub fn resolved(&self) -> u32 {
        self.perfect + self.good + self.miss + self.auto_miss
    }

    pub fn is_full_combo(&self) -> bool {
        self.notes > 0 && self.max_combo as usize == self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(perfect: u32, good: u32, miss: u32, auto_miss: u32) -> BattleStatistics {
        BattleStatistics {
            perfect,
            good,
            miss,
            auto_miss,
            max_combo: perfect + good,
            total_damage: (miss + auto_miss) as f64 * 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_victory_by_accuracy() {
        let rule = VictoryRule::default();
        let win = BattleOutcome::from_statistics(&stats(3, 1, 0, 1), 5, &rule);
        assert!(win.victory);
        assert_eq!(win.accuracy, 0.7);

        let loss = BattleOutcome::from_statistics(&stats(1, 1, 1, 1), 4, &rule);
        assert!(!loss.victory);
    }

    #[test]
    fn test_unresolved_notes_are_not_victory() {
        let outcome = BattleOutcome::from_statistics(&stats(3, 0, 0, 0), 4, &VictoryRule::default());
        assert_eq!(outcome.accuracy, 1.0);
        assert!(!outcome.victory);
    }

    #[test]
    fn test_damage_cap() {
        let rule = VictoryRule {
            max_damage: Some(5.0),
            ..Default::default()
        };
        let outcome = BattleOutcome::from_statistics(&stats(9, 0, 1, 0), 10, &rule);
        assert_eq!(outcome.accuracy, 0.9);
        assert!(!outcome.victory);
    }

    #[test]
    fn test_full_combo() {
        let outcome = BattleOutcome::from_statistics(&stats(4, 0, 0, 0), 4, &VictoryRule::default());
        assert!(outcome.is_full_combo());
        assert_eq!(outcome.resolved(), 4);
    }

    #[test]
    fn test_empty_chart_is_not_victory() {
        let outcome =
            BattleOutcome::from_statistics(&BattleStatistics::default(), 0, &VictoryRule::default());
        assert!(!outcome.victory);
    }

    #[test]
    fn test_rule_validation() {
        assert!(VictoryRule::default().validate().is_ok());
        let rule = VictoryRule {
            min_accuracy: 1.5,
            ..Default::default()
        };
        assert!(matches!(rule.validate(), Err(Error::InvalidConfig(_))));
        let rule = VictoryRule {
            max_damage: Some(-1.0),
            ..Default::default()
        };
        assert!(rule.validate().is_err());
    }
}
