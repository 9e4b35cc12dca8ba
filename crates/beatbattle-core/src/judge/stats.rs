use serde::Serialize;

use super::Judgement;

/// Judgement counters for a whole battle.
///
/// Counters only grow; they are cleared by `JudgementEngine::reset` alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BattleStatistics {
    pub perfect: u32,
    pub good: u32,
    /// Misses from a judged press or a failed hold
    pub miss: u32,
    /// Notes whose window elapsed without input
    pub auto_miss: u32,
    pub max_combo: u32,
    pub holds_completed: u32,
    pub total_damage: f64,
}

impl BattleStatistics {
    pub(crate) fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Good => self.good += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    /// Notes resolved by any path
    pub fn resolved_notes(&self) -> u32 {
        self.perfect + self.good + self.miss + self.auto_miss
    }

    pub fn total_misses(&self) -> u32 {
        self.miss + self.auto_miss
    }

    /// Weighted hit rate: Perfect counts 1, Good counts 0.5
    pub fn accuracy(&self) -> f64 {
        let resolved = self.resolved_notes();
        if resolved == 0 {
            return 0.0;
        }
        (self.perfect as f64 + 0.5 * self.good as f64) / resolved as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let stats = BattleStatistics {
            perfect: 2,
            good: 1,
            miss: 0,
            auto_miss: 1,
            ..Default::default()
        };
        assert_eq!(stats.resolved_notes(), 4);
        assert_eq!(stats.accuracy(), 0.625);
        assert_eq!(stats.total_misses(), 1);
    }

    #[test]
    fn test_accuracy_without_notes() {
        assert_eq!(BattleStatistics::default().accuracy(), 0.0);
    }

    #[test]
    fn test_record() {
        let mut stats = BattleStatistics::default();
        stats.record(Judgement::Perfect);
        stats.record(Judgement::Miss);
        stats.record(Judgement::Miss);
        assert_eq!(stats.perfect, 1);
        assert_eq!(stats.miss, 2);
        assert_eq!(stats.auto_miss, 0);
    }
}
