//! Engine configuration.
//!
//! This module contains the tunable parameters of a battle:
//! - `EngineConfig` - judgement windows, note grace period, damage and victory rule
//! - Default tuning constants

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::VictoryRule;
use crate::chart::limits;
use crate::error::{Error, Result};
use crate::judge::JudgementWindows;

/// Default tuning constants.
pub mod defaults {
    /// Offset (seconds) still judged Perfect.
    pub const PERFECT_WINDOW: f64 = 0.05;

    /// Offset (seconds) still judged Good.
    pub const GOOD_WINDOW: f64 = 0.10;

    /// Widest tolerance; past this a note is auto-missed.
    pub const LATE_WINDOW: f64 = 0.20;

    /// Seconds a resolved note lingers in the live set.
    pub const GRACE_PERIOD: f64 = 0.0;

    /// Damage signalled per miss by the fixed damage policy.
    pub const MISS_DAMAGE: f64 = 10.0;

    /// Minimum accuracy for a victory.
    pub const MIN_ACCURACY: f64 = 0.6;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub windows: JudgementWindows,
    pub grace_period: f64,
    pub miss_damage: f64,
    pub victory: VictoryRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            windows: JudgementWindows::default(),
            grace_period: defaults::GRACE_PERIOD,
            miss_damage: defaults::MISS_DAMAGE,
            victory: VictoryRule::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.windows.validate()?;
        // Notes must spawn before their press window opens
        if self.windows.late >= limits::LOOKAHEAD_MIN {
            return Err(Error::InvalidConfig(format!(
                "late window ({}) must be shorter than the minimum lookahead ({})",
                self.windows.late,
                limits::LOOKAHEAD_MIN
            )));
        }
        if !(self.grace_period >= 0.0 && self.grace_period.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "grace_period must be a non-negative number (got {})",
                self.grace_period
            )));
        }
        if !(self.miss_damage >= 0.0 && self.miss_damage.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "miss_damage must be a non-negative number (got {})",
                self.miss_damage
            )));
        }
        self.victory.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.windows.late, 0.2);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
grace_period = 0.25

[windows]
perfect = 0.03
"#,
        )
        .unwrap();
        assert_eq!(config.grace_period, 0.25);
        assert_eq!(config.windows.perfect, 0.03);
        assert_eq!(config.windows.good, defaults::GOOD_WINDOW);
        assert_eq!(config.miss_damage, defaults::MISS_DAMAGE);
    }

    #[test]
    fn test_parse_empty_toml() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_rejects_misordered_windows() {
        let err = EngineConfig::from_toml_str("[windows]\nperfect = 0.5\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_late_window_beyond_lookahead() {
        let err = EngineConfig::from_toml_str("[windows]\nlate = 0.5\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let config = EngineConfig::from_toml_str("[windows]\nlate = 0.45\n").unwrap();
        assert_eq!(config.windows.late, 0.45);
    }

    #[test]
    fn test_rejects_negative_grace() {
        let err = EngineConfig::from_toml_str("grace_period = -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_toml_str("grace_period = \"soon\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        fs::write(&path, "miss_damage = 25.0\n[victory]\nmin_accuracy = 0.8\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.miss_damage, 25.0);
        assert_eq!(config.victory.min_accuracy, 0.8);
    }
}
