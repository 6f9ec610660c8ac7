//! Motion configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! degrade_threshold = 8
//! high_tier_min_cores = 8
//! medium_tier_min_cores = 4
//! low_memory_gb = 2.0
//!
//! [multipliers]
//! low = 0.5
//! medium = 0.75
//! high = 1.0
//! ```

use blinc_platform::DeviceHints;
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::preferences::PerformanceTier;

/// Intensity multiplier per performance tier
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierMultipliers {
    pub low: f32,
    pub medium: f32,
    pub high: f32,
}

impl TierMultipliers {
    /// Multiplier for a tier
    pub fn for_tier(&self, tier: PerformanceTier) -> f32 {
        match tier {
            PerformanceTier::Low => self.low,
            PerformanceTier::Medium => self.medium,
            PerformanceTier::High => self.high,
        }
    }
}

impl Default for TierMultipliers {
    fn default() -> Self {
        Self {
            low: 0.5,
            medium: 0.75,
            high: 1.0,
        }
    }
}

/// Tuning for tier derivation and load-based degradation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Degrade one tier when more than this many animations are tracked
    pub degrade_threshold: usize,
    /// Intensity multipliers per tier
    pub multipliers: TierMultipliers,
    /// Logical cores required for the high tier
    pub high_tier_min_cores: u32,
    /// Logical cores required for the medium tier
    pub medium_tier_min_cores: u32,
    /// Device memory at or below this caps the tier at low
    pub low_memory_gb: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            degrade_threshold: 8,
            multipliers: TierMultipliers::default(),
            high_tier_min_cores: 8,
            medium_tier_min_cores: 4,
            low_memory_gb: 2.0,
        }
    }
}

impl MotionConfig {
    /// Parse and validate a TOML config
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: set the degrade threshold
    pub fn with_degrade_threshold(mut self, threshold: usize) -> Self {
        self.degrade_threshold = threshold;
        self
    }

    /// Check that multipliers lie in [0, 1], are ordered, and core
    /// thresholds are ordered
    pub fn validate(&self) -> Result<()> {
        let m = &self.multipliers;
        for (name, value) in [("low", m.low), ("medium", m.medium), ("high", m.high)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MotionError::InvalidConfig(format!(
                    "multipliers.{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if m.low > m.medium || m.medium > m.high {
            return Err(MotionError::InvalidConfig(format!(
                "multipliers must satisfy low <= medium <= high, got {} / {} / {}",
                m.low, m.medium, m.high
            )));
        }
        if self.medium_tier_min_cores > self.high_tier_min_cores {
            return Err(MotionError::InvalidConfig(format!(
                "medium_tier_min_cores ({}) exceeds high_tier_min_cores ({})",
                self.medium_tier_min_cores, self.high_tier_min_cores
            )));
        }
        if self.low_memory_gb.is_nan() {
            return Err(MotionError::InvalidConfig("low_memory_gb is NaN".to_string()));
        }
        Ok(())
    }

    /// Tier a device starts from before load is taken into account
    ///
    /// Unknown core count starts at medium. A coarse pointer caps at medium,
    /// and known memory at or below `low_memory_gb` forces low.
    pub fn base_tier(&self, hints: &DeviceHints) -> PerformanceTier {
        let mut tier = match hints.logical_cores {
            None => PerformanceTier::Medium,
            Some(cores) if cores >= self.high_tier_min_cores => PerformanceTier::High,
            Some(cores) if cores >= self.medium_tier_min_cores => PerformanceTier::Medium,
            Some(_) => PerformanceTier::Low,
        };
        if hints.coarse_pointer == Some(true) {
            tier = tier.min(PerformanceTier::Medium);
        }
        if let Some(memory) = hints.device_memory_gb {
            if memory <= self.low_memory_gb {
                tier = PerformanceTier::Low;
            }
        }
        tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MotionConfig::default();
        assert_eq!(config.degrade_threshold, 8);
        assert_eq!(config.multipliers.for_tier(PerformanceTier::Low), 0.5);
        assert_eq!(config.multipliers.for_tier(PerformanceTier::Medium), 0.75);
        assert_eq!(config.multipliers.for_tier(PerformanceTier::High), 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = MotionConfig::from_toml_str("").unwrap();
        assert_eq!(config, MotionConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = MotionConfig::from_toml_str(
            r#"
            degrade_threshold = 3

            [multipliers]
            low = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.degrade_threshold, 3);
        assert_eq!(config.multipliers.low, 0.25);
        assert_eq!(config.multipliers.medium, 0.75);
        assert_eq!(config.high_tier_min_cores, 8);
    }

    #[test]
    fn test_json_config() {
        let config = MotionConfig::from_json_str(r#"{ "medium_tier_min_cores": 2 }"#).unwrap();
        assert_eq!(config.medium_tier_min_cores, 2);
    }

    #[test]
    fn test_rejects_out_of_range_multiplier() {
        let err = MotionConfig::from_toml_str("[multipliers]\nhigh = 1.5").unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unordered_multipliers() {
        let err = MotionConfig::from_toml_str("[multipliers]\nlow = 0.9\nmedium = 0.6").unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unordered_cores() {
        let err = MotionConfig::from_toml_str("medium_tier_min_cores = 16").unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = MotionConfig::from_toml_str("degrade_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, MotionError::ConfigToml(_)));
    }

    #[test]
    fn test_base_tier_policy() {
        let config = MotionConfig::default();

        assert_eq!(config.base_tier(&DeviceHints::unknown()), PerformanceTier::Medium);
        assert_eq!(config.base_tier(&DeviceHints::unknown().cores(12)), PerformanceTier::High);
        assert_eq!(config.base_tier(&DeviceHints::unknown().cores(4)), PerformanceTier::Medium);
        assert_eq!(config.base_tier(&DeviceHints::unknown().cores(2)), PerformanceTier::Low);

        // Touch devices cap at medium
        let phone = DeviceHints::unknown().cores(8).coarse_pointer(true);
        assert_eq!(config.base_tier(&phone), PerformanceTier::Medium);

        // Low memory forces low regardless of cores
        let budget = DeviceHints::unknown().cores(16).memory_gb(1.0);
        assert_eq!(config.base_tier(&budget), PerformanceTier::Low);
    }
}
