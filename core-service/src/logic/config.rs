//! Pipeline Configuration
//!
//! Timing and decision thresholds for telemetry collection and verification.
//! The scoring rule table itself is fixed (see `scoring::rules`).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("approve_at ({approve_at}) must not be below block_below ({block_below})")]
    InvertedThresholds { block_below: i32, approve_at: i32 },
}

/// Pipeline Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Period of the elapsed-time tick (ms)
    pub tick_interval_ms: u64,

    /// Simulated resistance-check latency (ms)
    pub verification_delay_ms: u64,

    /// Scores below this short-circuit to a blocked run
    pub block_below: i32,

    /// Scores at or above this succeed, the band in between is pending
    pub approve_at: i32,

    /// Pointer displacement that counts as a movement
    pub pointer_threshold: f64,

    /// Inter-key gaps at or above this are not recorded (ms)
    pub max_key_gap_ms: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: constants::DEFAULT_TICK_INTERVAL_MS,
            verification_delay_ms: constants::DEFAULT_VERIFICATION_DELAY_MS,
            block_below: constants::DEFAULT_BLOCK_BELOW,
            approve_at: constants::DEFAULT_APPROVE_AT,
            pointer_threshold: constants::DEFAULT_POINTER_THRESHOLD,
            max_key_gap_ms: constants::DEFAULT_MAX_KEY_GAP_MS,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            tick_interval_ms: constants::get_tick_interval_ms(),
            verification_delay_ms: constants::get_verification_delay_ms(),
            block_below: constants::get_block_below(),
            approve_at: constants::get_approve_at(),
            pointer_threshold: constants::get_pointer_threshold(),
            max_key_gap_ms: constants::get_max_key_gap_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick_interval_ms"));
        }
        if self.max_key_gap_ms <= 0 {
            return Err(ConfigError::ZeroInterval("max_key_gap_ms"));
        }
        if self.approve_at < self.block_below {
            return Err(ConfigError::InvertedThresholds {
                block_below: self.block_below,
                approve_at: self.approve_at,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.verification_delay_ms, 1500);
        assert_eq!(config.block_below, 50);
        assert_eq!(config.approve_at, 70);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = PipelineConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval("tick_interval_ms")));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = PipelineConfig {
            block_below: 80,
            approve_at: 60,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedThresholds { block_below: 80, approve_at: 60 })
        ));
    }

    #[test]
    fn test_durations() {
        let config = PipelineConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.verification_delay(), Duration::from_millis(1500));
    }
}
