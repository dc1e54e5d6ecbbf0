//! Engine configuration with documented constants
//!
//! Timing values are nominal waits in milliseconds. The proximity threshold and
//! the target respawn box are fixed by the game rules and live next to the code
//! that uses them, not here.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SandboxError};
use crate::core::types::Point;

/// Configuration for a script session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === COMMAND TIMING ===
    /// Wait after a `GoTo` commits its position (ms)
    pub go_to_ms: u64,

    /// Wait after a `GlideTo` commits its position (ms)
    ///
    /// Longer than `go_to_ms` so the presentation layer has time to
    /// interpolate the glide visually.
    pub glide_ms: u64,

    // === SCORING FEEDBACK ===
    /// How long the success message stays up after a score (ms)
    ///
    /// Runs on its own timer. The next command does not wait for it, so the
    /// message can still be visible while later commands execute.
    pub success_message_ms: u64,

    /// Text shown when the actor reaches the target
    pub success_message: String,

    // === STAGE ===
    /// Where the target sits when a session is created
    pub initial_target: Point,

    /// Seed for the target respawn RNG
    ///
    /// `None` seeds from OS entropy. Set it for reproducible runs.
    pub seed: Option<u64>,

    // === PLAYBACK ===
    /// Multiplier applied to every wait
    ///
    /// 1.0 is real time, 0.5 plays twice as fast. Must be positive.
    pub time_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            go_to_ms: 600,
            glide_ms: 1500,
            success_message_ms: 2000,
            success_message: "EXCELLENT! 🎉".into(),
            initial_target: Point::new(150, 100),
            seed: None,
            time_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text, filling missing fields with defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(SandboxError::InvalidConfig(format!(
                "time_scale ({}) must be a positive number",
                self.time_scale
            )));
        }
        Ok(())
    }

    /// Scale a nominal wait by `time_scale`
    pub fn scaled(&self, millis: u64) -> Duration {
        let nanos = millis as f64 * 1_000_000.0 * self.time_scale;
        Duration::from_nanos(nanos.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_timing() {
        let config = EngineConfig::default();
        assert_eq!(config.go_to_ms, 600);
        assert_eq!(config.glide_ms, 1500);
        assert_eq!(config.success_message_ms, 2000);
        assert_eq!(config.initial_target, Point::new(150, 100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("seed = 7\ntime_scale = 0.5\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_scale, 0.5);
        assert_eq!(config.glide_ms, 1500);
    }

    #[test]
    fn test_initial_target_from_toml() {
        let config = EngineConfig::from_toml_str("[initial_target]\nx = -20\ny = 35\n").unwrap();
        assert_eq!(config.initial_target, Point::new(-20, 35));
    }

    #[test]
    fn test_rejects_non_positive_time_scale() {
        let err = EngineConfig::from_toml_str("time_scale = 0.0").unwrap_err();
        assert!(matches!(err, SandboxError::InvalidConfig(_)));
    }

    #[test]
    fn test_scaled_wait() {
        let config = EngineConfig {
            time_scale: 0.5,
            ..EngineConfig::default()
        };
        assert_eq!(config.scaled(600), Duration::from_millis(300));
    }
}
