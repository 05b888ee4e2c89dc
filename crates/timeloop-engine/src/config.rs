//! Session configuration, validation, and error types.
//!
//! [`TimeLoopConfig`] drives the controller; [`SessionConfig`] bundles it
//! with the actor tunings so a whole session can be loaded from one TOML
//! document via [`SessionConfig::from_toml_str`]. Every section is
//! optional in TOML and falls back to its [`Default`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use timeloop_actors::{EnemyConfig, PlayerConfig};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A duration, speed, or radius was NaN, infinite, zero, or negative.
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// `rewind_time_scale` lies outside `(0, 1]`.
    #[error("rewind_time_scale must be in (0, 1], got {value}")]
    InvalidTimeScale {
        /// The invalid value.
        value: f64,
    },
    /// `max_rewind_seconds / fixed_dt` rounds to zero frames.
    #[error("max_rewind_seconds {max_rewind_seconds} at fixed_dt {fixed_dt} yields zero frames")]
    ZeroFrames {
        /// Configured rewind window in seconds.
        max_rewind_seconds: f64,
        /// Configured timestep in seconds.
        fixed_dt: f64,
    },
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Number of snapshots that cover `max_rewind_seconds` at timestep `dt`.
///
/// Rounds half to even. NaN or negative ratios yield 0; the caller
/// decides whether that is acceptable.
pub fn max_frames_for(max_rewind_seconds: f64, dt: f64) -> usize {
    let frames = (max_rewind_seconds / dt).round_ties_even();
    // `as` saturates: NaN -> 0, +inf -> usize::MAX.
    frames as usize
}

// ── TimeLoopConfig ─────────────────────────────────────────────────

/// Controller tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeLoopConfig {
    /// Length of the rewind window in seconds. Default: 5.
    pub max_rewind_seconds: f64,
    /// Fixed simulation timestep in seconds. Default: 0.02 (50 Hz).
    pub fixed_dt: f64,
    /// Presentation time scale while rewinding. Default: 0.1.
    pub rewind_time_scale: f64,
    /// Length of one loop in seconds. When play reaches it, every
    /// registered history is cleared and the loop restarts at tick 0.
    /// `None` runs a single open-ended loop. Default: `None`.
    pub loop_seconds: Option<f64>,
}

impl Default for TimeLoopConfig {
    fn default() -> Self {
        Self {
            max_rewind_seconds: 5.0,
            fixed_dt: 1.0 / 50.0,
            rewind_time_scale: 0.1,
            loop_seconds: None,
        }
    }
}

impl TimeLoopConfig {
    /// History depth implied by this configuration at its own `fixed_dt`.
    pub fn max_frames(&self) -> usize {
        max_frames_for(self.max_rewind_seconds, self.fixed_dt)
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("time_loop.max_rewind_seconds", self.max_rewind_seconds)?;
        positive("time_loop.fixed_dt", self.fixed_dt)?;
        if let Some(seconds) = self.loop_seconds {
            positive("time_loop.loop_seconds", seconds)?;
        }
        let scale = self.rewind_time_scale;
        if !(scale.is_finite() && scale > 0.0 && scale <= 1.0) {
            return Err(ConfigError::InvalidTimeScale { value: scale });
        }
        if self.max_frames() == 0 {
            return Err(ConfigError::ZeroFrames {
                max_rewind_seconds: self.max_rewind_seconds,
                fixed_dt: self.fixed_dt,
            });
        }
        Ok(())
    }
}

// ── SessionConfig ──────────────────────────────────────────────────

/// Everything needed to set up a session: controller plus actor tunings.
///
/// ```toml
/// [time_loop]
/// max_rewind_seconds = 3.0
///
/// [enemy]
/// detection_radius = 6.0
/// attack_range = 1.5
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Controller tuning.
    pub time_loop: TimeLoopConfig,
    /// Player tuning.
    pub player: PlayerConfig,
    /// Enemy tuning.
    pub enemy: EnemyConfig,
}

impl SessionConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_loop.validate()?;

        let p = &self.player;
        positive("player.movement_speed", p.movement_speed.into())?;
        positive("player.jump_force", p.jump_force.into())?;
        positive("player.ground_probe_radius", p.ground_probe_radius.into())?;

        let e = &self.enemy;
        positive("enemy.patrol_speed", e.patrol_speed.into())?;
        positive("enemy.chase_speed", e.chase_speed.into())?;
        positive("enemy.detection_radius", e.detection_radius.into())?;
        positive(
            "enemy.waypoint_arrival_threshold",
            e.waypoint_arrival_threshold.into(),
        )?;
        if let Some(range) = e.attack_range {
            positive("enemy.attack_range", range.into())?;
        }
        Ok(())
    }
}
