//! Tunable mapping constants.
//!
//! Two parameterizations of the emitter mapping have shipped: a balanced one
//! (room size dominates particle life) and a "burnout" one (damping dominates,
//! shorter lives, particles fade near the front wall under heavy damping).
//! Both are presets here; nothing downstream hardcodes either set.

use crate::error::BackdropError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Emitter-parameter mapping constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaConfig {
    // life
    pub min_life: f32,
    pub max_life: f32,
    pub damping_pct: f32,
    pub room_size_pct: f32,
    pub default_life: f32,
    pub output_life_log_base: f32,

    // speed
    pub min_speed: f32,
    pub max_speed: f32,
    pub speed_log_base: f32,
    pub default_speed: f32,

    // force
    pub force_floor: f32,
    pub force_ceiling: f32,
    pub force_log_base: f32,

    // radius
    pub min_radius: f32,
    pub max_radius: f32,

    // drift envelope per axis, driven by room size
    pub min_drift: [f32; 3],
    pub max_drift: [f32; 3],
    pub drift_delay: f32,

    // radial velocity axes; the left range is descending on purpose
    pub min_left_velocity: f32,
    pub max_left_velocity: f32,
    pub min_right_velocity: f32,
    pub max_right_velocity: f32,
    pub left_yz_velocity: [f32; 2],
    pub right_yz_velocity: [f32; 2],
    pub velocity_log_base: f32,
    pub velocity_theta_deg: f32,

    // collision pass
    pub reflection_buffer: f32,
    pub max_velocity: f32,
    pub burnout_enabled: bool,
    pub burnout_damping_threshold: f32,
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            min_life: 4.0,
            max_life: 16.0,
            damping_pct: 0.4,
            room_size_pct: 0.6,
            default_life: 0.2,
            output_life_log_base: 10.0,
            min_speed: 20.0,
            max_speed: 80.0,
            speed_log_base: 2.0,
            default_speed: 0.2,
            force_floor: 2.0,
            force_ceiling: 12.0,
            force_log_base: std::f32::consts::E,
            min_radius: 30.0,
            max_radius: 80.0,
            min_drift: [30.0, 50.0, 50.0],
            max_drift: [100.0, 150.0, 200.0],
            drift_delay: 0.2,
            min_left_velocity: 150.0,
            max_left_velocity: -600.0,
            min_right_velocity: -150.0,
            max_right_velocity: 600.0,
            left_yz_velocity: [-100.0, 10.0],
            right_yz_velocity: [100.0, 10.0],
            velocity_log_base: std::f32::consts::E,
            velocity_theta_deg: 20.0,
            reflection_buffer: 80.0,
            max_velocity: 250.0,
            burnout_enabled: false,
            burnout_damping_threshold: 0.45,
        }
    }
}

impl NebulaConfig {
    /// Damping-weighted preset with shorter lives and front-wall burnout.
    pub fn burnout() -> Self {
        Self {
            max_life: 10.0,
            damping_pct: 0.7,
            room_size_pct: 0.3,
            max_velocity: 220.0,
            burnout_enabled: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), BackdropError> {
        let split = self.damping_pct + self.room_size_pct;
        if (split - 1.0).abs() > 1e-3 {
            return Err(BackdropError::Config(format!(
                "damping_pct + room_size_pct must be 1, got {split}"
            )));
        }
        let bases = [
            ("output_life_log_base", self.output_life_log_base),
            ("speed_log_base", self.speed_log_base),
            ("force_log_base", self.force_log_base),
            ("velocity_log_base", self.velocity_log_base),
        ];
        for (name, base) in bases {
            if base <= 1.0 {
                return Err(BackdropError::Config(format!("{name} must be > 1, got {base}")));
            }
        }
        if self.max_velocity <= 0.0 {
            return Err(BackdropError::Config("max_velocity must be positive".into()));
        }
        if self.reflection_buffer < 0.0 {
            return Err(BackdropError::Config("reflection_buffer must not be negative".into()));
        }
        if self.drift_delay <= 0.0 {
            return Err(BackdropError::Config("drift_delay must be positive".into()));
        }
        Ok(())
    }
}

/// Throttle/debounce windows for incoming telemetry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryTiming {
    /// Output level and frequency levels (~30 fps).
    pub throttle_ms: u64,
    /// Mix, width, damp and freeze.
    pub slow_throttle_ms: u64,
    /// Room size waits for this much quiet before flushing particles.
    pub room_size_debounce_ms: u64,
}

impl Default for TelemetryTiming {
    fn default() -> Self {
        Self {
            throttle_ms: 33,
            slow_throttle_ms: 33 * 3,
            room_size_debounce_ms: 10,
        }
    }
}

impl TelemetryTiming {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
    pub fn slow_throttle(&self) -> Duration {
        Duration::from_millis(self.slow_throttle_ms)
    }
    pub fn room_size_debounce(&self) -> Duration {
        Duration::from_millis(self.room_size_debounce_ms)
    }
}

/// Top-level configuration, loadable from JSON by front-ends.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub nebula: NebulaConfig,
    pub timing: TelemetryTiming,
    /// Seed for the particle engine's random source.
    pub seed: u64,
}

impl BackdropConfig {
    pub fn from_json(json: &str) -> Result<Self, BackdropError> {
        let config: Self = serde_json::from_str(json).map_err(|source| BackdropError::Decode {
            resource: "config",
            source,
        })?;
        config.nebula.validate()?;
        Ok(config)
    }
}
