//! Emitter physics derived from the current control state.
//!
//! Everything is a function of [`VisualParams`] plus explicit arguments. The
//! only state kept here is the last computed life/speed/radius, because the
//! force and burnout mappings read the "current" speed and life outside a
//! recompute.

use crate::config::NebulaConfig;
use crate::constants::LEFT_GROUP_LEN;
use crate::scaling::{linear, logarithmic};
use crate::visual_params::VisualParams;
use glam::Vec3;

/// Emitters 0-1 form the left group, 2-3 the right group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterGroup {
    Left,
    Right,
}

impl EmitterGroup {
    #[inline]
    pub fn of(emitter_index: usize) -> Self {
        if emitter_index < LEFT_GROUP_LEN {
            EmitterGroup::Left
        } else {
            EmitterGroup::Right
        }
    }
}

/// Snapshot of everything an emitter needs from the mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterParams {
    pub life_scale: f32,
    pub speed_scale: f32,
    pub radius_scale: f32,
    pub force: Vec3,
    pub drift: Vec3,
    pub velocity_axis: Vec3,
}

#[derive(Clone, Debug)]
pub struct NebulaParams {
    config: NebulaConfig,
    life_scale: f32,
    speed_scale: f32,
    radius_scale: f32,
}

impl NebulaParams {
    pub fn new(config: NebulaConfig) -> Self {
        Self {
            life_scale: config.default_life,
            speed_scale: config.default_speed,
            radius_scale: config.min_radius,
            config,
        }
    }

    pub fn config(&self) -> &NebulaConfig {
        &self.config
    }

    pub fn life_scale(&self) -> f32 {
        self.life_scale
    }
    pub fn set_life_scale(&mut self, life: f32) {
        self.life_scale = life;
    }

    pub fn speed_scale(&self) -> f32 {
        self.speed_scale
    }
    pub fn set_speed_scale(&mut self, speed: f32) {
        self.speed_scale = speed;
    }

    pub fn radius_scale(&self) -> f32 {
        self.radius_scale
    }
    pub fn set_radius_scale(&mut self, radius: f32) {
        self.radius_scale = radius;
    }

    /// Life blends inverse damping with room size; `output_scale` stretches
    /// the blend with the current loudness. Low output pins life to the
    /// default so the plume dies down quickly.
    pub fn calculate_life_scale(&self, visual: &VisualParams, output_scale: f32) -> f32 {
        if visual.is_low() {
            return self.config.default_life;
        }
        let c = &self.config;
        let combined =
            output_scale * (c.damping_pct * (1.0 - visual.damp()) + c.room_size_pct * visual.size());
        linear(c.min_life, c.max_life, combined)
    }

    pub fn calculate_speed_scale(&self, visual: &VisualParams, amplitude: f32) -> f32 {
        if visual.is_low() {
            return self.config.default_speed;
        }
        let c = &self.config;
        logarithmic(c.min_speed, c.max_speed, amplitude, c.speed_log_base)
    }

    pub fn calculate_radius(&self, visual: &VisualParams) -> f32 {
        linear(self.config.min_radius, self.config.max_radius, visual.size())
    }

    /// Output-to-life coupling: quieter output (more negative dB) pulls the
    /// scale toward 1, louder output toward `amplitude`.
    pub fn output_life_scale(&self, amplitude: f32, output_db: f32) -> f32 {
        // 0 dB and above would put 1/-output outside the log domain
        let t = if output_db < 0.0 { 1.0 / -output_db } else { 0.0 };
        logarithmic(1.0, amplitude, t, self.config.output_life_log_base)
    }

    pub fn base_force(&self) -> f32 {
        let c = &self.config;
        logarithmic(c.force_floor, c.force_ceiling, self.speed_scale, c.force_log_base)
    }

    /// Opposite x signs make the two groups push away from each other.
    pub fn force_vector(&self, emitter_index: usize) -> Vec3 {
        let base = self.base_force();
        let x = match EmitterGroup::of(emitter_index) {
            EmitterGroup::Left => -0.5 * base,
            EmitterGroup::Right => 0.5 * base,
        };
        Vec3::new(x, 0.4 * base, base)
    }

    pub fn drift_vector(&self, visual: &VisualParams) -> Vec3 {
        let c = &self.config;
        let size = visual.size();
        Vec3::new(
            linear(c.min_drift[0], c.max_drift[0], size),
            linear(c.min_drift[1], c.max_drift[1], size),
            linear(c.min_drift[2], c.max_drift[2], size),
        )
    }

    /// Wider stereo image drives the left axis more negative and the right
    /// axis more positive.
    pub fn velocity_axis(&self, visual: &VisualParams, emitter_index: usize) -> Vec3 {
        let c = &self.config;
        let (min, max, yz) = match EmitterGroup::of(emitter_index) {
            EmitterGroup::Left => (c.min_left_velocity, c.max_left_velocity, c.left_yz_velocity),
            EmitterGroup::Right => (
                c.min_right_velocity,
                c.max_right_velocity,
                c.right_yz_velocity,
            ),
        };
        let x = logarithmic(min, max, visual.width(), c.velocity_log_base);
        Vec3::new(x, yz[0], yz[1])
    }

    pub fn emitter_params(&self, visual: &VisualParams, emitter_index: usize) -> EmitterParams {
        EmitterParams {
            life_scale: self.life_scale,
            speed_scale: self.speed_scale,
            radius_scale: self.radius_scale,
            force: self.force_vector(emitter_index),
            drift: self.drift_vector(visual),
            velocity_axis: self.velocity_axis(visual, emitter_index),
        }
    }
}
