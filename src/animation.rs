//! Frame-driven scene controller.
//!
//! The host calls [`AnimationController::tick`] once per display refresh.
//! Rendering happens every tick; the simulation step (sphere spin, emitter
//! orbit, particle integration) is skipped while bypassed so the visuals
//! freeze in place instead of disappearing.

use crate::config::BackdropConfig;
use crate::constants::*;
use crate::nebula_params::NebulaParams;
use crate::nebula_system::{CollisionStats, NebulaSystem};
use crate::particle_wave::ParticleWave;
use crate::scaling::logarithmic;
use crate::scene::{AnchorSphere, BoundingCuboid, PointLight};
use crate::visual_params::{ControlState, VisualParams};
use glam::Vec3;

/// Read-only view handed to the host each frame.
pub struct Frame<'a> {
    pub time: f32,
    pub dt: f32,
    pub cube: &'a BoundingCuboid,
    pub spheres: &'a [AnchorSphere],
    pub light: &'a PointLight,
    pub nebula: &'a NebulaSystem,
    pub wave: &'a ParticleWave,
}

/// Render-side capabilities supplied by the front-end.
pub trait FrameHost {
    /// Camera controls, stats overlays and the like.
    fn update_controls(&mut self, _dt: f32) {}
    fn render(&mut self, frame: &Frame<'_>) -> anyhow::Result<()>;
}

pub struct AnimationController {
    visual: VisualParams,
    nebula_params: NebulaParams,
    nebula: NebulaSystem,
    wave: ParticleWave,
    cube: BoundingCuboid,
    spheres: Vec<AnchorSphere>,
    light: PointLight,
    bypassed: bool,
    time: f32,
    theta: f32,
}

impl AnimationController {
    pub fn new(config: &BackdropConfig) -> Self {
        let wave = ParticleWave::new();
        let spheres = anchor_spheres(&wave);
        let visual = VisualParams::new(ControlState::default());
        let mut controller = Self {
            nebula_params: NebulaParams::new(config.nebula.clone()),
            nebula: NebulaSystem::new(&config.nebula, config.seed),
            cube: BoundingCuboid::new(cube_half_extents(), cube_position_vec3()),
            light: PointLight::new(POINT_LIGHT_INTENSITY, Vec3::from(POINT_LIGHT_POSITION)),
            visual,
            wave,
            spheres,
            bypassed: false,
            time: 0.0,
            theta: 0.0,
        };
        controller.scale_surrounding_cube(controller.visual.cube_scale());
        log::info!(
            "[scene] ready: {} emitters, {} anchor spheres, cube scale {:.2}",
            controller.nebula.emitters().len(),
            controller.spheres.len(),
            controller.visual.cube_scale()
        );
        controller
    }

    pub fn visual(&self) -> &VisualParams {
        &self.visual
    }
    pub fn nebula_params(&self) -> &NebulaParams {
        &self.nebula_params
    }
    pub fn nebula(&self) -> &NebulaSystem {
        &self.nebula
    }
    pub fn wave(&self) -> &ParticleWave {
        &self.wave
    }
    pub fn cube(&self) -> &BoundingCuboid {
        &self.cube
    }
    pub fn spheres(&self) -> &[AnchorSphere] {
        &self.spheres
    }
    pub fn light(&self) -> &PointLight {
        &self.light
    }
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }
    pub fn time(&self) -> f32 {
        self.time
    }

    /// One display refresh.
    pub fn tick(&mut self, dt: f32, host: &mut dyn FrameHost) -> anyhow::Result<()> {
        self.time += dt;
        if !self.bypassed {
            self.rotate_spheres();
            self.theta = (self.theta + EMITTER_ORBIT_SPEED * dt) % std::f32::consts::TAU;
            self.nebula
                .animate_emitter_positions(self.theta, EMITTER_ORBIT_RADIUS);
            self.nebula.update(dt);
        }

        host.update_controls(dt);
        host.render(&Frame {
            time: self.time,
            dt,
            cube: &self.cube,
            spheres: &self.spheres,
            light: &self.light,
            nebula: &self.nebula,
            wave: &self.wave,
        })
    }

    // ---------------- control handlers ----------------

    /// Output sample: classify and attenuate, feed the wave amplitude window,
    /// then reconfigure the emitters from the averaged amplitude.
    pub fn apply_output(&mut self, output_db: f32) -> CollisionStats {
        self.visual.set_output(output_db);
        let attenuated = self.visual.calculate_output(output_db);
        let amp = self.wave.calculate_sine_wave_amplitude(attenuated);
        self.wave.update_amp_queue(amp);
        let avg_amplitude = self.wave.average_amplitude();
        self.nebula.handle_output_change(
            &mut self.nebula_params,
            &self.visual,
            &self.cube,
            avg_amplitude,
        )
    }

    pub fn apply_room_size(&mut self, size: f32) {
        self.visual.set_size(size);
        self.wave.scale_particle_separation(self.visual.size());
        self.scale_surrounding_cube(self.visual.cube_scale());
        self.scale_anchor_spheres_position(self.visual.sphere_scale());
        self.nebula
            .handle_room_size_change(&mut self.nebula_params, &self.visual);
    }

    pub fn apply_mix(&mut self, mix: f32) {
        self.visual.set_mix(mix);
        self.scale_anchor_spheres(self.visual.mix(), MIX_SPHERE_SCALE_FACTOR);
    }

    pub fn apply_width(&mut self, width: f32) {
        self.visual.set_width(width);
        self.nebula
            .handle_width_change(&self.nebula_params, &self.visual);
    }

    /// Damping only feeds later life recomputes and the burnout threshold.
    pub fn apply_damp(&mut self, damp: f32) {
        self.visual.set_damp(damp);
    }

    pub fn apply_freeze(&mut self, frozen: bool) {
        self.visual.set_frozen(frozen);
        if frozen {
            self.freeze_anchor_spheres();
        } else {
            self.unfreeze_anchor_spheres();
        }
    }

    /// Frequency levels; ignored while bypassed.
    pub fn apply_levels(&mut self, levels: &[f32], count: f32) {
        if self.bypassed {
            return;
        }
        self.wave.animate_particles(levels, count);
    }

    // ---------------- scene transforms ----------------

    pub fn scale_surrounding_cube(&mut self, scale: f32) {
        self.cube.rescale(scale);
    }

    /// Sphere size grows with mix, always relative to the original scale.
    pub fn scale_anchor_spheres(&mut self, mix: f32, scale_factor: f32) {
        let size = SPHERE_RADIUS + mix * scale_factor;
        for sphere in &mut self.spheres {
            sphere.set_uniform_scale(size);
        }
    }

    /// Pushes spheres outward as the wave grid spreads: the first four
    /// (left) move toward -x, the rest toward +x, and each moves away from
    /// the z origin on its own side.
    pub fn scale_anchor_spheres_position(&mut self, scale: f32) {
        let separation = self.wave.current_separation();
        let x_offset = logarithmic(
            10.0 * separation,
            15.0 * separation,
            scale,
            std::f32::consts::E,
        );
        for (i, sphere) in self.spheres.iter_mut().enumerate() {
            let base = sphere.original_position();
            let dx = if i < 4 { -x_offset } else { x_offset };
            let dz = if base.z < 0.0 { -separation } else { separation };
            sphere.position = Vec3::new(scale * (base.x + dx), base.y, scale * (base.z + dz));
        }
    }

    pub fn freeze_anchor_spheres(&mut self) {
        for sphere in &mut self.spheres {
            sphere.color = FREEZE_COLOR;
        }
        self.nebula.stop_emitting();
        log::info!("[scene] frozen: emission paused");
    }

    pub fn unfreeze_anchor_spheres(&mut self) {
        if !self.bypassed {
            self.nebula.resume_emitting();
        }
        for sphere in &mut self.spheres {
            sphere.restore_color();
        }
        log::info!("[scene] unfrozen");
    }

    /// Bypass kills the light and zeroes sphere spin rather than pausing it.
    pub fn set_bypass(&mut self, bypassed: bool) {
        if bypassed == self.bypassed {
            return;
        }
        self.bypassed = bypassed;
        if bypassed {
            self.nebula.stop_emitting();
            self.light.intensity = 0.0;
            for sphere in &mut self.spheres {
                sphere.rotation.x = 0.0;
                sphere.rotation.y = 0.0;
            }
        } else {
            self.light.restore_intensity();
            if !self.visual.is_frozen() {
                self.nebula.resume_emitting();
            }
        }
        log::info!("[scene] bypass {}", if bypassed { "on" } else { "off" });
    }

    fn rotate_spheres(&mut self) {
        if self.visual.is_frozen() {
            return;
        }
        for (i, sphere) in self.spheres.iter_mut().enumerate() {
            let speed = 1.0 + i as f32 * SPHERE_ROTATION_STEP;
            sphere.rotation.y = self.time * speed;
        }
    }
}

/// Eight spheres at the corners of the wave grid: left four then right four,
/// each set ordered bottom/top front then bottom/top back.
fn anchor_spheres(wave: &ParticleWave) -> Vec<AnchorSphere> {
    let top = &wave.top().positions;
    let bottom = &wave.bottom().positions;
    let (Some(first), Some(last), Some(first_bottom)) = (top.first(), top.last(), bottom.first())
    else {
        return Vec::new();
    };
    let front_z = last.z + SPHERE_FRONT_Z_OFFSET;
    let back_z = first.z - SPHERE_BACK_Z_OFFSET;
    let (left_x, right_x) = (first.x, last.x);
    let (top_y, bottom_y) = (first.y, first_bottom.y);

    [left_x, right_x]
        .into_iter()
        .flat_map(|x| {
            [
                Vec3::new(x, bottom_y, front_z),
                Vec3::new(x, top_y, front_z),
                Vec3::new(x, bottom_y, back_z),
                Vec3::new(x, top_y, back_z),
            ]
        })
        .map(|pos| AnchorSphere::new(pos, SPHERE_COLOR))
        .collect()
}
