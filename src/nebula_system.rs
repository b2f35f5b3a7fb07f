//! Owns the four nebula emitters and applies control changes to them.
//!
//! Three independent triggers reconfigure the emitters (output level, room
//! size, stereo width) and freeze/bypass pause emission. After every output
//! update the collision pass bends live particles back inside the
//! surrounding cube.

use crate::config::NebulaConfig;
use crate::constants::*;
use crate::emitter::{DriftConfig, Emitter, EmitterOptions, Span, VelocityConfig};
use crate::error::BackdropError;
use crate::nebula_params::{EmitterGroup, NebulaParams};
use crate::particle::Particle;
use crate::scene::{BoundingCuboid, CubeFaces};
use crate::visual_params::VisualParams;
use glam::Vec3;
use rand::prelude::*;

/// Outcome of one collision pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionStats {
    pub reflected: usize,
    pub killed: usize,
}

/// Collision settings resolved for one pass.
struct CollisionPass<'a> {
    faces: CubeFaces,
    config: &'a NebulaConfig,
    /// Burnout duration when front-wall burnout applies this pass.
    burnout: Option<f32>,
}

pub struct NebulaSystem {
    emitters: Vec<Emitter>,
    rng: StdRng,
}

impl NebulaSystem {
    pub fn new(config: &NebulaConfig, seed: u64) -> Self {
        let emitters = (0..NUM_EMITTERS)
            .map(|i| {
                let mut options = EmitterOptions::default();
                options.velocity.theta_deg = config.velocity_theta_deg;
                if EmitterGroup::of(i) == EmitterGroup::Right {
                    options.velocity.axis = Vec3::new(200.0, 0.0, 10.0);
                }
                Emitter::new(options)
            })
            .collect::<Vec<_>>();
        let mut system = Self {
            emitters,
            rng: StdRng::seed_from_u64(seed),
        };
        system.animate_emitter_positions(0.0, EMITTER_ORBIT_RADIUS);
        system
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    /// Orbits each emitter around its group anchor; odd indices run a
    /// quarter turn ahead so each pair traces perpendicular paths.
    pub fn animate_emitter_positions(&mut self, theta: f32, radius: f32) {
        for (i, emitter) in self.emitters.iter_mut().enumerate() {
            let base_x = match EmitterGroup::of(i) {
                EmitterGroup::Left => EMITTER_LEFT_X,
                EmitterGroup::Right => EMITTER_RIGHT_X,
            };
            let angle = theta
                + if i % 2 == 0 {
                    0.0
                } else {
                    std::f32::consts::FRAC_PI_2
                };
            emitter.position = Vec3::new(
                base_x + radius * angle.cos(),
                EMITTER_Y + radius * angle.sin(),
                EMITTER_Z,
            );
        }
    }

    /// New audio level: refresh life, speed and force, then correct the
    /// particles already in flight.
    pub fn handle_output_change(
        &mut self,
        params: &mut NebulaParams,
        visual: &VisualParams,
        cube: &BoundingCuboid,
        amplitude: f32,
    ) -> CollisionStats {
        let output_scale = params.output_life_scale(amplitude, visual.output());
        let life = params.calculate_life_scale(visual, output_scale);
        let speed = params.calculate_speed_scale(visual, amplitude);
        params.set_life_scale(life);
        params.set_speed_scale(speed);
        log::debug!("[nebula] output change life={life:.2} speed={speed:.2}");

        for (i, emitter) in self.emitters.iter_mut().enumerate() {
            emitter.life.life = life;
            emitter.velocity.speed = Span::fixed(speed);
            emitter.force.force = params.force_vector(i);
        }

        self.collide_with_cube(params, visual, cube)
    }

    /// New room size: flush every particle so nothing floats outside the
    /// shrunken cube, then refresh radius, life and drift.
    pub fn handle_room_size_change(&mut self, params: &mut NebulaParams, visual: &VisualParams) {
        self.reset_particles();

        let radius = params.calculate_radius(visual);
        let life = params.calculate_life_scale(visual, 1.0);
        params.set_radius_scale(radius);
        params.set_life_scale(life);
        let drift = DriftConfig {
            amount: params.drift_vector(visual),
            delay: params.config().drift_delay,
        };
        log::info!(
            "[nebula] room size {:.2}: flushed particles radius={radius:.1} life={life:.2}",
            visual.size()
        );

        for emitter in &mut self.emitters {
            emitter.radius.radius = radius;
            emitter.life.life = life;
            emitter.drift = drift;
        }
    }

    /// New stereo width: only the spawn direction of each group changes.
    pub fn handle_width_change(&mut self, params: &NebulaParams, visual: &VisualParams) {
        let theta_deg = params.config().velocity_theta_deg;
        for (i, emitter) in self.emitters.iter_mut().enumerate() {
            emitter.velocity = VelocityConfig {
                speed: Span::fixed(params.speed_scale()),
                axis: params.velocity_axis(visual, i),
                theta_deg,
            };
        }
    }

    pub fn reset_particles(&mut self) {
        for emitter in &mut self.emitters {
            emitter.kill_all();
        }
    }

    pub fn stop_emitting(&mut self) {
        for emitter in &mut self.emitters {
            emitter.stop_emit();
        }
    }

    pub fn resume_emitting(&mut self) {
        for emitter in &mut self.emitters {
            if !emitter.is_emitting() {
                emitter.emit();
            }
        }
    }

    /// Advances every emitter one simulation tick.
    pub fn update(&mut self, dt: f32) {
        for emitter in &mut self.emitters {
            emitter.update(dt, &mut self.rng);
        }
    }

    /// Reflects particles near the cube walls and kills the ones that escaped
    /// past a side wall. Skipped (and retried next output change) while the
    /// cube has no scale snapshot.
    pub fn collide_with_cube(
        &mut self,
        params: &NebulaParams,
        visual: &VisualParams,
        cube: &BoundingCuboid,
    ) -> CollisionStats {
        let faces = match cube.faces() {
            Ok(faces) => faces,
            Err(e @ BackdropError::MissingCubeSnapshot) => {
                log::trace!("[nebula] collision pass skipped: {e}");
                return CollisionStats::default();
            }
            Err(e) => {
                log::warn!("[nebula] collision pass skipped: {e}");
                return CollisionStats::default();
            }
        };
        let config = params.config();
        let burnout = (config.burnout_enabled
            && visual.damp() > config.burnout_damping_threshold
            && params.life_scale() > 0.0)
            .then(|| 1.0 / params.life_scale());
        let pass = CollisionPass {
            faces,
            config,
            burnout,
        };

        let mut stats = CollisionStats::default();
        for emitter in &mut self.emitters {
            for (index, particle) in emitter.particles_mut().iter_mut().enumerate() {
                if particle.dead {
                    continue;
                }
                // 1-based so the jitter phase 1/n stays finite
                let n = (index + 1) as f32;
                pass.apply(particle, n, &mut self.rng, &mut stats);
            }
        }
        stats
    }
}

impl CollisionPass<'_> {
    fn apply<R: Rng + ?Sized>(
        &self,
        p: &mut Particle,
        n: f32,
        rng: &mut R,
        stats: &mut CollisionStats,
    ) {
        let f = &self.faces;
        let buffer = self.config.reflection_buffer;
        let mut reflected = false;

        // depth walls: gentle bounce
        if p.position.z >= f.front_z - buffer {
            p.velocity.z *= reverse_velocity_factor(n, 1.0, rng);
            p.force.z *= reverse_force_factor(n, rng);
            reflected = true;
            if let Some(duration) = self.burnout {
                p.begin_burnout(DAMPING_COLOR, duration);
            }
        }
        if p.position.z <= f.back_z + buffer {
            p.velocity.z *= reverse_velocity_factor(n, 1.0, rng);
            p.force.z *= reverse_force_factor(n, rng);
            reflected = true;
        }

        // vertical and side walls: stronger bounce
        if p.position.y >= f.top_y - buffer {
            let m = 2.0 + rng.gen::<f32>();
            p.velocity.y *= reverse_velocity_factor(n, m, rng);
            p.force.y *= reverse_force_factor(n, rng);
            reflected = true;
        }
        if p.position.y <= f.bottom_y + buffer {
            let m = 2.0 + rng.gen::<f32>();
            p.velocity.y *= reverse_velocity_factor(n, m, rng);
            p.force.y *= reverse_force_factor(n, rng);
            reflected = true;
        }
        if p.position.x <= f.left_x + buffer {
            let m = 2.0 + rng.gen::<f32>();
            p.velocity.x *= reverse_velocity_factor(n, m, rng);
            p.force.x *= reverse_force_factor(n, rng);
            reflected = true;
        }
        if p.position.x >= f.right_x - buffer {
            let m = 2.0 + rng.gen::<f32>();
            p.velocity.x *= reverse_velocity_factor(n, m, rng);
            p.force.x *= reverse_force_factor(n, rng);
            reflected = true;
        }

        p.velocity = p.velocity.clamp_length_max(self.config.max_velocity);

        if reflected {
            stats.reflected += 1;
        }
        if p.position.x < f.left_x - buffer || p.position.x > f.right_x + buffer {
            p.dead = true;
            stats.killed += 1;
        }
    }
}

/// Always negative for n >= 1: the phase 1/n + r stays inside (0, 2).
fn reverse_velocity_factor<R: Rng + ?Sized>(n: f32, multiplier: f32, rng: &mut R) -> f32 {
    -(multiplier * (1.0 / n + rng.gen::<f32>()).sin())
}

fn reverse_force_factor<R: Rng + ?Sized>(n: f32, rng: &mut R) -> f32 {
    -(1.0 / n + rng.gen::<f32>()).cos()
}
