//! Particle emitter with a fixed set of spawn-time and per-tick settings.
//!
//! Each setting is its own field, so reconfiguring an emitter is a plain
//! assignment: the new value replaces the old one wholesale.

use crate::constants::SPRITE_COLORS;
use crate::particle::{Behaviour, Particle};
use glam::Vec3;
use rand::Rng;

/// Closed range sampled uniformly; `min == max` yields a fixed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
    pub fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Spawn `count` particles every `interval` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rate {
    pub count: u32,
    pub interval: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifeConfig {
    pub life: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusConfig {
    pub radius: f32,
}

/// Initial velocity: `speed` along a random direction inside a cone of
/// `theta_deg` around `axis`. Only the axis direction matters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityConfig {
    pub speed: Span,
    pub axis: Vec3,
    pub theta_deg: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub force: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftConfig {
    pub amount: Vec3,
    pub delay: f32,
}

/// Construction-time settings; see [`EmitterOptions::default`] for the
/// values every emitter starts from.
#[derive(Clone, Debug)]
pub struct EmitterOptions {
    pub rate: Rate,
    pub life: LifeConfig,
    pub radius: RadiusConfig,
    pub velocity: VelocityConfig,
    pub force: ForceConfig,
    pub drift: DriftConfig,
    pub gravity: f32,
    pub alpha: (f32, f32),
    pub scale: (f32, f32),
    pub colors: Vec<[f32; 3]>,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            rate: Rate {
                count: 2,
                interval: 0.2,
            },
            life: LifeConfig { life: 5.0 },
            radius: RadiusConfig { radius: 80.0 },
            velocity: VelocityConfig {
                speed: Span::new(20.0, 60.0),
                axis: Vec3::new(-200.0, 50.0, 10.0),
                theta_deg: 20.0,
            },
            force: ForceConfig {
                force: Vec3::splat(0.2),
            },
            drift: DriftConfig {
                amount: Vec3::new(50.0, 120.0, 250.0),
                delay: 0.2,
            },
            gravity: 1.2,
            alpha: (1.0, 0.75),
            scale: (1.0, 0.5),
            colors: SPRITE_COLORS.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Emitter {
    pub position: Vec3,
    pub rate: Rate,
    pub life: LifeConfig,
    pub radius: RadiusConfig,
    pub velocity: VelocityConfig,
    pub force: ForceConfig,
    pub drift: DriftConfig,
    pub gravity: f32,
    pub alpha: (f32, f32),
    pub scale: (f32, f32),
    colors: Vec<[f32; 3]>,
    particles: Vec<Particle>,
    emitting: bool,
    spawn_accum: f32,
}

impl Emitter {
    pub fn new(options: EmitterOptions) -> Self {
        Self {
            position: Vec3::ZERO,
            rate: options.rate,
            life: options.life,
            radius: options.radius,
            velocity: options.velocity,
            force: options.force,
            drift: options.drift,
            gravity: options.gravity,
            alpha: options.alpha,
            scale: options.scale,
            colors: options.colors,
            particles: Vec::new(),
            emitting: true,
            spawn_accum: 0.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Count of particles not yet marked dead.
    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.dead).count()
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    pub fn emit(&mut self) {
        self.emitting = true;
    }

    /// Stops spawning; existing particles keep simulating until they expire.
    pub fn stop_emit(&mut self) {
        self.emitting = false;
        self.spawn_accum = 0.0;
    }

    pub fn kill_all(&mut self) {
        for p in &mut self.particles {
            p.dead = true;
        }
    }

    /// Inserts an already built particle, bypassing the spawn rate.
    pub fn push_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advances the emitter one tick: spawn, integrate, drop the dead.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.particles.retain(|p| !p.dead);

        if self.emitting && self.rate.interval > 0.0 {
            self.spawn_accum += dt;
            while self.spawn_accum >= self.rate.interval {
                self.spawn_accum -= self.rate.interval;
                for _ in 0..self.rate.count {
                    let particle = self.spawn(rng);
                    self.particles.push(particle);
                }
            }
        }

        let behaviour = Behaviour {
            gravity: self.gravity,
            drift: self.drift.amount,
            drift_delay: self.drift.delay,
            alpha: self.alpha,
            scale: self.scale,
        };
        for p in &mut self.particles {
            p.step(dt, &behaviour, rng);
        }
        self.particles.retain(|p| !p.dead);
    }

    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let dir = cone_direction(self.velocity.axis, self.velocity.theta_deg, rng);
        let speed = self.velocity.speed.sample(rng);
        let mut particle = Particle::new(
            self.position,
            dir * speed,
            self.force.force,
            self.life.life,
            self.radius.radius,
        );
        if !self.colors.is_empty() {
            let a = self.colors[rng.gen_range(0..self.colors.len())];
            let b = self.colors[rng.gen_range(0..self.colors.len())];
            particle.color = a;
            particle.color_start = a;
            particle.color_end = b;
        }
        particle
    }
}

/// Uniformly random direction within `theta_deg` of `axis`.
fn cone_direction<R: Rng + ?Sized>(axis: Vec3, theta_deg: f32, rng: &mut R) -> Vec3 {
    let axis = axis.try_normalize().unwrap_or(Vec3::X);
    let (u, v) = axis.any_orthonormal_pair();
    let phi = rng.gen_range(0.0..std::f32::consts::TAU);
    let tilt = rng.gen_range(0.0..=theta_deg.max(0.0).to_radians());
    axis * tilt.cos() + (u * phi.cos() + v * phi.sin()) * tilt.sin()
}
