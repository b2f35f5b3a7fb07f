//! A single nebula particle and its per-tick integration.

use glam::Vec3;
use rand::Rng;

// Force and drift inputs are authored in small "nebula units"; these bring
// them into world units per second.
pub const FORCE_MEASURE: f32 = 10.0;
pub const DRIFT_MEASURE: f32 = 0.1;
// Fraction of velocity lost per tick
pub const VELOCITY_DAMPING: f32 = 0.006;

/// Burnout end state: slightly dimmer and smaller than at emission.
pub const BURNOUT_ALPHA: f32 = 0.72;
pub const BURNOUT_SCALE: f32 = 0.94;

/// One-shot color/fade/shrink transition attached by the collision pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Burnout {
    pub color_from: [f32; 3],
    pub color_to: [f32; 3],
    pub duration: f32,
    pub elapsed: f32,
}

impl Burnout {
    /// Ease-out-sine progress in 0..1.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        (t * std::f32::consts::FRAC_PI_2).sin()
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Own copy of the emitter force, bent independently on wall hits.
    pub force: Vec3,
    pub life: f32,
    pub age: f32,
    pub radius: f32,
    pub alpha: f32,
    pub scale: f32,
    pub color: [f32; 3],
    pub color_start: [f32; 3],
    pub color_end: [f32; 3],
    pub burnout: Option<Burnout>,
    pub dead: bool,
    drift_timer: f32,
}

/// Emitter-wide behaviours every live particle follows.
#[derive(Clone, Copy, Debug)]
pub struct Behaviour {
    pub gravity: f32,
    pub drift: Vec3,
    pub drift_delay: f32,
    pub alpha: (f32, f32),
    pub scale: (f32, f32),
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, force: Vec3, life: f32, radius: f32) -> Self {
        Self {
            position,
            velocity,
            force,
            life,
            age: 0.0,
            radius,
            alpha: 1.0,
            scale: 1.0,
            color: [1.0, 1.0, 1.0],
            color_start: [1.0, 1.0, 1.0],
            color_end: [1.0, 1.0, 1.0],
            burnout: None,
            dead: false,
            drift_timer: 0.0,
        }
    }

    /// Remaining life fraction, 1 at birth and 0 at expiry.
    pub fn energy(&self) -> f32 {
        if self.life <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }

    /// Attaches a burnout transition unless one is already running.
    pub fn begin_burnout(&mut self, color_to: [f32; 3], duration: f32) {
        if self.burnout.is_none() {
            self.burnout = Some(Burnout {
                color_from: self.color,
                color_to,
                duration,
                elapsed: 0.0,
            });
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f32, behaviour: &Behaviour, rng: &mut R) {
        if self.dead {
            return;
        }
        self.age += dt;
        if self.age >= self.life {
            self.dead = true;
            return;
        }

        let gravity = Vec3::new(0.0, -behaviour.gravity, 0.0);
        let acceleration = (self.force + gravity) * FORCE_MEASURE;

        self.drift_timer += dt;
        if self.drift_timer >= behaviour.drift_delay {
            self.drift_timer = 0.0;
            let jitter = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            self.velocity += jitter * behaviour.drift * DRIFT_MEASURE;
        }

        self.velocity += acceleration * dt;
        self.velocity *= 1.0 - VELOCITY_DAMPING;
        self.position += self.velocity * dt;

        let fade = 1.0 - self.energy();
        self.alpha = lerp(behaviour.alpha.0, behaviour.alpha.1, fade);
        self.scale = lerp(behaviour.scale.0, behaviour.scale.1, fade);
        self.color = lerp3(self.color_start, self.color_end, fade);

        if let Some(burnout) = self.burnout.as_mut() {
            burnout.elapsed += dt;
            let p = burnout.progress();
            self.color = lerp3(burnout.color_from, burnout.color_to, p);
            self.alpha = self.alpha.min(lerp(1.0, BURNOUT_ALPHA, p));
            self.scale *= lerp(1.0, BURNOUT_SCALE, p);
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}
