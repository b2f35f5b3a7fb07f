// Host-side tests for particle integration, emitters and the sine-wave grid.

use glam::Vec3;
use nebula_backdrop::constants::DAMPING_COLOR;
use nebula_backdrop::emitter::{Emitter, EmitterOptions, Span};
use nebula_backdrop::particle::{Behaviour, Particle};
use nebula_backdrop::particle_wave::{hsl_to_rgb, ParticleWave, MAX_AMPS, NUM_POINTS};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn behaviour() -> Behaviour {
    Behaviour {
        gravity: 0.0,
        drift: Vec3::ZERO,
        drift_delay: 0.2,
        alpha: (1.0, 0.5),
        scale: (1.0, 0.5),
    }
}

#[test]
fn particle_dies_at_end_of_life() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut p = Particle::new(Vec3::ZERO, Vec3::X * 10.0, Vec3::ZERO, 1.0, 20.0);
    p.step(0.5, &behaviour(), &mut rng);
    assert!(!p.dead);
    assert!(p.position.x > 0.0);
    assert!((p.energy() - 0.5).abs() < 1e-6);
    assert!((p.alpha - 0.75).abs() < 1e-6);
    p.step(0.6, &behaviour(), &mut rng);
    assert!(p.dead);
}

#[test]
fn burnout_is_one_shot_and_fades_toward_damping_color() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, 10.0, 20.0);
    p.begin_burnout(DAMPING_COLOR, 0.5);
    p.begin_burnout([0.0, 0.0, 0.0], 9.0);
    let burnout = p.burnout.clone().expect("attached");
    assert_eq!(burnout.color_to, DAMPING_COLOR);
    assert_eq!(burnout.duration, 0.5);

    for _ in 0..10 {
        p.step(0.1, &behaviour(), &mut rng);
    }
    for (got, want) in p.color.iter().zip(DAMPING_COLOR) {
        assert!((got - want).abs() < 1e-5);
    }
    assert!(p.alpha < 1.0);
    assert!(p.burnout.as_ref().is_some_and(|b| b.progress() > 0.999));
}

#[test]
fn span_samples_within_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let span = Span::new(20.0, 60.0);
    for _ in 0..200 {
        let v = span.sample(&mut rng);
        assert!((20.0..=60.0).contains(&v));
    }
    assert_eq!(Span::fixed(42.0).sample(&mut rng), 42.0);
}

#[test]
fn emitter_spawns_at_rate_along_its_axis() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut options = EmitterOptions::default();
    options.velocity.axis = Vec3::X;
    options.velocity.theta_deg = 0.0;
    options.gravity = 0.0;
    options.drift.amount = Vec3::ZERO;
    options.force.force = Vec3::ZERO;
    let mut emitter = Emitter::new(options);

    emitter.update(0.1, &mut rng);
    assert_eq!(emitter.live_count(), 0);
    emitter.update(0.1, &mut rng);
    assert_eq!(emitter.live_count(), 2);
    for p in emitter.particles() {
        assert!(p.velocity.x > 0.0);
        assert!(p.velocity.y.abs() < 1e-3 && p.velocity.z.abs() < 1e-3);
    }

    emitter.stop_emit();
    emitter.update(1.0, &mut rng);
    assert_eq!(emitter.live_count(), 2);
    emitter.kill_all();
    assert_eq!(emitter.live_count(), 0);
    assert_eq!(emitter.particles().len(), 2);
    emitter.update(0.01, &mut rng);
    assert!(emitter.particles().is_empty());
}

#[test]
fn amplitude_window_keeps_last_five() {
    let mut wave = ParticleWave::new();
    for i in 0..(MAX_AMPS + 3) {
        wave.update_amp_queue(i as f32);
    }
    // last five: 3..=7
    assert!((wave.average_amplitude() - 5.0).abs() < 1e-6);
}

#[test]
fn louder_output_gives_larger_amplitude() {
    let mut wave = ParticleWave::new();
    let quiet = wave.calculate_sine_wave_amplitude(-60.0);
    let loud = wave.calculate_sine_wave_amplitude(-6.0);
    assert!(loud > quiet);
    assert_eq!(wave.amplitude(), loud);
    assert!(wave.calculate_sine_wave_amplitude(0.0).is_finite());
}

#[test]
fn separation_tracks_room_size() {
    let mut wave = ParticleWave::new();
    wave.scale_particle_separation(0.0);
    assert_eq!(wave.current_separation(), 30.0);
    let narrow = wave.top().positions[NUM_POINTS - 1].x - wave.top().positions[0].x;
    wave.scale_particle_separation(1.0);
    let wide = wave.top().positions[NUM_POINTS - 1].x - wave.top().positions[0].x;
    assert!(wide > narrow);
}

#[test]
fn hsl_primaries() {
    let red = hsl_to_rgb(0.0, 1.0, 0.5);
    assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
    assert_eq!(hsl_to_rgb(0.3, 0.0, 0.4), [0.4, 0.4, 0.4]);
}
