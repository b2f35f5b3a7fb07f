// Host-side tests for the frame-driven scene controller.

use glam::Vec3;
use nebula_backdrop::constants::{FREEZE_COLOR, POINT_LIGHT_INTENSITY, SPHERE_COLOR, SPHERE_RADIUS};
use nebula_backdrop::particle_wave::{SEPARATION, SEPARATION_FLOOR};
use nebula_backdrop::{AnimationController, BackdropConfig, Frame, FrameHost};

#[derive(Default)]
struct RecordingHost {
    controls: u32,
    renders: u32,
    light: Vec<f32>,
    live_particles: Vec<usize>,
}

impl FrameHost for RecordingHost {
    fn update_controls(&mut self, _dt: f32) {
        self.controls += 1;
    }

    fn render(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        self.renders += 1;
        self.light.push(frame.light.intensity);
        self.live_particles
            .push(frame.nebula.emitters().iter().map(|e| e.live_count()).sum());
        Ok(())
    }
}

fn live(scene: &AnimationController) -> usize {
    scene.nebula().emitters().iter().map(|e| e.live_count()).sum()
}

#[test]
fn controller_starts_with_scaled_cube_and_eight_spheres() {
    let scene = AnimationController::new(&BackdropConfig::default());
    assert_eq!(scene.spheres().len(), 8);
    assert!(scene.cube().snapshot().is_some());
    assert!((scene.cube().scale.x - 0.75).abs() < 1e-6);
    assert_eq!(scene.light().intensity, POINT_LIGHT_INTENSITY);
    assert!(!scene.is_bypassed());
}

#[test]
fn every_tick_renders_and_simulates() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    let mut host = RecordingHost::default();
    for _ in 0..30 {
        scene.tick(1.0 / 60.0, &mut host).expect("render");
    }
    assert_eq!(host.renders, 30);
    assert_eq!(host.controls, 30);
    assert!(live(&scene) > 0);
    assert_eq!(host.live_particles.first(), Some(&0));
    assert_eq!(host.live_particles.last(), Some(&live(&scene)));
    assert!((scene.time() - 0.5).abs() < 1e-3);
}

#[test]
fn bypass_keeps_rendering_but_freezes_simulation() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    let mut host = RecordingHost::default();
    scene.tick(0.5, &mut host).expect("render");
    scene.tick(0.1, &mut host).expect("render");
    let spin = scene.spheres()[3].rotation.y;
    assert!(spin != 0.0);

    scene.set_bypass(true);
    assert_eq!(scene.light().intensity, 0.0);
    assert!(scene.spheres().iter().all(|s| s.rotation.x == 0.0 && s.rotation.y == 0.0));

    let positions: Vec<Vec3> = scene.nebula().emitters()[0]
        .particles()
        .iter()
        .map(|p| p.position)
        .collect();
    let renders_before = host.renders;
    for _ in 0..10 {
        scene.tick(0.1, &mut host).expect("render");
    }
    assert_eq!(host.renders, renders_before + 10);
    assert!(host.light.iter().rev().take(10).all(|&l| l == 0.0));
    let after: Vec<Vec3> = scene.nebula().emitters()[0]
        .particles()
        .iter()
        .map(|p| p.position)
        .collect();
    assert_eq!(positions, after);
    assert!(scene.spheres().iter().all(|s| s.rotation.y == 0.0));

    scene.set_bypass(false);
    assert_eq!(scene.light().intensity, POINT_LIGHT_INTENSITY);
    assert!(scene.nebula().emitters().iter().all(|e| e.is_emitting()));
}

#[test]
fn freeze_recolors_spheres_and_pauses_emission() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    scene.apply_freeze(true);
    assert!(scene.visual().is_frozen());
    assert!(scene.spheres().iter().all(|s| s.color == FREEZE_COLOR));
    assert!(scene.nebula().emitters().iter().all(|e| !e.is_emitting()));

    scene.apply_freeze(false);
    assert!(scene.spheres().iter().all(|s| s.color == SPHERE_COLOR));
    assert!(scene.nebula().emitters().iter().all(|e| e.is_emitting()));
}

#[test]
fn unfreeze_while_bypassed_stays_silent() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    scene.apply_freeze(true);
    scene.set_bypass(true);
    scene.apply_freeze(false);
    assert!(scene.nebula().emitters().iter().all(|e| !e.is_emitting()));

    // leaving bypass while frozen must not restart emission either
    scene.apply_freeze(true);
    scene.set_bypass(false);
    assert!(scene.nebula().emitters().iter().all(|e| !e.is_emitting()));
    assert_eq!(scene.light().intensity, POINT_LIGHT_INTENSITY);
}

#[test]
fn room_size_rescales_cube_wave_and_flushes_particles() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    let mut host = RecordingHost::default();
    scene.tick(0.5, &mut host).expect("render");
    assert!(live(&scene) > 0);

    scene.apply_room_size(1.0);
    assert_eq!(scene.cube().scale, Vec3::ONE);
    assert_eq!(scene.cube().snapshot().map(|s| s.scale), Some(Vec3::ONE));
    assert_eq!(scene.wave().current_separation(), SEPARATION_FLOOR + SEPARATION);
    assert_eq!(live(&scene), 0);
    assert_eq!(
        scene.nebula_params().radius_scale(),
        scene.nebula_params().calculate_radius(scene.visual())
    );

    // Spheres move away from the centre as the grid widens
    let left = scene.spheres()[0].position.x;
    let right = scene.spheres()[7].position.x;
    assert!(left < scene.spheres()[0].original_position().x);
    assert!(right > scene.spheres()[7].original_position().x);
}

#[test]
fn mix_scales_spheres_from_baseline() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    scene.apply_mix(1.0);
    let expected = SPHERE_RADIUS + 10.0;
    assert!(scene.spheres().iter().all(|s| s.scale == Vec3::splat(expected)));
    scene.apply_mix(0.0);
    assert!(scene.spheres().iter().all(|s| s.scale == Vec3::splat(SPHERE_RADIUS)));
    assert_eq!(scene.spheres()[0].scale.x, 5.2);
}

#[test]
fn output_updates_state_before_recomputing() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    scene.apply_output(-20.0);
    assert_eq!(scene.visual().output(), -20.0);
    assert!(scene.wave().amplitude() > 0.0);
    let life = scene.nebula_params().life_scale();
    assert!(scene
        .nebula()
        .emitters()
        .iter()
        .all(|e| e.life.life == life));

    scene.apply_output(-60.0);
    assert!(scene.visual().is_low());
    assert_eq!(scene.nebula_params().life_scale(), 0.2);
    assert_eq!(scene.nebula_params().speed_scale(), 0.2);
}

#[test]
fn width_and_damp_reach_the_controller() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    scene.apply_width(1.0);
    scene.apply_damp(0.9);
    assert_eq!(scene.visual().width(), 1.0);
    assert_eq!(scene.visual().damp(), 0.9);
    assert!(scene.nebula().emitters()[0].velocity.axis.x < 0.0);
}

#[test]
fn levels_ripple_wave_unless_bypassed() {
    let mut scene = AnimationController::new(&BackdropConfig::default());
    let flat: Vec<f32> = scene.wave().top().positions.iter().map(|p| p.y).collect();
    scene.set_bypass(true);
    scene.apply_levels(&vec![0.8; 512], 0.7);
    let still: Vec<f32> = scene.wave().top().positions.iter().map(|p| p.y).collect();
    assert_eq!(flat, still);

    scene.set_bypass(false);
    scene.apply_levels(&vec![0.8; 512], 0.7);
    let rippled: Vec<f32> = scene.wave().top().positions.iter().map(|p| p.y).collect();
    assert_ne!(flat, rippled);
}
