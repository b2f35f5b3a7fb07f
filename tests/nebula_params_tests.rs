// Host-side tests for the emitter parameter mapping.

use nebula_backdrop::scaling::linear;
use nebula_backdrop::{ControlState, EmitterGroup, NebulaConfig, NebulaParams, VisualParams};

fn visual_with(size: f32, damp: f32, width: f32) -> VisualParams {
    VisualParams::new(ControlState {
        output: -20.0,
        size,
        damp,
        width,
        ..ControlState::default()
    })
}

#[test]
fn groups_split_at_index_two() {
    assert_eq!(EmitterGroup::of(0), EmitterGroup::Left);
    assert_eq!(EmitterGroup::of(1), EmitterGroup::Left);
    assert_eq!(EmitterGroup::of(2), EmitterGroup::Right);
    assert_eq!(EmitterGroup::of(3), EmitterGroup::Right);
}

#[test]
fn force_is_mirrored_between_groups() {
    let mut params = NebulaParams::new(NebulaConfig::default());
    params.set_speed_scale(42.0);
    let left = params.force_vector(0);
    let right = params.force_vector(2);
    assert_eq!(left.x, -right.x);
    assert!(left.x < 0.0);
    assert_eq!(left.y, right.y);
    assert_eq!(left.z, right.z);

    let base = params.base_force();
    assert!((left.y - 0.4 * base).abs() < 1e-5);
    assert!((left.z - base).abs() < 1e-5);
    assert_eq!(params.force_vector(1), left);
    assert_eq!(params.force_vector(3), right);
}

#[test]
fn force_follows_current_speed() {
    let mut params = NebulaParams::new(NebulaConfig::default());
    params.set_speed_scale(20.0);
    let slow = params.base_force();
    params.set_speed_scale(80.0);
    assert!(params.base_force() > slow);
}

#[test]
fn wider_image_pulls_groups_apart() {
    let params = NebulaParams::new(NebulaConfig::default());
    let narrow = visual_with(0.5, 0.5, 0.0);
    let wide = visual_with(0.5, 0.5, 1.0);

    let left_narrow = params.velocity_axis(&narrow, 0);
    let left_wide = params.velocity_axis(&wide, 0);
    assert_eq!(left_narrow.x, 150.0);
    assert!(left_wide.x < left_narrow.x);
    assert!(left_wide.x < 0.0);

    let right_narrow = params.velocity_axis(&narrow, 3);
    let right_wide = params.velocity_axis(&wide, 3);
    assert!(right_wide.x > right_narrow.x);

    assert_eq!((left_wide.y, left_wide.z), (-100.0, 10.0));
    assert_eq!((right_wide.y, right_wide.z), (100.0, 10.0));
}

#[test]
fn life_blends_damping_and_room_size() {
    let config = NebulaConfig::default();
    let params = NebulaParams::new(config.clone());
    let visual = visual_with(0.8, 0.3, 0.5);
    let expected = linear(
        config.min_life,
        config.max_life,
        config.damping_pct * 0.7 + config.room_size_pct * 0.8,
    );
    assert!((params.calculate_life_scale(&visual, 1.0) - expected).abs() < 1e-5);

    // Same inputs under the burnout preset weigh damping more
    let burnout = NebulaParams::new(NebulaConfig::burnout());
    let dry = visual_with(0.8, 0.0, 0.5);
    let wet = visual_with(0.8, 1.0, 0.5);
    let spread = burnout.calculate_life_scale(&dry, 1.0) - burnout.calculate_life_scale(&wet, 1.0);
    let default_spread = params.calculate_life_scale(&dry, 1.0) - params.calculate_life_scale(&wet, 1.0);
    assert!(spread > 0.0);
    assert!(default_spread > 0.0);
}

#[test]
fn radius_and_drift_track_room_size() {
    let params = NebulaParams::new(NebulaConfig::default());
    let small = visual_with(0.0, 0.5, 0.5);
    let large = visual_with(1.0, 0.5, 0.5);
    assert_eq!(params.calculate_radius(&small), 30.0);
    assert_eq!(params.calculate_radius(&large), 80.0);

    let d0 = params.drift_vector(&small);
    let d1 = params.drift_vector(&large);
    assert_eq!(d0.to_array(), [30.0, 50.0, 50.0]);
    assert_eq!(d1.to_array(), [100.0, 150.0, 200.0]);
}

#[test]
fn quieter_output_pulls_life_scale_toward_one() {
    let params = NebulaParams::new(NebulaConfig::default());
    let amplitude = 12.0;
    let quiet = params.output_life_scale(amplitude, -60.0);
    let loud = params.output_life_scale(amplitude, -2.0);
    assert!(quiet >= 1.0);
    assert!(loud > quiet);
    // At or above 0 dB the coupling collapses to 1
    assert_eq!(params.output_life_scale(amplitude, 0.0), 1.0);
    assert_eq!(params.output_life_scale(amplitude, 3.0), 1.0);
}

#[test]
fn snapshot_reflects_cached_scales() {
    let mut params = NebulaParams::new(NebulaConfig::default());
    params.set_life_scale(9.0);
    params.set_speed_scale(33.0);
    params.set_radius_scale(55.0);
    let visual = visual_with(0.5, 0.5, 0.5);
    let snap = params.emitter_params(&visual, 2);
    assert_eq!(snap.life_scale, 9.0);
    assert_eq!(snap.speed_scale, 33.0);
    assert_eq!(snap.radius_scale, 55.0);
    assert_eq!(snap.force, params.force_vector(2));
    assert_eq!(snap.velocity_axis, params.velocity_axis(&visual, 2));
}
