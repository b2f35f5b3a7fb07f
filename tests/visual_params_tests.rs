// Host-side tests for control-state classification and geometry scales.

use nebula_backdrop::scaling::logarithmic;
use nebula_backdrop::{ControlState, NebulaConfig, NebulaParams, OutputClass, VisualParams};

fn state(output: f32, size: f32, damp: f32, frozen: bool) -> ControlState {
    ControlState {
        output,
        size,
        damp,
        is_frozen: frozen,
        ..ControlState::default()
    }
}

#[test]
fn balanced_state_scales_cube_and_spheres() {
    let visual = VisualParams::new(ControlState {
        output: -20.0,
        size: 0.5,
        mix: 0.5,
        width: 0.5,
        damp: 0.5,
        is_frozen: false,
    });
    assert!((visual.cube_scale() - 0.75).abs() < 1e-6);
    let expected = logarithmic(0.5, 1.5, 0.5, 10.0);
    assert!((visual.sphere_scale() - expected).abs() < 1e-6);
    assert!((visual.sphere_scale() - 0.676).abs() < 1e-3);
    assert!(!visual.is_low());
    assert!(!visual.is_loud());
}

#[test]
fn low_output_pins_life_and_speed_to_defaults() {
    let params = NebulaParams::new(NebulaConfig::default());
    for (size, damp) in [(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.2, 0.9)] {
        let mut visual = VisualParams::new(state(0.0, size, damp, false));
        visual.calculate_output(-55.0);
        assert!(visual.is_low());
        assert_eq!(params.calculate_life_scale(&visual, 1.0), 0.2);
        assert_eq!(params.calculate_life_scale(&visual, 3.7), 0.2);
        assert_eq!(params.calculate_speed_scale(&visual, 12.0), 0.2);
    }
}

#[test]
fn freeze_suppresses_low_classification() {
    assert!(OutputClass::classify(-50.0, false).is_low);
    assert!(!OutputClass::classify(-50.0, true).is_low);
    assert!(!OutputClass::classify(-90.0, true).is_low);

    let mut visual = VisualParams::new(state(-70.0, 0.5, 0.5, false));
    assert!(visual.is_low());
    visual.set_frozen(true);
    assert!(!visual.is_low());
    visual.set_frozen(false);
    assert!(visual.is_low());
}

#[test]
fn loud_output_is_attenuated() {
    let mut visual = VisualParams::default();
    let out = visual.calculate_output(-6.0);
    assert!(visual.is_loud());
    assert_eq!(out, -36.0);

    let out = visual.calculate_output(-30.0);
    assert!(!visual.is_loud());
    assert!(!visual.is_low());
    assert_eq!(out, -30.0);
}

#[test]
fn setters_clamp_normalized_controls() {
    let mut visual = VisualParams::default();
    visual.set_size(1.4);
    visual.set_mix(-0.2);
    visual.set_width(2.0);
    visual.set_damp(-1.0);
    assert_eq!(visual.size(), 1.0);
    assert_eq!(visual.mix(), 0.0);
    assert_eq!(visual.width(), 1.0);
    assert_eq!(visual.damp(), 0.0);
}

#[test]
fn cube_scale_spans_half_to_full() {
    let small = VisualParams::new(state(0.0, 0.0, 0.5, false));
    let large = VisualParams::new(state(0.0, 1.0, 0.5, false));
    assert_eq!(small.cube_scale(), 0.5);
    assert_eq!(large.cube_scale(), 1.0);
    assert_eq!(small.sphere_scale(), 0.5);
    assert!(large.sphere_scale() > small.sphere_scale());
}
