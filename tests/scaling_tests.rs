// Host-side tests for the interpolation helpers every mapping is built on.

use nebula_backdrop::scaling::{linear, logarithmic};

#[test]
fn linear_hits_both_endpoints() {
    assert_eq!(linear(30.0, 80.0, 0.0), 30.0);
    assert_eq!(linear(30.0, 80.0, 1.0), 80.0);
    assert!((linear(0.5, 1.0, 0.5) - 0.75).abs() < 1e-6);
}

#[test]
fn linear_is_monotonic_and_extrapolates() {
    let mut prev = linear(4.0, 16.0, -0.5);
    for i in -4..15 {
        let t = i as f32 / 10.0;
        let v = linear(4.0, 16.0, t);
        assert!(v > prev, "not monotonic at t={t}");
        prev = v;
    }
    // Out-of-range t is allowed on purpose
    assert!(linear(4.0, 16.0, 1.5) > 16.0);
    assert!(linear(4.0, 16.0, -0.5) < 4.0);
}

#[test]
fn logarithmic_starts_at_min_and_rises() {
    assert_eq!(logarithmic(20.0, 80.0, 0.0, 2.0), 20.0);
    // ln(2)/ln(2) == 1 lands exactly on max
    assert!((logarithmic(20.0, 80.0, 1.0, 2.0) - 80.0).abs() < 1e-4);

    let mut prev = logarithmic(2.0, 12.0, -0.9, std::f32::consts::E);
    for i in 0..40 {
        let t = i as f32 * 0.25;
        let v = logarithmic(2.0, 12.0, t, std::f32::consts::E);
        assert!(v > prev, "not monotonic at t={t}");
        prev = v;
    }
}

#[test]
fn logarithmic_descending_range_goes_more_negative() {
    let base = std::f32::consts::E;
    let narrow = logarithmic(150.0, -600.0, 0.0, base);
    let wide = logarithmic(150.0, -600.0, 1.0, base);
    assert_eq!(narrow, 150.0);
    assert!(wide < narrow);
}

#[test]
#[should_panic]
fn logarithmic_rejects_t_at_minus_one() {
    logarithmic(0.0, 1.0, -1.0, 10.0);
}

#[test]
#[should_panic]
fn logarithmic_rejects_base_one() {
    logarithmic(0.0, 1.0, 0.5, 1.0);
}
