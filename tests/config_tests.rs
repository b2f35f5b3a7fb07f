// Host-side tests for the mapping presets and JSON config loading.

use nebula_backdrop::{BackdropConfig, BackdropError, NebulaConfig, TelemetryTiming};
use std::time::Duration;

#[test]
fn both_presets_validate() {
    NebulaConfig::default().validate().expect("default preset");
    NebulaConfig::burnout().validate().expect("burnout preset");
}

#[test]
fn presets_differ_only_where_deployments_did() {
    let balanced = NebulaConfig::default();
    let burnout = NebulaConfig::burnout();
    assert_eq!((balanced.damping_pct, balanced.room_size_pct), (0.4, 0.6));
    assert_eq!((burnout.damping_pct, burnout.room_size_pct), (0.7, 0.3));
    assert_eq!(balanced.max_life, 16.0);
    assert_eq!(burnout.max_life, 10.0);
    assert_eq!(balanced.max_velocity, 250.0);
    assert_eq!(burnout.max_velocity, 220.0);
    assert!(!balanced.burnout_enabled);
    assert!(burnout.burnout_enabled);
    assert_eq!(balanced.min_speed, burnout.min_speed);
    assert_eq!(balanced.reflection_buffer, burnout.reflection_buffer);
}

#[test]
fn validate_rejects_broken_constants() {
    let bad_split = NebulaConfig {
        damping_pct: 0.5,
        room_size_pct: 0.7,
        ..NebulaConfig::default()
    };
    assert!(matches!(bad_split.validate(), Err(BackdropError::Config(_))));

    let bad_base = NebulaConfig {
        velocity_log_base: 1.0,
        ..NebulaConfig::default()
    };
    let err = bad_base.validate().expect_err("base of 1");
    assert!(err.to_string().contains("velocity_log_base"));

    let bad_ceiling = NebulaConfig {
        max_velocity: 0.0,
        ..NebulaConfig::default()
    };
    assert!(bad_ceiling.validate().is_err());
}

#[test]
fn telemetry_timing_defaults() {
    let timing = TelemetryTiming::default();
    assert_eq!(timing.throttle(), Duration::from_millis(33));
    assert_eq!(timing.slow_throttle(), Duration::from_millis(99));
    assert_eq!(timing.room_size_debounce(), Duration::from_millis(10));
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{
        "seed": 7,
        "nebula": { "max_life": 12.0, "velocity_log_base": 20.0 },
        "timing": { "room_size_debounce_ms": 25 }
    }"#;
    let config = BackdropConfig::from_json(json).expect("valid config");
    assert_eq!(config.seed, 7);
    assert_eq!(config.nebula.max_life, 12.0);
    assert_eq!(config.nebula.velocity_log_base, 20.0);
    assert_eq!(config.nebula.min_life, NebulaConfig::default().min_life);
    assert_eq!(config.timing.room_size_debounce_ms, 25);
    assert_eq!(config.timing.throttle_ms, 33);

    assert_eq!(BackdropConfig::from_json("{}").expect("empty"), BackdropConfig::default());
}

#[test]
fn json_round_trips_the_burnout_preset() {
    let config = BackdropConfig {
        nebula: NebulaConfig::burnout(),
        ..BackdropConfig::default()
    };
    let json = serde_json::to_string(&config).expect("serialize");
    assert_eq!(BackdropConfig::from_json(&json).expect("parse"), config);
}

#[test]
fn from_json_reports_decode_and_validation_errors() {
    assert!(matches!(
        BackdropConfig::from_json("{ nope"),
        Err(BackdropError::Decode { resource: "config", .. })
    ));
    assert!(matches!(
        BackdropConfig::from_json(r#"{"nebula": {"speed_log_base": 0.5}}"#),
        Err(BackdropError::Config(_))
    ));
}
