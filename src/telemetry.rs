//! Telemetry from the audio engine: payload decoding and rate gating.
//!
//! Each parameter arrives as an independent event. Room size is debounced
//! because it flushes every particle; everything else is throttled on the
//! leading edge so the emitters stay responsive without being reconfigured
//! faster than the frame rate.

use crate::animation::AnimationController;
use crate::config::TelemetryTiming;
use crate::constants::{LEVELS_MIN_OSCILLATION, LEVELS_REDUCTION_EXP};
use crate::error::BackdropError;
use instant::Instant;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum TelemetryEvent {
    OutputLevel(f32),
    RoomSize(f32),
    Mix(f32),
    Width(f32),
    Damp(f32),
    Freeze(bool),
    Levels(Vec<f32>),
}

#[derive(Deserialize)]
struct OutputLevelPayload {
    left: f32,
}

#[derive(Deserialize)]
struct RoomSizePayload {
    #[serde(rename = "roomSize")]
    room_size: f32,
}

#[derive(Deserialize)]
struct MixPayload {
    mix: f32,
}

#[derive(Deserialize)]
struct WidthPayload {
    width: f32,
}

#[derive(Deserialize)]
struct DampPayload {
    damp: f32,
}

/// The backend reports freeze either as a flag or as a normalized float.
#[derive(Deserialize)]
#[serde(untagged)]
enum FreezeValue {
    Flag(bool),
    Level(f32),
}

#[derive(Deserialize)]
struct FreezePayload {
    freeze: FreezeValue,
}

#[derive(Deserialize)]
struct LevelsPayload {
    levels: Vec<f32>,
}

fn parse<'a, T: Deserialize<'a>>(resource: &'static str, json: &'a str) -> Result<T, BackdropError> {
    serde_json::from_str(json).map_err(|source| BackdropError::Decode { resource, source })
}

impl TelemetryEvent {
    /// Decodes the JSON body of a backend resource such as `roomSize.json`.
    pub fn decode(resource: &str, json: &str) -> Result<Self, BackdropError> {
        let name = resource.strip_suffix(".json").unwrap_or(resource);
        let event = match name {
            "outputLevel" => {
                TelemetryEvent::OutputLevel(parse::<OutputLevelPayload>("outputLevel", json)?.left)
            }
            "roomSize" => TelemetryEvent::RoomSize(parse::<RoomSizePayload>("roomSize", json)?.room_size),
            "mix" => TelemetryEvent::Mix(parse::<MixPayload>("mix", json)?.mix),
            "width" => TelemetryEvent::Width(parse::<WidthPayload>("width", json)?.width),
            "damp" => TelemetryEvent::Damp(parse::<DampPayload>("damp", json)?.damp),
            "freeze" => {
                let frozen = match parse::<FreezePayload>("freeze", json)?.freeze {
                    FreezeValue::Flag(flag) => flag,
                    FreezeValue::Level(level) => level >= 0.5,
                };
                TelemetryEvent::Freeze(frozen)
            }
            "levels" => TelemetryEvent::Levels(parse::<LevelsPayload>("levels", json)?.levels),
            other => return Err(BackdropError::UnknownResource(other.to_string())),
        };
        Ok(event)
    }
}

/// Leading-edge throttle: the first call in a window passes, the rest of
/// the window is dropped.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Trailing-edge debounce: the latest value fires once input has been quiet
/// for `wait`.
#[derive(Clone, Debug)]
pub struct Debounce<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.wait => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }
}

/// What happened to a telemetry event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Applied,
    /// Held by the debounce; fires from [`TelemetryRouter::poll`].
    Deferred,
    /// Inside a throttle window.
    Dropped,
    /// Same as the current value.
    Unchanged,
    /// Payload could not be decoded.
    Rejected,
}

/// Routes gated telemetry into the scene controller.
pub struct TelemetryRouter {
    output: Throttle,
    levels: Throttle,
    mix: Throttle,
    width: Throttle,
    damp: Throttle,
    freeze: Throttle,
    room_size: Debounce<f32>,
    level_phase: f32,
}

impl TelemetryRouter {
    pub fn new(timing: &TelemetryTiming) -> Self {
        Self {
            output: Throttle::new(timing.throttle()),
            levels: Throttle::new(timing.throttle()),
            mix: Throttle::new(timing.slow_throttle()),
            width: Throttle::new(timing.slow_throttle()),
            damp: Throttle::new(timing.slow_throttle()),
            freeze: Throttle::new(timing.slow_throttle()),
            room_size: Debounce::new(timing.room_size_debounce()),
            level_phase: 0.0,
        }
    }

    /// Accumulated phase driving the wave sines.
    pub fn level_phase(&self) -> f32 {
        self.level_phase
    }

    /// Decodes and dispatches a raw resource body. Bad payloads are logged
    /// and leave the control state untouched.
    pub fn receive(
        &mut self,
        resource: &str,
        json: &str,
        now: Instant,
        scene: &mut AnimationController,
    ) -> Gate {
        match TelemetryEvent::decode(resource, json) {
            Ok(event) => self.dispatch(event, now, scene),
            Err(e) => {
                log::warn!("[telemetry] {e}");
                Gate::Rejected
            }
        }
    }

    pub fn dispatch(
        &mut self,
        event: TelemetryEvent,
        now: Instant,
        scene: &mut AnimationController,
    ) -> Gate {
        match event {
            TelemetryEvent::OutputLevel(db) => {
                if !self.output.admit(now) {
                    return Gate::Dropped;
                }
                scene.apply_output(db);
            }
            TelemetryEvent::RoomSize(size) => {
                let size = size.clamp(0.0, 1.0);
                let reference = self.room_size.pending().copied().unwrap_or(scene.visual().size());
                if size == reference {
                    return Gate::Unchanged;
                }
                self.room_size.push(size, now);
                return Gate::Deferred;
            }
            TelemetryEvent::Mix(mix) => {
                let mix = mix.clamp(0.0, 1.0);
                if mix == scene.visual().mix() {
                    return Gate::Unchanged;
                }
                if !self.mix.admit(now) {
                    return Gate::Dropped;
                }
                scene.apply_mix(mix);
            }
            TelemetryEvent::Width(width) => {
                let width = width.clamp(0.0, 1.0);
                if width == scene.visual().width() {
                    return Gate::Unchanged;
                }
                if !self.width.admit(now) {
                    return Gate::Dropped;
                }
                scene.apply_width(width);
            }
            TelemetryEvent::Damp(damp) => {
                let damp = damp.clamp(0.0, 1.0);
                if damp == scene.visual().damp() {
                    return Gate::Unchanged;
                }
                if !self.damp.admit(now) {
                    return Gate::Dropped;
                }
                scene.apply_damp(damp);
            }
            TelemetryEvent::Freeze(frozen) => {
                if frozen == scene.visual().is_frozen() {
                    return Gate::Unchanged;
                }
                if !self.freeze.admit(now) {
                    return Gate::Dropped;
                }
                scene.apply_freeze(frozen);
            }
            TelemetryEvent::Levels(levels) => {
                if !self.levels.admit(now) {
                    return Gate::Dropped;
                }
                if scene.is_bypassed() {
                    return Gate::Applied;
                }
                let max_level = levels.iter().copied().fold(0.0_f32, f32::max);
                self.level_phase +=
                    LEVELS_MIN_OSCILLATION + max_level.clamp(0.0, 1.0).powf(LEVELS_REDUCTION_EXP);
                scene.apply_levels(&levels, self.level_phase);
            }
        }
        Gate::Applied
    }

    /// Fires a debounced room-size change once input has gone quiet. A
    /// wiggle that settles back on the current size is dropped, since
    /// applying it would flush every particle for nothing.
    pub fn poll(&mut self, now: Instant, scene: &mut AnimationController) -> bool {
        match self.room_size.poll(now) {
            Some(size) if size == scene.visual().size() => {
                log::debug!("[telemetry] room size settled unchanged at {size}");
                false
            }
            Some(size) => {
                scene.apply_room_size(size);
                true
            }
            None => false,
        }
    }
}
