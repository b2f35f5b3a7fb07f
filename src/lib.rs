//! Parameter-mapping and particle-emitter core for an audio-reactive reverb
//! backdrop.
//!
//! Telemetry from the audio engine (output level, room size, mix, width,
//! damping, freeze, frequency levels) flows through [`telemetry`] gates into
//! the [`animation::AnimationController`], which owns the control state, the
//! nebula emitters and the scene objects. Front-ends drive it once per
//! display refresh and render the [`animation::Frame`] it hands back.

pub mod animation;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod nebula_params;
pub mod nebula_system;
pub mod particle;
pub mod particle_wave;
pub mod scaling;
pub mod scene;
pub mod telemetry;
pub mod visual_params;

pub use animation::{AnimationController, Frame, FrameHost};
pub use config::{BackdropConfig, NebulaConfig, TelemetryTiming};
pub use error::BackdropError;
pub use nebula_params::{EmitterGroup, EmitterParams, NebulaParams};
pub use nebula_system::{CollisionStats, NebulaSystem};
pub use telemetry::{Gate, TelemetryEvent, TelemetryRouter};
pub use visual_params::{ControlState, OutputClass, VisualParams};
