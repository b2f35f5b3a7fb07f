//! Current control values and the geometry scales derived from them.

use crate::constants::*;
use crate::scaling::{linear, logarithmic};

/// Raw control values as last delivered by the audio engine.
///
/// `size`, `mix`, `width` and `damp` are normalized 0..1; `output` is in dBFS
/// and usually negative.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlState {
    pub output: f32,
    pub size: f32,
    pub mix: f32,
    pub width: f32,
    pub damp: f32,
    pub is_frozen: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            output: 0.0,
            size: 0.5,
            mix: 0.5,
            width: 0.5,
            damp: 0.5,
            is_frozen: false,
        }
    }
}

/// Loudness classification of the latest output sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputClass {
    pub is_loud: bool,
    pub is_low: bool,
}

impl OutputClass {
    /// Freeze suppresses "low" so a frozen tail does not collapse the visuals.
    pub fn classify(output_db: f32, is_frozen: bool) -> Self {
        Self {
            is_loud: output_db > LOUD_OUTPUT_DB,
            is_low: output_db <= LOW_OUTPUT_DB && !is_frozen,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VisualParams {
    state: ControlState,
    class: OutputClass,
}

impl VisualParams {
    pub fn new(state: ControlState) -> Self {
        let class = OutputClass::classify(state.output, state.is_frozen);
        Self { state, class }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn output(&self) -> f32 {
        self.state.output
    }
    pub fn set_output(&mut self, output_db: f32) {
        self.state.output = output_db;
    }

    pub fn size(&self) -> f32 {
        self.state.size
    }
    pub fn set_size(&mut self, size: f32) {
        self.state.size = size.clamp(0.0, 1.0);
    }

    pub fn mix(&self) -> f32 {
        self.state.mix
    }
    pub fn set_mix(&mut self, mix: f32) {
        self.state.mix = mix.clamp(0.0, 1.0);
    }

    pub fn width(&self) -> f32 {
        self.state.width
    }
    pub fn set_width(&mut self, width: f32) {
        self.state.width = width.clamp(0.0, 1.0);
    }

    pub fn damp(&self) -> f32 {
        self.state.damp
    }
    pub fn set_damp(&mut self, damp: f32) {
        self.state.damp = damp.clamp(0.0, 1.0);
    }

    pub fn is_frozen(&self) -> bool {
        self.state.is_frozen
    }
    /// Also reclassifies the stored output so `is_low` never survives a freeze.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.state.is_frozen = frozen;
        self.class = OutputClass::classify(self.state.output, frozen);
    }

    pub fn is_loud(&self) -> bool {
        self.class.is_loud
    }
    pub fn is_low(&self) -> bool {
        self.class.is_low
    }

    /// Classifies `output_db`, then attenuates loud output.
    ///
    /// dB values are negative, so multiplying a loud level makes it "quieter"
    /// for the wave amplitude mapping, which otherwise overshoots on masters
    /// at modern loudness.
    pub fn calculate_output(&mut self, output_db: f32) -> f32 {
        self.class = OutputClass::classify(output_db, self.state.is_frozen);
        if self.class.is_loud {
            LOUD_OUTPUT_FACTOR * output_db
        } else {
            output_db
        }
    }

    pub fn cube_scale(&self) -> f32 {
        linear(MIN_CUBE_SCALE, MAX_CUBE_SCALE, self.state.size)
    }

    pub fn sphere_scale(&self) -> f32 {
        logarithmic(
            MIN_SPHERE_SCALE,
            MAX_SPHERE_SCALE,
            self.state.size,
            SPHERE_SCALE_LOG_BASE,
        )
    }
}
