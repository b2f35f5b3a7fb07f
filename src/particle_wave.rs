//! Sine-wave particle grid: two sheets of points above and below the room
//! whose height ripples with the frequency levels.

use crate::scaling::logarithmic;
use glam::Vec3;
use std::collections::VecDeque;

pub const SEPARATION: f32 = 56.0;
pub const SEPARATION_FLOOR: f32 = 30.0;
pub const AMOUNT_X: usize = 32;
pub const AMOUNT_Y: usize = 16;
pub const NUM_POINTS: usize = AMOUNT_X * AMOUNT_Y;
pub const WAVE_X: f32 = 50.0;
pub const WAVE_Y_TOP: f32 = 500.0;
pub const WAVE_Y_BOTTOM: f32 = -500.0;
pub const WAVE_Z: f32 = 50.0;
pub const MAX_AMPS: usize = 5;

const MIN_AMP: f32 = 4.0;
const MAX_AMP: f32 = 16.0;
const LEVEL_SMOOTHING: f32 = 0.8;
const LEVEL_GAIN: f32 = 0.1;
const MIN_FLOOR: f32 = 8.0;

#[derive(Clone, Debug)]
pub struct WaveSheet {
    pub origin: Vec3,
    pub positions: Vec<Vec3>,
    pub scales: Vec<f32>,
    pub colors: Vec<[f32; 3]>,
}

impl WaveSheet {
    fn new(origin: Vec3, separation: f32) -> Self {
        let mut sheet = Self {
            origin,
            positions: vec![Vec3::ZERO; NUM_POINTS],
            scales: vec![1.0; NUM_POINTS],
            colors: vec![[1.0, 1.0, 1.0]; NUM_POINTS],
        };
        sheet.lay_out(separation);
        sheet
    }

    /// Flat grid centred on the origin, column-major (x outer, z inner).
    fn lay_out(&mut self, separation: f32) {
        let half_x = AMOUNT_X as f32 * separation / 2.0;
        let half_z = AMOUNT_Y as f32 * separation / 2.0;
        for ix in 0..AMOUNT_X {
            for iy in 0..AMOUNT_Y {
                let i = ix * AMOUNT_Y + iy;
                self.positions[i] = Vec3::new(
                    self.origin.x + ix as f32 * separation - half_x,
                    self.origin.y,
                    self.origin.z + iy as f32 * separation - half_z,
                );
                self.colors[i] = [1.0, 1.0, 1.0];
                self.scales[i] = 1.0;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParticleWave {
    top: WaveSheet,
    bottom: WaveSheet,
    separation: f32,
    amplitude: f32,
    amp_queue: VecDeque<f32>,
    smoothed_levels: Vec<f32>,
}

impl Default for ParticleWave {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleWave {
    pub fn new() -> Self {
        Self {
            top: WaveSheet::new(Vec3::new(WAVE_X, WAVE_Y_TOP, WAVE_Z), SEPARATION),
            bottom: WaveSheet::new(Vec3::new(WAVE_X, WAVE_Y_BOTTOM, WAVE_Z), SEPARATION),
            separation: SEPARATION,
            amplitude: 0.0,
            amp_queue: VecDeque::with_capacity(MAX_AMPS + 1),
            smoothed_levels: Vec::new(),
        }
    }

    pub fn top(&self) -> &WaveSheet {
        &self.top
    }

    pub fn bottom(&self) -> &WaveSheet {
        &self.bottom
    }

    pub fn current_separation(&self) -> f32 {
        self.separation
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn scale_particle_separation(&mut self, room_size: f32) {
        self.separation = SEPARATION_FLOOR + SEPARATION * room_size;
        self.top.lay_out(self.separation);
        self.bottom.lay_out(self.separation);
    }

    /// Louder output (closer to 0 dB) gives a larger multiplier and so a
    /// larger amplitude.
    pub fn calculate_sine_wave_amplitude(&mut self, output_db: f32) -> f32 {
        let converted = -output_db;
        let multiplier = if converted > 0.0 {
            self.separation / converted
        } else {
            self.separation
        };
        self.amplitude = logarithmic(MIN_AMP, MAX_AMP, multiplier, std::f32::consts::E);
        self.amplitude
    }

    pub fn update_amp_queue(&mut self, amplitude: f32) {
        self.amp_queue.push_back(amplitude);
        while self.amp_queue.len() > MAX_AMPS {
            self.amp_queue.pop_front();
        }
    }

    pub fn average_amplitude(&self) -> f32 {
        if self.amp_queue.is_empty() {
            return 0.0;
        }
        self.amp_queue.iter().sum::<f32>() / self.amp_queue.len() as f32
    }

    /// Ripples both sheets from the latest frequency levels. `count` is the
    /// accumulated phase driving the sines.
    pub fn animate_particles(&mut self, levels: &[f32], count: f32) {
        if self.smoothed_levels.len() != NUM_POINTS {
            self.smoothed_levels = vec![0.0; NUM_POINTS];
            for (s, l) in self.smoothed_levels.iter_mut().zip(levels) {
                *s = *l;
            }
        }

        let avg_amp = self.average_amplitude();
        for (i, s) in self.smoothed_levels.iter_mut().enumerate() {
            let level = levels.get(i).copied().unwrap_or(0.0);
            *s = *s * LEVEL_SMOOTHING + level * LEVEL_GAIN;
        }

        let floor = MIN_FLOOR + avg_amp.max(0.0).sqrt();
        for sheet in [&mut self.top, &mut self.bottom] {
            for ix in 0..AMOUNT_X {
                let freq_position = ix as f32 / (AMOUNT_X - 1) as f32;
                let hue = 180.0 * freq_position;
                for iy in 0..AMOUNT_Y {
                    let i = ix * AMOUNT_Y + iy;
                    let smoothed = self.smoothed_levels[i].max(0.0);
                    let linear_scale = ix as f32 / AMOUNT_X as f32;
                    let level_scale =
                        smoothed.powf(1.0 / std::f32::consts::E) * 0.8 * self.separation;
                    let multiplier = floor + linear_scale + level_scale;

                    sheet.positions[i].y = sheet.origin.y
                        + multiplier * (ix as f32 + count).sin()
                        + multiplier * (iy as f32 + count).sin();
                    sheet.scales[i] = multiplier + avg_amp.max(0.0).sqrt();

                    let lightness = (20.0 + 40.0 * smoothed) / 100.0;
                    sheet.colors[i] = hsl_to_rgb(hue / 360.0, 1.0, lightness.min(1.0));
                }
            }
        }
    }
}

/// HSL (all components 0..1) to RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
