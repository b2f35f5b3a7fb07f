//! Linear and logarithmic interpolation used by every parameter mapping.
//!
//! Callers pick the curve: sizes are perceived roughly linearly, speeds and
//! loudness roughly logarithmically. Neither function clamps `t`; passing a
//! value outside 0..1 extrapolates.

/// `min + (max - min) * t`.
#[inline]
pub fn linear(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}

/// `min + (max - min) * ln(t + 1) / ln(base)`.
///
/// Panics when `t <= -1` or `base <= 1`; both indicate a broken mapping
/// constant rather than bad runtime input.
#[inline]
pub fn logarithmic(min: f32, max: f32, t: f32, base: f32) -> f32 {
    assert!(t > -1.0, "logarithmic scale needs t > -1, got {t}");
    assert!(base > 1.0, "logarithmic scale needs base > 1, got {base}");
    let log_scale = (t + 1.0).ln() / base.ln();
    min + (max - min) * log_scale
}
