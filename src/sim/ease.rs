//! Easing and interpolation primitives
//!
//! Pure functions over f32. Interpolation parameters are clamped to [0, 1]
//! unless the name says otherwise.

use glam::Vec3;

/// Linear interpolation with t clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Linear interpolation without clamping
#[inline]
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation with t running over [0, precision] instead of
/// [0, 1]. Maps integer counters onto a continuous range without a
/// separate normalization step.
#[inline]
pub fn lerp_scaled(a: f32, b: f32, t: f32, precision: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, precision) / precision
}

/// Normalized position of t between a and b, clamped to [0, 1].
/// Callers guarantee a != b.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, t: f32) -> f32 {
    ((t - a) / (b - a)).clamp(0.0, 1.0)
}

/// Wrap a value into [min, max] by shifting whole range-widths.
/// Returns the wrapped value and whether any wrapping occurred.
/// Callers guarantee max > min and a finite value.
pub fn rotate_clamp(value: f32, min: f32, max: f32) -> (f32, bool) {
    let range = max - min;
    let mut result = value;
    let mut wrapped = false;
    while result < min {
        result += range;
        wrapped = true;
    }
    while result > max {
        result -= range;
        wrapped = true;
    }
    (result, wrapped)
}

/// Distance between two scalars as a ratio of `max_distance`, saturating
/// at 1. `inverse` flips the ratio so closer pairs yield larger values.
/// A non-positive `max_distance` counts as maximally distant.
pub fn distance_multiplier(a: f32, b: f32, max_distance: f32, inverse: bool) -> f32 {
    let ratio = if max_distance > 0.0 {
        (a - b).abs().min(max_distance) / max_distance
    } else {
        1.0
    };
    if inverse { 1.0 - ratio } else { ratio }
}

/// Two-segment piecewise lerp: a -> b over [0, cutoff_ratio], then b -> c
/// over the remainder. Both segments agree at the breakpoint.
pub fn cutoff(ratio: f32, cutoff_ratio: f32, a: f32, b: f32, c: f32) -> f32 {
    if ratio <= cutoff_ratio {
        let t = if cutoff_ratio > 0.0 { ratio / cutoff_ratio } else { 1.0 };
        lerp(a, b, t)
    } else {
        lerp(b, c, (ratio - cutoff_ratio) / (1.0 - cutoff_ratio))
    }
}

/// Spread x in [min, max] into a signed magnitude in [-1, 1]: recenter to
/// [-1, 1], shape the magnitude with `curve`, restore the sign
pub fn distribute(x: f32, curve: impl Fn(f32) -> f32, min: f32, max: f32) -> f32 {
    let tilted = (inverse_lerp(min, max, x) - 0.5) * 2.0;
    curve(tilted.abs()) * tilted.signum()
}

/// Euclidean distance between two points with a synthetic depth axis
#[inline]
pub fn vector3_distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}
