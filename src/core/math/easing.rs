//! Easing & interpolation kernel
//!
//! Pure functions shared by every pattern so that all modes fade with the same
//! vocabulary. Inputs are clamped; outputs for identical inputs are identical.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// Opacity / blend curve over normalized `t` in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in (t²)
    EaseIn,
    /// Quadratic ease-out
    EaseOut,
    /// Cubic smooth-step
    EaseInOut,
}

impl Easing {
    #[inline]
    pub fn ease(self, t: f32) -> f32 {
        let t = clamp_unit(t);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Clamp to [0, 1]; NaN collapses to 0
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Opacity of item `index` in a run of `count`, the last item fully opaque.
///
/// Index 0 is the dimmest. A zero count yields full opacity.
#[inline]
pub fn sequence_opacity(index: usize, count: usize, easing: Easing) -> f32 {
    if count == 0 {
        return 1.0;
    }
    easing.ease((index + 1) as f32 / count as f32)
}

/// Quadratic fade used at the end of a transient particle's life.
///
/// `remaining` is life left as a fraction of initial life, `window` the final
/// fraction over which the fade happens.
#[inline]
pub fn tail_fade(remaining: f32, window: f32) -> f32 {
    if window <= 0.0 {
        return if remaining > 0.0 { 1.0 } else { 0.0 };
    }
    let t = clamp_unit(remaining / window);
    t * t
}

/// `0.5 + 0.5·sin(x)`, the oscillation shared by twinkle and pulse kernels
#[inline]
pub fn oscillate(x: f32) -> f32 {
    0.5 + 0.5 * x.sin()
}

#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

/// User-facing spread in degrees to radians, limited to a full turn
#[inline]
pub fn spread_to_radians(degrees: f32) -> f32 {
    deg_to_rad(degrees.abs()).min(TAU)
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
