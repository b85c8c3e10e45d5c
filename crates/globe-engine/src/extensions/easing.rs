// extensions/easing.rs
//
// Pure easing curves for camera paths and effect fades.
// No dependencies on the globe context, just math.

use std::f32::consts::PI;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing curve selector. Config files name these in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Fast start.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger fast start.
    CubicOut,
    /// Stronger slow start and end.
    CubicInOut,
    /// Very strong fast start. Used for impact decay.
    QuartOut,
    SineInOut,
    ExpoOut,
}

impl Easing {
    /// Apply the curve to `t`. Input is clamped to [0, 1], so every curve is total.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two points.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate a point with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    lerp_vec3(a, b, easing.apply(t))
}

/// Piecewise-linear path through three points: `t < 0.5` walks a→b,
/// the rest walks b→c. `t` is clamped.
#[inline]
pub fn two_segment(a: Vec3, b: Vec3, c: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp_vec3(a, b, t * 2.0)
    } else {
        lerp_vec3(b, c, (t - 0.5) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hold_for_every_curve() {
        let all = [
            Easing::Linear, Easing::QuadOut, Easing::QuadInOut, Easing::CubicOut,
            Easing::CubicInOut, Easing::QuartOut, Easing::SineInOut, Easing::ExpoOut,
        ];
        for e in all {
            assert!(e.apply(0.0).abs() < 1e-3, "{:?} at 0", e);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-3, "{:?} at 1", e);
        }
    }

    #[test]
    fn inputs_outside_unit_range_are_clamped() {
        assert_eq!(Easing::CubicInOut.apply(-3.0), 0.0);
        assert_eq!(Easing::CubicInOut.apply(7.0), 1.0);
        assert_eq!(Easing::QuartOut.apply(f32::NAN), 0.0);
    }

    #[test]
    fn quart_out_front_loads() {
        let mid = Easing::QuartOut.apply(0.5);
        assert!(mid > 0.9, "QuartOut at 0.5 should be > 0.9, got {}", mid);
    }

    #[test]
    fn two_segment_passes_through_middle() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 10.0, 0.0);
        let c = Vec3::new(10.0, 10.0, 0.0);
        assert_eq!(two_segment(a, b, c, 0.5), b);
        assert_eq!(two_segment(a, b, c, 1.0), c);
        assert!((two_segment(a, b, c, 0.25) - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn easing_parses_from_config_name() {
        let e: Easing = serde_json::from_str("\"cubic_in_out\"").unwrap();
        assert_eq!(e, Easing::CubicInOut);
    }
}
