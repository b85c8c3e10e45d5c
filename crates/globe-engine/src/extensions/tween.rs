// extensions/tween.rs
//
// Timed, eased progress driver used by every camera transition.
// Holds no target value: callers map the eased progress onto
// whatever path they are animating.
//
// Usage:
//   let mut t = Tween::new(1.5, Easing::CubicInOut);
//   let k = t.advance(dt);          // eased progress in [0, 1]
//   camera.position = path(k);
//   if t.is_complete() { ... }

use super::easing::Easing;

/// Minimum duration; zero-length tweens complete on their first advance.
const MIN_DURATION: f32 = 1e-4;

/// A single timed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time in seconds.
    pub elapsed: f32,
    /// Easing applied by `eased()`.
    pub easing: Easing,
}

impl Tween {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration: duration.max(MIN_DURATION),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds and return the eased progress.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.eased()
    }

    /// Raw normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Progress passed through the easing curve.
    pub fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    /// Progress of a sub-window `[from, to]` of this tween, renormalized to [0, 1].
    pub fn window(&self, from: f32, to: f32) -> f32 {
        if to <= from {
            return if self.progress() >= to { 1.0 } else { 0.0 };
        }
        ((self.progress() - from) / (to - from)).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}
