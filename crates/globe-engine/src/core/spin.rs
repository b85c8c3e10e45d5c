//! Globe rotation and the rotation compensator.
//!
//! Arcs, impacts and region anchors are defined in the unrotated globe frame.
//! Anything that must line up with them in world space (camera look-at, popup
//! anchor, region-focus vectors) goes through [`GlobeSpin::compensate`] every
//! frame. Caching a compensated point across frames shows up as drift.

use std::f32::consts::TAU;
use glam::{Mat4, Quat, Vec3};

/// Continuous spin of the globe about +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeSpin {
    /// Current angle in radians, kept in [0, TAU).
    angle: f32,
    /// Radians per second.
    pub speed: f32,
}

impl GlobeSpin {
    pub fn new(speed: f32) -> Self {
        Self { angle: 0.0, speed }
    }

    /// Advance the spin by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(TAU);
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.rem_euclid(TAU);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }

    /// Globe-frame point → current world-space point.
    #[inline]
    pub fn compensate(&self, point: Vec3) -> Vec3 {
        compensate(point, self.angle)
    }

    /// World-space point → globe frame.
    #[inline]
    pub fn inverse(&self, point: Vec3) -> Vec3 {
        compensate(point, -self.angle)
    }

    /// Model matrix the host applies to globe-frame geometry.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation())
    }
}

/// Rotate a globe-frame point by `angle` radians about the spin axis.
#[inline]
pub fn compensate(point: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * point
}
