//! Arc geometry: elevated quadratic curves between two points on the globe.

use std::f32::consts::PI;
use glam::Vec3;
use crate::api::config::ArcSection;
use crate::api::types::AttackCategory;
use crate::core::geo::{self, GeoCoord};

/// Quadratic Bézier in the globe frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCurve {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl ArcCurve {
    pub fn new(start: Vec3, control: Vec3, end: Vec3) -> Self {
        Self { start, control, end }
    }

    /// Point at parameter `t`, clamped to [0, 1].
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// `segments + 1` evenly spaced points from start to end.
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }
}

/// Everything derived from an event's endpoints and intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPlan {
    pub curve: ArcCurve,
    /// Height of the control point above the surface.
    pub elevation: f32,
    /// Great-circle separation of the endpoints (radians).
    pub angle: f32,
    pub color: [f32; 3],
    pub particle_count: u32,
}

/// Fixed category palette. Unknown categories are green.
pub fn category_color(category: &AttackCategory) -> [f32; 3] {
    match category {
        AttackCategory::Dos => [1.0, 0.0, 0.0],
        AttackCategory::Malware => [1.0, 0.533, 0.0],
        AttackCategory::Phishing => [1.0, 1.0, 0.0],
        AttackCategory::Ransomware => [1.0, 0.0, 1.0],
        AttackCategory::SqlInjection => [0.0, 1.0, 1.0],
        AttackCategory::Other(_) => [0.0, 1.0, 0.0],
    }
}

/// Turns endpoint pairs into curves. Total: every input yields a curve.
#[derive(Debug, Clone)]
pub struct ArcBuilder {
    radius: f32,
    cfg: ArcSection,
}

impl ArcBuilder {
    pub fn new(radius: f32, cfg: &ArcSection) -> Self {
        Self { radius, cfg: cfg.clone() }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Control-point height for a given separation and intensity.
    /// Non-decreasing in both arguments.
    pub fn elevation(&self, angle: f32, intensity: u8) -> f32 {
        let a = (angle / PI).clamp(0.0, 1.0);
        self.cfg.base_altitude + self.cfg.distance_gain * a * a + self.cfg.intensity_gain * intensity as f32
    }

    pub fn particle_count(&self, intensity: u8) -> u32 {
        self.cfg.particle_base + self.cfg.particle_per_intensity * intensity as u32
    }

    pub fn build(&self, source: GeoCoord, target: GeoCoord, intensity: u8, category: &AttackCategory) -> ArcPlan {
        let start = geo::to_sphere(source, self.radius);
        let end = geo::to_sphere(target, self.radius);
        let angle = geo::angular_distance(start, end);
        let elevation = self.elevation(angle, intensity);

        let mid = (start + end) * 0.5;
        let dir = if mid.length_squared() > 1e-6 {
            mid.normalize()
        } else {
            // Antipodal endpoints: any direction perpendicular to both works.
            start.normalize_or_zero().any_orthonormal_vector()
        };
        let control = dir * (self.radius + elevation);

        ArcPlan {
            curve: ArcCurve::new(start, control, end),
            elevation,
            angle,
            color: category_color(category),
            particle_count: self.particle_count(intensity),
        }
    }
}
