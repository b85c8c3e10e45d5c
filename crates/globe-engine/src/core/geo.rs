//! Geographic projection onto the globe sphere.
//!
//! Globe frame: +Y is the spin axis (north pole) and (lat 0, lng 0) lands on +X.
//! The 180° longitude offset matches the seam of the equirectangular earth
//! texture the host wraps around the sphere.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f32,
    pub lng: f32,
}

impl GeoCoord {
    pub fn new(lat: f32, lng: f32) -> Self {
        Self { lat, lng }
    }
}

/// Map (latitude, longitude) to a point on a sphere of `radius`.
pub fn to_sphere(coord: GeoCoord, radius: f32) -> Vec3 {
    let phi = (90.0 - coord.lat).to_radians();
    let theta = (coord.lng + 180.0).to_radians();
    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`to_sphere`]. Longitude is wrapped into [-180, 180).
/// The origin maps to (0, 0).
pub fn from_sphere(point: Vec3) -> GeoCoord {
    let r = point.length();
    if r < 1e-6 {
        return GeoCoord::new(0.0, 0.0);
    }
    let phi = (point.y / r).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(-point.x);
    let mut lng = theta.to_degrees() - 180.0;
    if lng < -180.0 {
        lng += 360.0;
    }
    if lng >= 180.0 {
        lng -= 360.0;
    }
    GeoCoord::new(90.0 - phi.to_degrees(), lng)
}

/// Great-circle separation in radians between two points (any radius).
pub fn angular_distance(a: Vec3, b: Vec3) -> f32 {
    let (na, nb) = (a.normalize_or_zero(), b.normalize_or_zero());
    na.dot(nb).clamp(-1.0, 1.0).acos()
}
