//! Polyline generation for trails and impact rings.

use std::f32::consts::TAU;
use glam::Vec3;
use super::instance::{LineVertex, RenderBuffer};

/// Segments used for one impact ring.
pub const RING_SEGMENTS: usize = 32;

/// Two unit vectors spanning the plane perpendicular to `normal`.
pub fn tangent_basis(normal: Vec3) -> (Vec3, Vec3) {
    let n = normal.normalize_or_zero();
    if n == Vec3::ZERO {
        return (Vec3::X, Vec3::Z);
    }
    // Pick the helper axis least aligned with the normal.
    let helper = if n.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    let u = helper.cross(n).normalize();
    let v = n.cross(u);
    (u, v)
}

/// Circle of `radius` around `center`, lying on the tangent plane of `normal`.
/// The first point is repeated at the end so the polyline closes.
pub fn ring_points(center: Vec3, normal: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(3);
    let (u, v) = tangent_basis(normal);
    (0..=segments)
        .map(|i| {
            let a = TAU * i as f32 / segments as f32;
            center + (u * a.cos() + v * a.sin()) * radius
        })
        .collect()
}

/// Append a polyline to the buffer as a segment list.
pub fn push_polyline(
    buffer: &mut RenderBuffer,
    points: &[Vec3],
    color: [f32; 3],
    alpha: f32,
    width: f32,
) {
    for pair in points.windows(2) {
        buffer.push_segment(
            LineVertex::new(pair[0], color, alpha, width),
            LineVertex::new(pair[1], color, alpha, width),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        for n in [Vec3::X, Vec3::Y, Vec3::new(1.0, 2.0, -3.0), Vec3::NEG_Y] {
            let (u, v) = tangent_basis(n);
            let n = n.normalize();
            assert!(u.dot(n).abs() < 1e-5);
            assert!(v.dot(n).abs() < 1e-5);
            assert!(u.dot(v).abs() < 1e-5);
            assert!((u.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn ring_is_closed_and_round() {
        let center = Vec3::new(0.0, 100.0, 0.0);
        let pts = ring_points(center, Vec3::Y, 5.0, 16);
        assert_eq!(pts.len(), 17);
        assert!((pts[0] - pts[16]).length() < 1e-4);
        for p in &pts {
            assert!(((*p - center).length() - 5.0).abs() < 1e-4);
            assert!((p.y - 100.0).abs() < 1e-4);
        }
    }

    #[test]
    fn polyline_emits_one_segment_per_pair() {
        let mut buf = RenderBuffer::new();
        push_polyline(&mut buf, &[Vec3::ZERO, Vec3::X, Vec3::Y], [1.0; 3], 1.0, 1.0);
        assert_eq!(buf.line_vertex_count(), 4);
        push_polyline(&mut buf, &[Vec3::ZERO], [1.0; 3], 1.0, 1.0);
        assert_eq!(buf.line_vertex_count(), 4);
    }
}
