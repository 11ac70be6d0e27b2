//! Pure 2D geometry helpers
//!
//! No simulation state here. Degenerate inputs (zero-length segments,
//! zero-length collision vectors) are the caller's edge cases: distance to a
//! collapsed segment falls back to point distance, and reflection assumes an
//! already normalized normal.

use glam::Vec2;

/// Rotate a point about the origin by an angle in degrees.
#[inline]
pub fn rotate_deg(point: Vec2, angle_deg: f32) -> Vec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec2::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
    )
}

/// Distance from `p` to segment `ab`, plus the closest point on the segment.
///
/// The projection parameter is clamped to [0, 1] so endpoints are honored.
/// A degenerate segment (`a == b`) yields the distance to `a`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> (f32, Vec2) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (p.distance(a), a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p.distance(closest), closest)
}

/// Reflect a velocity off a surface: v' = v - 2(v·n)n.
///
/// `normal` must already be normalized. Callers skip the bounce entirely when
/// the collision vector has zero length, so this never sees an undefined
/// normal.
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}
