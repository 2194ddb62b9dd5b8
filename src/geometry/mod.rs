//! Pure geometric utilities consumed by regeneration.
//!
//! Every function here is stateless; calls are independent and
//! deterministic, which is what makes the regeneration engine itself a pure
//! function of (control points, parameters, scale).

pub mod walker;

use crate::types::{Vector2, Vector3};

/// Move `distance` from `origin` along the normalized direction
/// `(towards - from)`.
///
/// This is the clamping primitive: an end point dragged inside the minimum
/// allowed distance is pushed back out along the direction of the attempted
/// move.  A degenerate direction (`from == towards`) falls back to +X so the
/// result is always well defined.
pub fn point_at_direction(from: Vector3, towards: Vector3, origin: Vector3, distance: f64) -> Vector3 {
    let dir = towards - from;
    let dir = if dir.length() > 0.0 {
        dir.normalize()
    } else {
        Vector3::UNIT_X
    };
    origin + dir * distance
}

/// Offset `point` perpendicular to `direction` by `distance`.
///
/// The offset side is the right-hand side of `direction` (direction rotated
/// by −90°); every stroke generator uses this same convention so decorations
/// stay on one side of the path across all segments.
pub fn perpendicular_offset(point: Vector2, direction: Vector2, distance: f64) -> Vector2 {
    point + direction.normalize().right_normal() * distance
}

/// Parametric point at a linear `distance` along the segment `start → end`.
///
/// Distances beyond the segment extrapolate along the same line, which is
/// how overhangs past an end point are placed.
pub fn point_along_segment(start: Vector3, end: Vector3, distance: f64) -> Vector3 {
    point_at_direction(start, end, start, distance)
}

/// Rotate `point` about `origin` by `angle` radians (counterclockwise).
pub fn rotate_about(point: Vector2, origin: Vector2, angle: f64) -> Vector2 {
    origin + (point - origin).rotated(angle)
}

/// Unit tangent of the segment `start → end` in the drawing plane.
///
/// Zero-length segments yield +X, matching [`point_at_direction`].
pub fn segment_tangent(start: Vector3, end: Vector3) -> Vector2 {
    let dir = (end - start).to_2d();
    if dir.length() > 0.0 {
        dir.normalize()
    } else {
        Vector2::UNIT_X
    }
}
