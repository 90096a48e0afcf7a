use super::{Position, Vector, DELTA1};
use crate::error::{GeometryError, Result};

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the points coincide.
pub fn segment_direction(a: &Position, b: &Position) -> Result<Vector> {
    let d = b - a;
    let len = d.norm();
    if len < DELTA1 {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector (rotated by +90°).
#[must_use]
pub fn left_normal(dir: Vector) -> Vector {
    Vector::new(-dir.y, dir.x)
}
