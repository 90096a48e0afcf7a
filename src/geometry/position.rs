use std::f64::consts::PI;

use crate::math::{is_same_number_with, Position, Vector, DELTA1};

/// Whether two positions coincide within [`DELTA1`] per coordinate.
#[must_use]
pub fn is_same_point(a: &Position, b: &Position) -> bool {
    is_same_point_with(a, b, DELTA1)
}

/// Whether two positions coincide within `delta` per coordinate.
#[must_use]
pub fn is_same_point_with(a: &Position, b: &Position, delta: f64) -> bool {
    is_same_number_with(a.x, b.x, delta) && is_same_number_with(a.y, b.y, delta)
}

/// Euclidean distance between two positions.
#[must_use]
pub fn get_two_points_distance(a: &Position, b: &Position) -> f64 {
    nalgebra::distance(a, b)
}

/// Midpoint of two positions.
#[must_use]
pub fn get_two_point_center(a: &Position, b: &Position) -> Position {
    nalgebra::center(a, b)
}

/// Direction of the vector `from → to`, in radians.
#[must_use]
pub fn get_two_points_radian(to: &Position, from: &Position) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector pointing at `radian`.
#[must_use]
pub fn get_direction_by_radian(radian: f64) -> Vector {
    Vector::new(radian.cos(), radian.sin())
}

/// The point `length` away from `start` in direction `radian`.
#[must_use]
pub fn get_point_by_length_and_radian(start: &Position, length: f64, radian: f64) -> Position {
    start + get_direction_by_radian(radian) * length
}

/// The point `length` away from `start` towards `target`.
///
/// Returns `start` when the two points coincide.
#[must_use]
pub fn get_point_by_length_and_direction(
    start: &Position,
    length: f64,
    target: &Position,
) -> Position {
    let d = target - start;
    let norm = d.norm();
    if norm == 0.0 {
        return *start;
    }
    start + d * (length / norm)
}

/// Rotates `point` around `center` by `angle` degrees.
#[must_use]
pub fn rotate_position_by_center(point: &Position, center: &Position, angle: f64) -> Position {
    let (sin, cos) = angle.to_radians().sin_cos();
    let d = point - center;
    Position::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Vertices of a regular polygon centered at `center` whose first vertex is `start`.
#[must_use]
pub fn get_polygon_points(start: &Position, center: &Position, sides: usize) -> Vec<Position> {
    if sides < 3 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let step = 360.0 / sides as f64;
    (0..sides)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = step * i as f64;
            rotate_position_by_center(start, center, angle)
        })
        .collect()
}

/// Removes positions that coincide with an earlier one, keeping order.
#[must_use]
pub fn deduplicate_positions(points: Vec<Position>) -> Vec<Position> {
    let mut result: Vec<Position> = Vec::with_capacity(points.len());
    for p in points {
        if p.x.is_nan() || p.y.is_nan() {
            continue;
        }
        if !result.iter().any(|r| is_same_point(r, &p)) {
            result.push(p);
        }
    }
    result
}

/// Normalizes a radian into `(-π, π]`.
#[must_use]
pub fn normalize_radian(radian: f64) -> f64 {
    let r = radian.rem_euclid(2.0 * PI);
    if r > PI {
        r - 2.0 * PI
    } else {
        r
    }
}
