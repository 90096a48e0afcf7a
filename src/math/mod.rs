pub mod bounding;
pub mod equation;
pub mod integral;
pub mod newton;
pub mod polygon_2d;
pub mod polynomial;

pub use bounding::{get_points_bounding, merge_boundings, TwoPointsFormRegion};
pub use equation::{
    calculate_equation1, calculate_equation2, calculate_equation3, calculate_equation4,
    calculate_equation5,
};
pub use integral::{cotes_integral, romberg_integral};
pub use newton::{newton_iterate, newton_iterate2, newton_iterates, NewtonOptions};
pub use polynomial::Polynomial;

/// 2D position type. Always copied and compared by value.
pub type Position = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector = nalgebra::Vector2<f64>;

/// 3x3 homogeneous matrix used for affine transforms and conics.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Exact-ish comparisons: closed-form results, coincident points.
pub const DELTA1: f64 = 1e-8;

/// Iterative results: Newton iteration, parameter recovery.
pub const DELTA2: f64 = 1e-5;

/// Numeric integration and sampled approximations.
pub const DELTA3: f64 = 1e-3;

/// Returns whether `value` is zero within [`DELTA1`].
#[must_use]
pub fn is_zero(value: f64) -> bool {
    is_zero_with(value, DELTA1)
}

/// Returns whether `value` is zero within `delta`. `NaN` is never zero.
#[must_use]
pub fn is_zero_with(value: f64, delta: f64) -> bool {
    value.abs() < delta
}

/// Compares two numbers with a combined absolute and relative epsilon of [`DELTA1`].
#[must_use]
pub fn is_same_number(a: f64, b: f64) -> bool {
    is_same_number_with(a, b, DELTA1)
}

/// Compares two numbers with a combined absolute and relative epsilon.
///
/// Equal values match for any `delta`, infinities included; `NaN` equals
/// nothing.
#[must_use]
pub fn is_same_number_with(a: f64, b: f64, delta: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let diff = (a - b).abs();
    diff < delta || diff < delta * a.abs().max(b.abs())
}

/// `a > b` and not within tolerance of `b`.
#[must_use]
pub fn larger_than(a: f64, b: f64) -> bool {
    a > b && !is_same_number(a, b)
}

/// `a > b` and not within `delta` of `b`.
#[must_use]
pub fn larger_than_with(a: f64, b: f64, delta: f64) -> bool {
    a > b && !is_same_number_with(a, b, delta)
}

/// `a < b` and not within tolerance of `b`.
#[must_use]
pub fn less_than(a: f64, b: f64) -> bool {
    a < b && !is_same_number(a, b)
}

/// `a < b` and not within `delta` of `b`.
#[must_use]
pub fn less_than_with(a: f64, b: f64, delta: f64) -> bool {
    a < b && !is_same_number_with(a, b, delta)
}

/// `a >= b` with tolerance.
#[must_use]
pub fn larger_or_equal(a: f64, b: f64) -> bool {
    larger_or_equal_with(a, b, DELTA1)
}

/// `a >= b` with tolerance `delta`.
#[must_use]
pub fn larger_or_equal_with(a: f64, b: f64, delta: f64) -> bool {
    a > b || is_same_number_with(a, b, delta)
}

/// `a <= b` with tolerance.
#[must_use]
pub fn less_or_equal(a: f64, b: f64) -> bool {
    less_or_equal_with(a, b, DELTA1)
}

/// `a <= b` with tolerance `delta`.
#[must_use]
pub fn less_or_equal_with(a: f64, b: f64, delta: f64) -> bool {
    a < b || is_same_number_with(a, b, delta)
}

/// Whether `target` lies between `a` and `b` (in either order), inclusive with tolerance.
#[must_use]
pub fn is_between(target: f64, a: f64, b: f64) -> bool {
    is_between_with(target, a, b, DELTA1)
}

/// Whether `target` lies between `a` and `b` (in either order), inclusive within `delta`.
#[must_use]
pub fn is_between_with(target: f64, a: f64, b: f64, delta: f64) -> bool {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    larger_or_equal_with(target, min, delta) && less_or_equal_with(target, max, delta)
}

/// Converts degrees to radians.
#[must_use]
pub fn angle_to_radian(angle: f64) -> f64 {
    angle.to_radians()
}

/// Converts radians to degrees.
#[must_use]
pub fn radian_to_angle(radian: f64) -> f64 {
    radian.to_degrees()
}

/// Removes values that are within `delta` of an earlier value, keeping order.
#[must_use]
pub fn deduplicate_numbers(values: Vec<f64>, delta: f64) -> Vec<f64> {
    let mut result: Vec<f64> = Vec::with_capacity(values.len());
    for v in values {
        if v.is_nan() {
            continue;
        }
        if !result.iter().any(|r| is_same_number_with(*r, v, delta)) {
            result.push(v);
        }
    }
    result
}

/// Cross product of two 2D vectors (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector, b: &Vector) -> f64 {
    a.x * b.y - a.y * b.x
}
