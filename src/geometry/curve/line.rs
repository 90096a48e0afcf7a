use crate::geometry::position::{get_two_points_distance, is_same_point};
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{
    cross, is_between_with, is_same_number_with, is_zero, is_zero_with, Position, Vector, DELTA1,
    DELTA2,
};

/// A straight line in general form `a·x + b·y + c = 0`.
///
/// The travel direction is `(-b, a)`, so `(a, b)` points to the right of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralFormLine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl GeneralFormLine {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Line through `point` travelling in direction `radian`.
    #[must_use]
    pub fn from_point_and_radian(point: &Position, radian: f64) -> Self {
        let (sin, cos) = radian.sin_cos();
        Self::new(sin, -cos, cos * point.y - sin * point.x)
    }

    /// Travel direction, not normalized.
    #[must_use]
    pub fn direction(&self) -> Vector {
        Vector::new(-self.b, self.a)
    }

    /// Travel direction in radians.
    #[must_use]
    pub fn radian(&self) -> f64 {
        self.a.atan2(-self.b)
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        is_zero(self.a) && is_zero(self.b)
    }

    /// Same line scaled so that `(a, b)` has unit length.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let n = self.a.hypot(self.b);
        if n == 0.0 {
            return *self;
        }
        Self::new(self.a / n, self.b / n, self.c / n)
    }

    /// Signed distance; positive on the right of travel.
    #[must_use]
    pub fn signed_distance(&self, point: &Position) -> f64 {
        (self.a * point.x + self.b * point.y + self.c) / self.a.hypot(self.b)
    }

    /// Foot of the perpendicular from `point`.
    #[must_use]
    pub fn perpendicular_point(&self, point: &Position) -> Position {
        let n2 = self.a * self.a + self.b * self.b;
        let k = (self.a * point.x + self.b * point.y + self.c) / n2;
        Position::new(point.x - self.a * k, point.y - self.b * k)
    }

    /// Any point on the line, the foot from the origin.
    #[must_use]
    pub fn any_point(&self) -> Position {
        self.perpendicular_point(&Position::origin())
    }

    /// The line through `point` perpendicular to this one, travelling along `(a, b)`.
    #[must_use]
    pub fn perpendicular_line(&self, point: &Position) -> Self {
        Self::new(self.b, -self.a, self.a * point.y - self.b * point.x)
    }

    /// The line with the same points travelling the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(-self.a, -self.b, -self.c)
    }

    /// Shifts the line `distance` to the left of travel (right when negative).
    #[must_use]
    pub fn shifted(&self, distance: f64) -> Self {
        Self::new(self.a, self.b, self.c + distance * self.a.hypot(self.b))
    }
}

/// Line from `p1` through `p2`, or `None` when the points coincide.
#[must_use]
pub fn two_points_to_general_form_line(p1: &Position, p2: &Position) -> Option<GeneralFormLine> {
    if is_same_point(p1, p2) {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    Some(GeneralFormLine::new(dy, -dx, dx * p1.y - dy * p1.x))
}

/// Whether `point` lies on `line` within `delta`.
#[must_use]
pub fn point_is_on_line(point: &Position, line: &GeneralFormLine, delta: f64) -> bool {
    is_zero_with(line.signed_distance(point), delta)
}

/// Whether `point` lies on segment `p1 → p2` within `delta`.
#[must_use]
pub fn point_is_on_line_segment(point: &Position, p1: &Position, p2: &Position, delta: f64) -> bool {
    let Some(line) = two_points_to_general_form_line(p1, p2) else {
        return get_two_points_distance(point, p1) < delta;
    };
    point_is_on_line(point, &line, delta)
        && is_between_with(point.x, p1.x, p2.x, delta)
        && is_between_with(point.y, p1.y, p2.y, delta)
}

/// Two lines describing the same point set, ignoring direction.
#[must_use]
pub fn is_same_line(a: &GeneralFormLine, b: &GeneralFormLine) -> bool {
    let a = a.normalized();
    let mut b = b.normalized();
    if a.a * b.a + a.b * b.b < 0.0 {
        b = b.reversed();
    }
    is_same_number_with(a.a, b.a, DELTA2)
        && is_same_number_with(a.b, b.b, DELTA2)
        && is_same_number_with(a.c, b.c, DELTA2)
}

/// Intersection of two infinite lines; `None` when parallel.
#[must_use]
pub fn get_two_general_form_lines_intersection_point(
    l1: &GeneralFormLine,
    l2: &GeneralFormLine,
) -> Option<Position> {
    let d = l1.a * l2.b - l2.a * l1.b;
    let scale = l1.a.hypot(l1.b) * l2.a.hypot(l2.b);
    if scale == 0.0 || is_zero_with(d / scale, DELTA1) {
        return None;
    }
    Some(Position::new(
        (l1.b * l2.c - l2.b * l1.c) / d,
        (l2.a * l1.c - l1.a * l2.c) / d,
    ))
}

/// The two lines at `distance` from `line`: left of travel first, then right.
#[must_use]
pub fn get_parallel_lines_by_distance(line: &GeneralFormLine, distance: f64) -> [GeneralFormLine; 2] {
    [line.shifted(distance), line.shifted(-distance)]
}

/// The two segments parallel to `p1 → p2` at `distance`: left first, then right.
#[must_use]
pub fn get_parallel_segments_by_distance(
    segment: &[Position; 2],
    distance: f64,
) -> Option<[[Position; 2]; 2]> {
    let direction = segment_direction(&segment[0], &segment[1]).ok()?;
    let normal = left_normal(direction) * distance;
    Some([
        [segment[0] + normal, segment[1] + normal],
        [segment[0] - normal, segment[1] - normal],
    ])
}

/// Fraction of `p1 → p2` at the projection of `point`. May fall outside `[0, 1]`.
#[must_use]
pub fn get_segment_param_at_point(p1: &Position, p2: &Position, point: &Position) -> f64 {
    let d = p2 - p1;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return 0.0;
    }
    (point - p1).dot(&d) / len2
}

/// Which side of the directed line `p1 → p2` the point lies on:
/// positive on the left, negative on the right.
#[must_use]
pub fn get_point_side_of_line(point: &Position, p1: &Position, p2: &Position) -> f64 {
    cross(&(p2 - p1), &(point - p1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::position::is_same_point_with;

    #[test]
    fn two_points_line() {
        let l = two_points_to_general_form_line(&Position::new(0.0, 0.0), &Position::new(2.0, 2.0))
            .unwrap();
        assert!(point_is_on_line(&Position::new(5.0, 5.0), &l, DELTA1));
        assert_abs_diff_eq!(l.radian(), std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert!(two_points_to_general_form_line(&Position::new(1.0, 1.0), &Position::new(1.0, 1.0))
            .is_none());
    }

    #[test]
    fn signed_distance_is_positive_on_the_right() {
        let l = two_points_to_general_form_line(&Position::new(0.0, 0.0), &Position::new(1.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(l.signed_distance(&Position::new(0.0, -2.0)), 2.0);
        assert_abs_diff_eq!(l.signed_distance(&Position::new(0.0, 3.0)), -3.0);
    }

    #[test]
    fn parallel_lines_left_first() {
        let l = two_points_to_general_form_line(&Position::new(0.0, 0.0), &Position::new(1.0, 0.0))
            .unwrap();
        let [left, right] = get_parallel_lines_by_distance(&l, 2.0);
        assert!(point_is_on_line(&Position::new(7.0, 2.0), &left, DELTA1));
        assert!(point_is_on_line(&Position::new(-3.0, -2.0), &right, DELTA1));
    }

    #[test]
    fn parallel_segments_are_at_distance() {
        let seg = [Position::new(0.0, 0.0), Position::new(3.0, 4.0)];
        let [left, right] = get_parallel_segments_by_distance(&seg, 1.5).unwrap();
        let line = two_points_to_general_form_line(&seg[0], &seg[1]).unwrap();
        assert_abs_diff_eq!(line.signed_distance(&left[0]), -1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(line.signed_distance(&right[1]), 1.5, epsilon = 1e-12);
        assert!(get_point_side_of_line(&left[0], &seg[0], &seg[1]) > 0.0);
    }

    #[test]
    fn intersection_and_perpendicular() {
        let l1 = two_points_to_general_form_line(&Position::new(0.0, 0.0), &Position::new(1.0, 1.0))
            .unwrap();
        let l2 = two_points_to_general_form_line(&Position::new(0.0, 2.0), &Position::new(2.0, 0.0))
            .unwrap();
        let p = get_two_general_form_lines_intersection_point(&l1, &l2).unwrap();
        assert!(is_same_point_with(&p, &Position::new(1.0, 1.0), 1e-12));
        let foot = l1.perpendicular_point(&Position::new(2.0, 0.0));
        assert!(is_same_point_with(&foot, &Position::new(1.0, 1.0), 1e-12));
        let parallel = l1.shifted(1.0);
        assert!(get_two_general_form_lines_intersection_point(&l1, &parallel).is_none());
    }

    #[test]
    fn same_line_ignores_direction_and_scale() {
        let l = GeneralFormLine::new(1.0, 2.0, 3.0);
        assert!(is_same_line(&l, &GeneralFormLine::new(-2.0, -4.0, -6.0)));
        assert!(!is_same_line(&l, &GeneralFormLine::new(1.0, 2.0, 4.0)));
    }

    #[test]
    fn segment_membership() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(4.0, 0.0);
        assert!(point_is_on_line_segment(&Position::new(2.0, 0.0), &a, &b, DELTA2));
        assert!(!point_is_on_line_segment(&Position::new(5.0, 0.0), &a, &b, DELTA2));
        assert_abs_diff_eq!(get_segment_param_at_point(&a, &b, &Position::new(1.0, 3.0)), 0.25);
    }
}
