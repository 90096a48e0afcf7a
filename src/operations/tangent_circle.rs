use nalgebra::Vector3;

use crate::geometry::curve::circle::is_same_circle;
use crate::geometry::curve::line::get_two_general_form_lines_intersection_point;
use crate::geometry::position::{deduplicate_positions, get_two_points_distance};
use crate::geometry::{Circle, GeneralFormLine};
use crate::math::{calculate_equation2, is_zero, larger_than, Matrix3, Position, Vector, DELTA1};
use crate::operations::intersect::{
    get_general_form_line_circle_intersection_points, get_two_circles_intersection_points,
};

/// Common tangent lines of two circles, each given by its tangency point on
/// `c1` then on `c2`. Outer tangents come first.
#[must_use]
pub fn get_lines_tangent_to_2_circles(c1: &Circle, c2: &Circle) -> Vec<[Position; 2]> {
    let offset = c2.center - c1.center;
    let d = offset.norm();
    if is_zero(d) {
        return Vec::new();
    }
    let u = offset / d;
    let normal = Vector::new(-u.y, u.x);
    let mut result = Vec::new();
    for side in [1.0, -1.0] {
        // a unit normal n with n·c1 + c = r1 and n·c2 + c = side·r2
        let k = (side * c2.r - c1.r) / d;
        if larger_than(k.abs(), 1.0) {
            continue;
        }
        let h = (1.0 - k * k).max(0.0).sqrt();
        let signs: &[f64] = if is_zero(h) { &[1.0] } else { &[1.0, -1.0] };
        for s in signs {
            let n = u * k + normal * (h * s);
            result.push([c1.center - n * c1.r, c2.center - n * (side * c2.r)]);
        }
    }
    result
}

fn circles_from_centers(centers: Vec<Position>, r: f64) -> Vec<Circle> {
    deduplicate_positions(centers)
        .into_iter()
        .map(|center| Circle::new(center, r))
        .collect()
}

/// Circles of radius `r` touching two lines; up to four, none when the lines
/// are parallel.
#[must_use]
pub fn get_circles_tangent_to_2_lines(
    l1: &GeneralFormLine,
    l2: &GeneralFormLine,
    r: f64,
) -> Vec<Circle> {
    if !larger_than(r, 0.0) {
        return Vec::new();
    }
    let mut centers = Vec::new();
    for s1 in [r, -r] {
        for s2 in [r, -r] {
            centers.extend(get_two_general_form_lines_intersection_point(
                &l1.shifted(s1),
                &l2.shifted(s2),
            ));
        }
    }
    circles_from_centers(centers, r)
}

/// Concentric radii whose points lie at distance `r` from `circle`.
fn get_offset_radii(circle: &Circle, r: f64) -> Vec<f64> {
    let mut radii = vec![circle.r + r];
    let inner = (circle.r - r).abs();
    if !is_zero(inner) {
        radii.push(inner);
    }
    radii
}

/// Circles of radius `r` touching a line and a circle.
#[must_use]
pub fn get_circles_tangent_to_line_and_circle(
    line: &GeneralFormLine,
    circle: &Circle,
    r: f64,
) -> Vec<Circle> {
    if !larger_than(r, 0.0) {
        return Vec::new();
    }
    let mut centers = Vec::new();
    for shift in [r, -r] {
        let shifted = line.shifted(shift);
        for radius in get_offset_radii(circle, r) {
            centers.extend(get_general_form_line_circle_intersection_points(
                &shifted,
                &Circle::new(circle.center, radius),
            ));
        }
    }
    circles_from_centers(centers, r)
}

/// Circles of radius `r` touching two circles.
#[must_use]
pub fn get_circles_tangent_to_2_circles(c1: &Circle, c2: &Circle, r: f64) -> Vec<Circle> {
    if !larger_than(r, 0.0) {
        return Vec::new();
    }
    let mut centers = Vec::new();
    for r1 in get_offset_radii(c1, r) {
        for r2 in get_offset_radii(c2, r) {
            centers.extend(get_two_circles_intersection_points(
                &Circle::new(c1.center, r1),
                &Circle::new(c2.center, r2),
            ));
        }
    }
    circles_from_centers(centers, r)
}

#[derive(Debug, Clone, Copy)]
enum Touch {
    Line(GeneralFormLine),
    Circle(Circle),
}

/// `coefficients · (x, y, r) = value`.
struct Condition {
    coefficients: Vector3<f64>,
    value: f64,
}

/// `sign·(a·x + b·y + c) = r` on a normalized line.
fn line_condition(line: &GeneralFormLine, sign: f64) -> Condition {
    Condition {
        coefficients: Vector3::new(sign * line.a, sign * line.b, -1.0),
        value: -sign * line.c,
    }
}

/// Difference of `|X - cᵢ|² = (rᵢ + sᵢ·r)²` for two circles, which is linear.
fn circle_difference_condition(c1: &Circle, s1: f64, c2: &Circle, s2: f64) -> Condition {
    Condition {
        coefficients: Vector3::new(
            2.0 * (c2.center.x - c1.center.x),
            2.0 * (c2.center.y - c1.center.y),
            -2.0 * (c1.r * s1 - c2.r * s2),
        ),
        value: c1.r * c1.r - c2.r * c2.r - c1.center.coords.norm_squared()
            + c2.center.coords.norm_squared(),
    }
}

/// Solutions of two linear conditions and `|X - c|² = (c.r + sign·r)²`.
///
/// The linear conditions leave a line `X0 + λ·k` in `(x, y, r)` space, with
/// `k` the cross product of their normals.
fn solve_with_circle(
    first: &Condition,
    second: &Condition,
    circle: &Circle,
    sign: f64,
) -> Vec<Vector3<f64>> {
    let k = first.coefficients.cross(&second.coefficients);
    let scale = first.coefficients.norm() * second.coefficients.norm();
    if scale == 0.0 || is_zero(k.norm() / scale) {
        return Vec::new();
    }
    let k = k.normalize();
    let (a, b) = (first.coefficients, second.coefficients);
    let m = Matrix3::new(a.x, a.y, a.z, b.x, b.y, b.z, k.x, k.y, k.z);
    let Some(x0) = m.lu().solve(&Vector3::new(first.value, second.value, 0.0)) else {
        return Vec::new();
    };
    let ox = x0.x - circle.center.x;
    let oy = x0.y - circle.center.y;
    let or = circle.r + sign * x0.z;
    calculate_equation2(
        k.x * k.x + k.y * k.y - k.z * k.z,
        2.0 * (ox * k.x + oy * k.y - sign * or * k.z),
        ox * ox + oy * oy - or * or,
        DELTA1,
    )
    .into_iter()
    .map(|lambda| x0 + k * lambda)
    .collect()
}

fn solve_linear(conditions: &[Condition]) -> Option<Vector3<f64>> {
    let [a, b, c] = conditions else {
        return None;
    };
    let (p, q, s) = (a.coefficients, b.coefficients, c.coefficients);
    Matrix3::new(p.x, p.y, p.z, q.x, q.y, q.z, s.x, s.y, s.z)
        .lu()
        .solve(&Vector3::new(a.value, b.value, c.value))
}

/// Circles touching three lines or circles, with a signed radius.
///
/// Each touch contributes one condition per side. Two of the three are
/// linear in `(x, y, r)` and the last is a circle equation, so every sign
/// combination reduces to a quadratic along a line.
fn get_apollonius_circles(touches: [Touch; 3]) -> Vec<Circle> {
    let mut lines = Vec::new();
    let mut circles = Vec::new();
    for touch in touches {
        match touch {
            Touch::Line(line) if !line.is_degenerate() => lines.push(line.normalized()),
            Touch::Line(_) => return Vec::new(),
            Touch::Circle(circle) => circles.push(circle),
        }
    }
    let mut result: Vec<Circle> = Vec::new();
    for mask in 0u8..8 {
        let sign = |i: usize| if (mask >> i) & 1 == 0 { 1.0 } else { -1.0 };
        let mut conditions: Vec<Condition> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| line_condition(line, sign(i)))
            .collect();
        let circle_sign = |j: usize| sign(lines.len() + j);
        let solutions = match circles.first() {
            Some(first) => {
                for (j, other) in circles.iter().enumerate().skip(1) {
                    conditions.push(circle_difference_condition(
                        first,
                        circle_sign(0),
                        other,
                        circle_sign(j),
                    ));
                }
                solve_with_circle(&conditions[0], &conditions[1], first, circle_sign(0))
            }
            None => solve_linear(&conditions).into_iter().collect(),
        };
        for v in solutions {
            if !(v.x.is_finite() && v.y.is_finite()) || !larger_than(v.z, DELTA1) {
                continue;
            }
            let circle = Circle::new(Position::new(v.x, v.y), v.z);
            if !result.iter().any(|c| is_same_circle(c, &circle)) {
                result.push(circle);
            }
        }
    }
    result
}

/// Circles touching three lines: the incircle and excircles of their triangle.
#[must_use]
pub fn get_circles_tangent_to_3_lines(
    l1: &GeneralFormLine,
    l2: &GeneralFormLine,
    l3: &GeneralFormLine,
) -> Vec<Circle> {
    get_apollonius_circles([Touch::Line(*l1), Touch::Line(*l2), Touch::Line(*l3)])
}

#[must_use]
pub fn get_circles_tangent_to_2_lines_and_circle(
    l1: &GeneralFormLine,
    l2: &GeneralFormLine,
    circle: &Circle,
) -> Vec<Circle> {
    get_apollonius_circles([Touch::Line(*l1), Touch::Line(*l2), Touch::Circle(*circle)])
}

#[must_use]
pub fn get_circles_tangent_to_line_and_2_circles(
    line: &GeneralFormLine,
    c1: &Circle,
    c2: &Circle,
) -> Vec<Circle> {
    get_apollonius_circles([Touch::Line(*line), Touch::Circle(*c1), Touch::Circle(*c2)])
}

#[must_use]
pub fn get_circles_tangent_to_3_circles(c1: &Circle, c2: &Circle, c3: &Circle) -> Vec<Circle> {
    get_apollonius_circles([Touch::Circle(*c1), Touch::Circle(*c2), Touch::Circle(*c3)])
}

/// Whether two circles touch, from outside or from inside.
#[must_use]
pub fn is_circle_tangent_to_circle(a: &Circle, b: &Circle, delta: f64) -> bool {
    let d = get_two_points_distance(&a.center, &b.center);
    (d - (a.r + b.r)).abs() < delta || (d - (a.r - b.r).abs()).abs() < delta
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::curve::line::two_points_to_general_form_line;
    use crate::geometry::position::is_same_point_with;

    fn is_tangent_to_line(circle: &Circle, line: &GeneralFormLine) -> bool {
        (line.signed_distance(&circle.center).abs() - circle.r).abs() < 1e-6
    }

    fn has_circle(circles: &[Circle], x: f64, y: f64, r: f64) -> bool {
        circles
            .iter()
            .any(|c| is_same_circle(c, &Circle::new(Position::new(x, y), r)))
    }

    #[test]
    fn common_tangent_lines() {
        let c1 = Circle::new(Position::new(0.0, 0.0), 1.0);
        let c2 = Circle::new(Position::new(4.0, 0.0), 1.0);
        let lines = get_lines_tangent_to_2_circles(&c1, &c2);
        assert_eq!(lines.len(), 4);
        for [p1, p2] in &lines {
            assert_abs_diff_eq!(get_two_points_distance(p1, &c1.center), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(get_two_points_distance(p2, &c2.center), 1.0, epsilon = 1e-12);
            // the radius at each tangency point is perpendicular to the line
            assert_abs_diff_eq!((p2 - p1).dot(&(p1 - c1.center)), 0.0, epsilon = 1e-9);
        }
        assert!(lines
            .iter()
            .any(|[p1, p2]| is_same_point_with(p1, &Position::new(0.0, 1.0), 1e-12)
                && is_same_point_with(p2, &Position::new(4.0, 1.0), 1e-12)));
        // one circle inside the other has no common tangent
        let inner = Circle::new(Position::new(0.2, 0.0), 0.3);
        assert!(get_lines_tangent_to_2_circles(&c1, &inner).is_empty());
    }

    #[test]
    fn fixed_radius_between_two_lines() {
        let x_axis = GeneralFormLine::new(0.0, 1.0, 0.0);
        let y_axis = GeneralFormLine::new(1.0, 0.0, 0.0);
        let circles = get_circles_tangent_to_2_lines(&x_axis, &y_axis, 1.0);
        assert_eq!(circles.len(), 4);
        for (x, y) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            assert!(has_circle(&circles, x, y, 1.0));
        }
        let parallel = GeneralFormLine::new(0.0, 1.0, -3.0);
        assert!(get_circles_tangent_to_2_lines(&x_axis, &parallel, 1.0).is_empty());
    }

    #[test]
    fn fixed_radius_line_and_circle() {
        let line = GeneralFormLine::new(0.0, 1.0, 0.0);
        let circle = Circle::new(Position::new(0.0, 2.0), 1.0);
        let circles = get_circles_tangent_to_line_and_circle(&line, &circle, 1.0);
        assert_eq!(circles.len(), 2);
        assert!(has_circle(&circles, 3f64.sqrt(), 1.0, 1.0));
        assert!(has_circle(&circles, -(3f64.sqrt()), 1.0, 1.0));
    }

    #[test]
    fn fixed_radius_two_circles() {
        let c1 = Circle::new(Position::new(0.0, 0.0), 1.0);
        let c2 = Circle::new(Position::new(4.0, 0.0), 1.0);
        let circles = get_circles_tangent_to_2_circles(&c1, &c2, 1.0);
        assert_eq!(circles.len(), 1);
        assert!(has_circle(&circles, 2.0, 0.0, 1.0));
        let bigger = get_circles_tangent_to_2_circles(&c1, &c2, 2.0);
        for c in &bigger {
            assert!(is_circle_tangent_to_circle(c, &c1, 1e-9));
            assert!(is_circle_tangent_to_circle(c, &c2, 1e-9));
        }
        assert!(has_circle(&bigger, 2.0, 5f64.sqrt(), 2.0));
    }

    #[test]
    fn incircle_and_excircles() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(4.0, 0.0);
        let c = Position::new(0.0, 3.0);
        let lines = [
            two_points_to_general_form_line(&a, &b).unwrap(),
            two_points_to_general_form_line(&b, &c).unwrap(),
            two_points_to_general_form_line(&c, &a).unwrap(),
        ];
        let circles = get_circles_tangent_to_3_lines(&lines[0], &lines[1], &lines[2]);
        assert_eq!(circles.len(), 4);
        assert!(has_circle(&circles, 1.0, 1.0, 1.0));
        let mut radii: Vec<f64> = circles.iter().map(|c| c.r).collect();
        radii.sort_by(f64::total_cmp);
        for (r, expected) in radii.iter().zip([1.0, 2.0, 3.0, 6.0]) {
            assert_abs_diff_eq!(*r, expected, epsilon = 1e-9);
        }
        for circle in &circles {
            assert!(lines.iter().all(|l| is_tangent_to_line(circle, l)));
        }
    }

    #[test]
    fn between_parallel_lines_and_a_circle() {
        let bottom = GeneralFormLine::new(0.0, 1.0, 0.0);
        let top = GeneralFormLine::new(0.0, 1.0, -2.0);
        let circle = Circle::new(Position::new(0.0, 1.0), 0.5);
        let circles = get_circles_tangent_to_2_lines_and_circle(&bottom, &top, &circle);
        assert_eq!(circles.len(), 4);
        for x in [1.5, -1.5, 0.5, -0.5] {
            assert!(has_circle(&circles, x, 1.0, 1.0));
        }
    }

    #[test]
    fn line_and_two_circles() {
        let line = GeneralFormLine::new(0.0, 1.0, 0.0);
        let c1 = Circle::new(Position::new(-2.0, 1.0), 1.0);
        let c2 = Circle::new(Position::new(2.0, 1.0), 1.0);
        let circles = get_circles_tangent_to_line_and_2_circles(&line, &c1, &c2);
        assert!(has_circle(&circles, 0.0, 1.0, 1.0));
        for circle in &circles {
            assert!(is_tangent_to_line(circle, &line));
            assert!(is_circle_tangent_to_circle(circle, &c1, 1e-6));
            assert!(is_circle_tangent_to_circle(circle, &c2, 1e-6));
        }
    }

    #[test]
    fn three_circles() {
        let h = 2.0 * 3f64.sqrt();
        let given = [
            Circle::new(Position::new(0.0, 0.0), 1.0),
            Circle::new(Position::new(4.0, 0.0), 1.0),
            Circle::new(Position::new(2.0, h), 1.0),
        ];
        let circles = get_circles_tangent_to_3_circles(&given[0], &given[1], &given[2]);
        let to_center = 4.0 / 3f64.sqrt();
        assert!(has_circle(&circles, 2.0, h / 3.0, to_center - 1.0));
        assert!(has_circle(&circles, 2.0, h / 3.0, to_center + 1.0));
        for circle in &circles {
            assert!(given.iter().all(|g| is_circle_tangent_to_circle(circle, g, 1e-6)));
        }
    }
}
