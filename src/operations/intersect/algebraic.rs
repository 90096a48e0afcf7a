use crate::geometry::conic::Conic;
use crate::geometry::curve::line::{two_points_to_general_form_line, GeneralFormLine};
use crate::geometry::curve::{Circle, Ellipse, Hyperbola};
use crate::geometry::position::{get_two_points_distance, is_same_point};
use crate::geometry::GeometryLine;
use crate::math::{is_zero, larger_than, Polynomial, Position, Vector, DELTA1};

/// Rational parametrisation `(x(u)/w(u), y(u)/w(u))` of a conic curve.
pub(crate) struct RationalForm {
    pub x: Polynomial,
    pub y: Polynomial,
    pub w: Polynomial,
    /// Only roots with `u > 0` describe the curve.
    pub positive_only: bool,
    /// Point that `u → ∞` reaches, which no finite root can produce.
    pub at_infinity: Option<Position>,
}

impl RationalForm {
    /// Tangent half-angle substitution `u = tan(θ/2)`.
    fn half_angle(ellipse: &Ellipse) -> Self {
        let (sin, cos) = ellipse.angle.to_radians().sin_cos();
        let (d, n) = (Vector::new(cos, sin), Vector::new(-sin, cos));
        let (c, rx, ry) = (ellipse.center, ellipse.rx, ellipse.ry);
        let axis = |c: f64, d: f64, n: f64| {
            Polynomial::quadratic(c + rx * d, 2.0 * ry * n, c - rx * d)
        };
        Self {
            x: axis(c.x, d.x, n.x),
            y: axis(c.y, d.y, n.y),
            w: Polynomial::quadratic(1.0, 0.0, 1.0),
            positive_only: false,
            at_infinity: Some(ellipse.point_at_radian(std::f64::consts::PI)),
        }
    }

    /// `s = e^w` with `t = sinh w`, covering the whole branch for `s > 0`.
    fn exponential(hyperbola: &Hyperbola) -> Self {
        let (sin, cos) = hyperbola.angle.to_radians().sin_cos();
        let (d, n) = (Vector::new(cos, sin), Vector::new(-sin, cos));
        let (c, a, b) = (hyperbola.center, hyperbola.a, hyperbola.b);
        let axis = |c: f64, d: f64, n: f64| Polynomial::quadratic(a * d - b * n, 2.0 * c, a * d + b * n);
        Self {
            x: axis(c.x, d.x, n.x),
            y: axis(c.y, d.y, n.y),
            w: Polynomial::linear(0.0, 2.0),
            positive_only: true,
            at_infinity: None,
        }
    }

    fn point(&self, u: f64) -> Option<Position> {
        let w = self.w.evaluate(u);
        if w == 0.0 {
            return None;
        }
        Some(Position::new(self.x.evaluate(u) / w, self.y.evaluate(u) / w))
    }
}

fn line_conic(line: &GeneralFormLine) -> Conic {
    Conic::new(0.0, 0.0, 0.0, line.a, line.b, line.c)
}

/// Implicit equation of the supporting curve. Lines are stored as conics
/// without quadratic terms.
pub(crate) fn implicit_form(line: &GeometryLine) -> Option<(Conic, usize)> {
    match line {
        GeometryLine::Segment([a, b]) => {
            two_points_to_general_form_line(a, b).map(|l| (line_conic(&l), 1))
        }
        GeometryLine::Ray(ray) => Some((line_conic(&ray.to_general_form_line()), 1)),
        GeometryLine::Arc(arc) => Some((arc.circle().to_conic(), 2)),
        GeometryLine::EllipseArc(arc) => Some((arc.ellipse().to_conic(), 2)),
        GeometryLine::HyperbolaSegment(segment) => Some((segment.hyperbola().to_conic(), 2)),
        GeometryLine::QuadraticCurve(curve) => {
            if curve.is_flat() {
                let end = if is_same_point(&curve.from, &curve.to) {
                    curve.cp
                } else {
                    curve.to
                };
                two_points_to_general_form_line(&curve.from, &end).map(|l| (line_conic(&l), 1))
            } else {
                Some((curve.to_conic(), 2))
            }
        }
        GeometryLine::BezierCurve(_) | GeometryLine::Nurbs(_) => None,
    }
}

/// Coordinates as polynomials of the curve param.
pub(crate) fn polynomial_form(line: &GeometryLine) -> Option<[Polynomial; 2]> {
    match line {
        GeometryLine::Segment([a, b]) => Some([
            Polynomial::linear(a.x, b.x - a.x),
            Polynomial::linear(a.y, b.y - a.y),
        ]),
        GeometryLine::Ray(ray) => {
            let d = ray.travel_direction();
            Some([
                Polynomial::linear(ray.origin.x, d.x),
                Polynomial::linear(ray.origin.y, d.y),
            ])
        }
        GeometryLine::QuadraticCurve(curve) => Some(curve.polynomials()),
        GeometryLine::BezierCurve(curve) => Some(curve.polynomials()),
        _ => None,
    }
}

pub(crate) fn rational_form(line: &GeometryLine) -> Option<RationalForm> {
    match line {
        GeometryLine::Arc(arc) => Some(RationalForm::half_angle(&Ellipse::new(
            arc.center, arc.r, arc.r, 0.0,
        ))),
        GeometryLine::EllipseArc(arc) => Some(RationalForm::half_angle(&arc.ellipse())),
        GeometryLine::HyperbolaSegment(segment) => {
            Some(RationalForm::exponential(&segment.hyperbola()))
        }
        _ => None,
    }
}

/// Points of a polynomial curve on a conic: roots of `conic(x(t), y(t))`.
pub(crate) fn get_polynomial_conic_points(curve: &[Polynomial; 2], conic: &Conic) -> Vec<Position> {
    let [x, y] = curve;
    let polynomial = conic.substitute_polynomial(x, y);
    // start deflation near the smallest residual on the curve body
    let seed = (0..=16)
        .map(|i| f64::from(i) / 16.0)
        .min_by(|a, b| {
            polynomial
                .evaluate(*a)
                .abs()
                .total_cmp(&polynomial.evaluate(*b).abs())
        })
        .unwrap_or(0.5);
    polynomial
        .roots(seed, DELTA1)
        .into_iter()
        .map(|t| Position::new(x.evaluate(t), y.evaluate(t)))
        .collect()
}

/// Points of a rational conic curve on another conic: a quartic in `u`.
pub(crate) fn get_rational_conic_points(curve: &RationalForm, conic: &Conic) -> Vec<Position> {
    let mut points: Vec<Position> = conic
        .substitute(&curve.x, &curve.y, &curve.w)
        .roots(1.0, DELTA1)
        .into_iter()
        .filter(|u| !curve.positive_only || larger_than(*u, 0.0))
        .filter_map(|u| curve.point(u))
        .collect();
    if let Some(p) = curve.at_infinity {
        let scale = conic.gradient(&p).norm().max(1.0);
        if is_zero(conic.evaluate(&p) / scale) {
            points.push(p);
        }
    }
    points
}

/// Circle-circle intersection through the radical line.
#[must_use]
pub fn get_two_circles_intersection_points(c1: &Circle, c2: &Circle) -> Vec<Position> {
    let d = get_two_points_distance(&c1.center, &c2.center);
    if is_zero(d) {
        return Vec::new();
    }
    let sum = c1.r + c2.r;
    let diff = (c1.r - c2.r).abs();
    if larger_than(d, sum) || larger_than(diff, d) {
        return Vec::new();
    }
    let along = (c1.r * c1.r - c2.r * c2.r + d * d) / (2.0 * d);
    let h2 = c1.r * c1.r - along * along;
    let u = (c2.center - c1.center) / d;
    let foot = c1.center + u * along;
    if h2 <= 0.0 || is_zero(h2.sqrt() / c1.r.max(c2.r)) {
        return vec![foot];
    }
    let normal = Vector::new(-u.y, u.x) * h2.sqrt();
    vec![foot + normal, foot - normal]
}

/// Points where an infinite line crosses a circle, through the foot of the
/// perpendicular from the center.
#[must_use]
pub fn get_general_form_line_circle_intersection_points(
    line: &GeneralFormLine,
    circle: &Circle,
) -> Vec<Position> {
    if line.is_degenerate() {
        return Vec::new();
    }
    let foot = line.perpendicular_point(&circle.center);
    let d = get_two_points_distance(&foot, &circle.center);
    if larger_than(d, circle.r) {
        return Vec::new();
    }
    let h2 = circle.r * circle.r - d * d;
    if h2 <= 0.0 || is_zero(h2.sqrt() / circle.r) {
        return vec![foot];
    }
    let along = line.direction().normalize() * h2.sqrt();
    vec![foot + along, foot - along]
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::position::is_same_point_with;

    #[test]
    fn rational_forms_trace_the_curve() {
        let ellipse = Ellipse::new(Position::new(1.0, 2.0), 3.0, 1.0, 25.0);
        let form = RationalForm::half_angle(&ellipse);
        for &u in &[-3.0, -0.5, 0.0, 0.7, 4.0] {
            let p = form.point(u).unwrap_or_else(Position::origin);
            assert_abs_diff_eq!(ellipse.to_conic().evaluate(&p), 0.0, epsilon = 1e-9);
        }
        let hyperbola = Hyperbola::new(Position::new(0.0, 1.0), 2.0, 1.0, 40.0);
        let form = RationalForm::exponential(&hyperbola);
        // s = 1 is the vertex
        let vertex = form.point(1.0).unwrap_or_else(Position::origin);
        assert!(is_same_point_with(&vertex, &hyperbola.point_at_t(0.0), 1e-12));
        let p = form.point(3.0).unwrap_or_else(Position::origin);
        assert_abs_diff_eq!(hyperbola.to_conic().evaluate(&p), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn circles() {
        let a = Circle::new(Position::new(0.0, 0.0), 1.0);
        let b = Circle::new(Position::new(1.0, 0.0), 1.0);
        let points = get_two_circles_intersection_points(&a, &b);
        assert_eq!(points.len(), 2);
        assert_abs_diff_eq!(points[0].x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(points[0].y.abs(), 3f64.sqrt() / 2.0, epsilon = 1e-12);
        let touching = Circle::new(Position::new(2.0, 0.0), 1.0);
        let points = get_two_circles_intersection_points(&a, &touching);
        assert_eq!(points.len(), 1);
        assert!(is_same_point_with(&points[0], &Position::new(1.0, 0.0), 1e-12));
        let far = Circle::new(Position::new(5.0, 0.0), 1.0);
        assert!(get_two_circles_intersection_points(&a, &far).is_empty());
        let inner = Circle::new(Position::new(0.1, 0.0), 0.2);
        assert!(get_two_circles_intersection_points(&a, &inner).is_empty());
    }

    #[test]
    fn line_and_circle() {
        let circle = Circle::new(Position::new(0.0, 2.0), 2.0);
        let points =
            get_general_form_line_circle_intersection_points(&GeneralFormLine::new(0.0, 1.0, -2.0), &circle);
        assert_eq!(points.len(), 2);
        assert_abs_diff_eq!(points[0].x.abs(), 2.0, epsilon = 1e-12);
        let tangent = GeneralFormLine::new(0.0, 1.0, 0.0);
        let points = get_general_form_line_circle_intersection_points(&tangent, &circle);
        assert_eq!(points.len(), 1);
        assert!(is_same_point_with(&points[0], &Position::origin(), 1e-12));
        let far = GeneralFormLine::new(0.0, 1.0, 1.0);
        assert!(get_general_form_line_circle_intersection_points(&far, &circle).is_empty());
    }
}
