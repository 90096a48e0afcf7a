use crate::geometry::conic::Conic;
use crate::geometry::position::get_two_points_distance;
use crate::math::{
    calculate_equation1, calculate_equation2, cross, get_points_bounding, Polynomial, Position,
    TwoPointsFormRegion, Vector, DELTA1,
};

use super::{get_nearest_param, Derivatives};

/// Quadratic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCurve {
    pub from: Position,
    pub cp: Position,
    pub to: Position,
}

impl QuadraticCurve {
    #[must_use]
    pub fn new(from: Position, cp: Position, to: Position) -> Self {
        Self { from, cp, to }
    }

    /// Power-basis vectors `(A, B, C)` with `P(t) = A·t² + B·t + C`.
    #[must_use]
    pub fn power_basis(&self) -> (Vector, Vector, Vector) {
        let a = self.from.coords - self.cp.coords * 2.0 + self.to.coords;
        let b = (self.cp - self.from) * 2.0;
        (a, b, self.from.coords)
    }

    /// `x(t)` and `y(t)` as polynomials.
    #[must_use]
    pub fn polynomials(&self) -> [Polynomial; 2] {
        let (a, b, c) = self.power_basis();
        [
            Polynomial::quadratic(c.x, b.x, a.x),
            Polynomial::quadratic(c.y, b.y, a.y),
        ]
    }

    #[must_use]
    pub fn point_at_param(&self, t: f64) -> Position {
        let u = 1.0 - t;
        Position::from(
            self.from.coords * (u * u) + self.cp.coords * (2.0 * u * t) + self.to.coords * (t * t),
        )
    }

    #[must_use]
    pub fn derivatives_at_param(&self, t: f64) -> Derivatives {
        let (a, b, _) = self.power_basis();
        Derivatives {
            point: self.point_at_param(t),
            first: a * (2.0 * t) + b,
            second: a * 2.0,
        }
    }

    /// Implicit form `cross(B, P-C)·cross(A, B) + cross(A, P-C)² = 0`.
    ///
    /// Degenerates to a squared line when the control points are collinear.
    #[must_use]
    pub fn to_conic(&self) -> Conic {
        let (a, b, c) = self.power_basis();
        let k = cross(&a, &b);
        let (a1, b1, c1) = (-a.y, a.x, a.y * c.x - a.x * c.y);
        let (a2, b2, c2) = (-b.y, b.x, b.y * c.x - b.x * c.y);
        Conic::new(
            a1 * a1,
            2.0 * a1 * b1,
            b1 * b1,
            2.0 * a1 * c1 + k * a2,
            2.0 * b1 * c1 + k * b2,
            c1 * c1 + k * c2,
        )
    }

    /// Whether the control points are (nearly) collinear.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        let (a, b, _) = self.power_basis();
        let scale = a.norm() * b.norm();
        scale == 0.0 || (cross(&a, &b) / scale).abs() < DELTA1
    }

    /// Param of `point`, which may lie on the extended curve.
    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        let [x, y] = self.polynomials();
        param_by_coordinates(&x, &y, point, |t| self.point_at_param(t))
            .unwrap_or_else(|| get_nearest_param(|t| self.derivatives_at_param(t), point, 32))
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let (a, b, _) = self.power_basis();
        let mut points = vec![self.from, self.to];
        for t in calculate_equation1(2.0 * a.x, b.x, DELTA1)
            .into_iter()
            .chain(calculate_equation1(2.0 * a.y, b.y, DELTA1))
        {
            if t > 0.0 && t < 1.0 {
                points.push(self.point_at_param(t));
            }
        }
        bounding_or_point(&points, self.from)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.cp, self.from)
    }

    /// Sub-curve between two params; `from > to` reverses it.
    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        let points = [self.from, self.cp, self.to];
        Self::new(
            blossom(&points, &[from, from]),
            blossom(&points, &[from, to]),
            blossom(&points, &[to, to]),
        )
    }
}

/// Cubic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    pub from: Position,
    pub cp1: Position,
    pub cp2: Position,
    pub to: Position,
}

impl BezierCurve {
    #[must_use]
    pub fn new(from: Position, cp1: Position, cp2: Position, to: Position) -> Self {
        Self { from, cp1, cp2, to }
    }

    /// Power-basis vectors `[c0, c1, c2, c3]`, `P(t) = Σ cᵢ·tⁱ`.
    #[must_use]
    pub fn power_basis(&self) -> [Vector; 4] {
        let (p0, p1, p2, p3) = (
            self.from.coords,
            self.cp1.coords,
            self.cp2.coords,
            self.to.coords,
        );
        [
            p0,
            (p1 - p0) * 3.0,
            (p2 - p1 * 2.0 + p0) * 3.0,
            p3 - p2 * 3.0 + p1 * 3.0 - p0,
        ]
    }

    #[must_use]
    pub fn polynomials(&self) -> [Polynomial; 2] {
        let c = self.power_basis();
        [
            Polynomial::new(c.iter().map(|v| v.x).collect()),
            Polynomial::new(c.iter().map(|v| v.y).collect()),
        ]
    }

    #[must_use]
    pub fn point_at_param(&self, t: f64) -> Position {
        blossom(&[self.from, self.cp1, self.cp2, self.to], &[t, t, t])
    }

    #[must_use]
    pub fn derivatives_at_param(&self, t: f64) -> Derivatives {
        let [_, c1, c2, c3] = self.power_basis();
        Derivatives {
            point: self.point_at_param(t),
            first: c1 + c2 * (2.0 * t) + c3 * (3.0 * t * t),
            second: c2 * 2.0 + c3 * (6.0 * t),
        }
    }

    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        let [x, y] = self.polynomials();
        param_by_coordinates(&x, &y, point, |t| self.point_at_param(t))
            .unwrap_or_else(|| get_nearest_param(|t| self.derivatives_at_param(t), point, 64))
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let [_, c1, c2, c3] = self.power_basis();
        let mut points = vec![self.from, self.to];
        for t in calculate_equation2(3.0 * c3.x, 2.0 * c2.x, c1.x, DELTA1)
            .into_iter()
            .chain(calculate_equation2(3.0 * c3.y, 2.0 * c2.y, c1.y, DELTA1))
        {
            if t > 0.0 && t < 1.0 {
                points.push(self.point_at_param(t));
            }
        }
        bounding_or_point(&points, self.from)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.cp2, self.cp1, self.from)
    }

    /// Sub-curve between two params; `from > to` reverses it.
    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        let points = [self.from, self.cp1, self.cp2, self.to];
        Self::new(
            blossom(&points, &[from, from, from]),
            blossom(&points, &[from, from, to]),
            blossom(&points, &[from, to, to]),
            blossom(&points, &[to, to, to]),
        )
    }
}

/// Polar form of a Bézier curve, evaluated by de Casteljau with one
/// parameter per level. Equal arguments give the curve point.
fn blossom(points: &[Position], params: &[f64]) -> Position {
    let mut level: Vec<Vector> = points.iter().map(|p| p.coords).collect();
    for &t in params {
        level = level
            .windows(2)
            .map(|w| w[0] * (1.0 - t) + w[1] * t)
            .collect();
    }
    level.first().map_or(Position::origin(), |v| Position::from(*v))
}

fn bounding_or_point(points: &[Position], fallback: Position) -> TwoPointsFormRegion {
    get_points_bounding(points).unwrap_or_else(|| TwoPointsFormRegion::new(fallback, fallback))
}

/// Solves `x(t) = px` and `y(t) = py`, returning the candidate whose point is
/// closest to `point`, if it actually lands on it.
fn param_by_coordinates<F>(x: &Polynomial, y: &Polynomial, point: &Position, at: F) -> Option<f64>
where
    F: Fn(f64) -> Position,
{
    let shifted_x = x - &Polynomial::constant(point.x);
    let shifted_y = y - &Polynomial::constant(point.y);
    let candidates: Vec<f64> = shifted_x
        .roots(0.5, DELTA1)
        .into_iter()
        .chain(shifted_y.roots(0.5, DELTA1))
        .collect();
    let scale = 1.0 + point.coords.norm();
    candidates
        .into_iter()
        .map(|t| (t, get_two_points_distance(&at(t), point)))
        .filter(|(_, d)| *d < 1e-6 * scale)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(t, _)| t)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::position::is_same_point;
    use crate::math::DELTA2;

    fn quadratic() -> QuadraticCurve {
        QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 2.0),
            Position::new(2.0, 0.0),
        )
    }

    fn cubic() -> BezierCurve {
        BezierCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 4.0),
            Position::new(3.0, -4.0),
            Position::new(4.0, 1.0),
        )
    }

    #[test]
    fn quadratic_evaluation() {
        let q = quadratic();
        assert!(is_same_point(&q.point_at_param(0.5), &Position::new(1.0, 1.0)));
        let [x, y] = q.polynomials();
        assert_abs_diff_eq!(x.evaluate(0.25), q.point_at_param(0.25).x, epsilon = 1e-12);
        assert_abs_diff_eq!(y.evaluate(0.25), q.point_at_param(0.25).y, epsilon = 1e-12);
    }

    #[test]
    fn quadratic_implicit_form_vanishes_on_curve() {
        let q = quadratic();
        let conic = q.to_conic();
        for &t in &[-0.5, 0.0, 0.3, 1.0, 1.7] {
            assert_abs_diff_eq!(conic.evaluate(&q.point_at_param(t)), 0.0, epsilon = 1e-9);
        }
        assert!(conic.evaluate(&Position::new(1.0, 0.0)).abs() > 1e-3);
        assert!(!q.is_flat());
    }

    #[test]
    fn param_round_trip() {
        let q = quadratic();
        let c = cubic();
        for &t in &[0.0, 0.1, 0.5, 0.77, 1.0] {
            assert_abs_diff_eq!(q.param_at_point(&q.point_at_param(t)), t, epsilon = DELTA2);
            assert_abs_diff_eq!(c.param_at_point(&c.point_at_param(t)), t, epsilon = DELTA2);
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let c = cubic();
        let h = 1e-6;
        let t = 0.4;
        let d = c.derivatives_at_param(t);
        let numeric = (c.point_at_param(t + h) - c.point_at_param(t - h)) / (2.0 * h);
        assert_abs_diff_eq!(d.first.x, numeric.x, epsilon = 1e-5);
        assert_abs_diff_eq!(d.first.y, numeric.y, epsilon = 1e-5);
    }

    #[test]
    fn part_and_reverse() {
        let c = cubic();
        let part = c.part(0.2, 0.6);
        assert!(is_same_point(&part.point_at_param(0.5), &c.point_at_param(0.4)));
        let backwards = c.part(0.6, 0.2);
        assert!(is_same_point(&backwards.from, &c.point_at_param(0.6)));
        assert_eq!(c.reversed().reversed(), c);
        let q = quadratic().part(0.0, 0.5);
        assert!(is_same_point(&q.to, &Position::new(1.0, 1.0)));
    }

    #[test]
    fn bounding_includes_interior_extremes() {
        let b = quadratic().bounding();
        assert_abs_diff_eq!(b.end.y, 1.0, epsilon = 1e-12);
        let cb = cubic().bounding();
        assert!(cb.end.y > 1.0);
        assert!(cb.start.y < 0.0);
    }
}
