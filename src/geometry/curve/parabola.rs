use crate::geometry::conic::Conic;
use crate::geometry::position::get_two_points_distance;
use crate::math::{Position, Vector};

use super::bezier::QuadraticCurve;
use super::Derivatives;

/// Parabola `P(t) = vertex + t·n + p·t²·d`, where `d` is the axis direction at
/// `angle` degrees and `n` its left normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    pub vertex: Position,
    pub p: f64,
    pub angle: f64,
}

impl Parabola {
    #[must_use]
    pub fn new(vertex: Position, p: f64, angle: f64) -> Self {
        Self { vertex, p, angle }
    }

    fn axes(&self) -> (Vector, Vector) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        (Vector::new(cos, sin), Vector::new(-sin, cos))
    }

    /// Coordinates of `point` along the axis and along the normal.
    #[must_use]
    pub fn to_local(&self, point: &Position) -> Vector {
        let (d, n) = self.axes();
        let v = point - self.vertex;
        Vector::new(v.dot(&d), v.dot(&n))
    }

    #[must_use]
    pub fn point_at_t(&self, t: f64) -> Position {
        let (d, n) = self.axes();
        self.vertex + n * t + d * (self.p * t * t)
    }

    /// The `t` whose point has the same normal coordinate as `point`.
    #[must_use]
    pub fn t_of_point(&self, point: &Position) -> f64 {
        self.to_local(point).y
    }

    #[must_use]
    pub fn derivatives_at_t(&self, t: f64) -> Derivatives {
        let (d, n) = self.axes();
        Derivatives {
            point: self.point_at_t(t),
            first: n + d * (2.0 * self.p * t),
            second: d * (2.0 * self.p),
        }
    }

    /// Focus point, a quarter of `1/p` along the axis from the vertex.
    #[must_use]
    pub fn focus(&self) -> Position {
        let (d, _) = self.axes();
        self.vertex + d * (1.0 / (4.0 * self.p))
    }

    /// `p·Y² - X = 0` in the axis frame.
    #[must_use]
    pub fn to_conic(&self) -> Conic {
        Conic::from_local(
            &self.vertex,
            self.angle,
            &Conic::new(0.0, 0.0, self.p, -1.0, 0.0, 0.0),
        )
    }
}

/// Parabola restricted to `t` in `t1 → t2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParabolaSegment {
    pub vertex: Position,
    pub p: f64,
    pub angle: f64,
    pub t1: f64,
    pub t2: f64,
}

impl ParabolaSegment {
    #[must_use]
    pub fn new(parabola: Parabola, t1: f64, t2: f64) -> Self {
        Self {
            vertex: parabola.vertex,
            p: parabola.p,
            angle: parabola.angle,
            t1,
            t2,
        }
    }

    #[must_use]
    pub fn parabola(&self) -> Parabola {
        Parabola::new(self.vertex, self.p, self.angle)
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        self.parabola()
            .point_at_t(self.t1 + (self.t2 - self.t1) * param)
    }

    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        if self.t1 == self.t2 {
            return 0.0;
        }
        (self.parabola().t_of_point(point) - self.t1) / (self.t2 - self.t1)
    }
}

/// Whether `point` lies on `parabola` within `delta`.
#[must_use]
pub fn point_is_on_parabola(point: &Position, parabola: &Parabola, delta: f64) -> bool {
    let t = parabola.t_of_point(point);
    get_two_points_distance(&parabola.point_at_t(t), point) < delta
}

/// The quadratic Bézier covering exactly the same points as the segment.
#[must_use]
pub fn parabola_segment_to_quadratic_curve(segment: &ParabolaSegment) -> QuadraticCurve {
    let parabola = segment.parabola();
    let from = parabola.derivatives_at_t(segment.t1);
    let to = parabola.point_at_t(segment.t2);
    QuadraticCurve::new(
        from.point,
        from.point + from.first * ((segment.t2 - segment.t1) / 2.0),
        to,
    )
}
