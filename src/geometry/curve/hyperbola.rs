use crate::geometry::conic::Conic;
use crate::geometry::position::{get_two_points_distance, is_same_point_with};
use crate::math::{
    get_points_bounding, is_between, is_same_number_with, Position, TwoPointsFormRegion, Vector,
    DELTA2,
};

use super::Derivatives;

/// The right branch of a hyperbola,
/// `P(t) = center + a·√(1+t²)·d + b·t·n` with `d` at `angle` degrees and `n`
/// its left normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperbola {
    pub center: Position,
    pub a: f64,
    pub b: f64,
    pub angle: f64,
}

impl Hyperbola {
    #[must_use]
    pub fn new(center: Position, a: f64, b: f64, angle: f64) -> Self {
        Self {
            center,
            a,
            b,
            angle,
        }
    }

    fn axes(&self) -> (Vector, Vector) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        (Vector::new(cos, sin), Vector::new(-sin, cos))
    }

    #[must_use]
    pub fn to_local(&self, point: &Position) -> Vector {
        let (d, n) = self.axes();
        let v = point - self.center;
        Vector::new(v.dot(&d), v.dot(&n))
    }

    #[must_use]
    pub fn point_at_t(&self, t: f64) -> Position {
        let (d, n) = self.axes();
        self.center + d * (self.a * (1.0 + t * t).sqrt()) + n * (self.b * t)
    }

    #[must_use]
    pub fn t_of_point(&self, point: &Position) -> f64 {
        self.to_local(point).y / self.b
    }

    #[must_use]
    pub fn derivatives_at_t(&self, t: f64) -> Derivatives {
        let (d, n) = self.axes();
        let s = 1.0 + t * t;
        Derivatives {
            point: self.point_at_t(t),
            first: d * (self.a * t / s.sqrt()) + n * self.b,
            second: d * (self.a / s.powf(1.5)),
        }
    }

    /// `(X/a)² - (Y/b)² - 1 = 0` in the axis frame. Covers both branches.
    #[must_use]
    pub fn to_conic(&self) -> Conic {
        let local = Conic::new(
            1.0 / (self.a * self.a),
            0.0,
            -1.0 / (self.b * self.b),
            0.0,
            0.0,
            -1.0,
        );
        Conic::from_local(&self.center, self.angle, &local)
    }

    /// Values of `t` where x, then y, reach an extreme.
    fn extreme_ts(&self) -> Vec<f64> {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        // a·cosφ·s = b·sinφ and a·sinφ·s = -b·cosφ with s = t/√(1+t²)
        [(self.b * sin, self.a * cos), (-self.b * cos, self.a * sin)]
            .iter()
            .filter(|(_, den)| *den != 0.0)
            .map(|(num, den)| num / den)
            .filter(|s| s.abs() < 1.0)
            .map(|s| s / (1.0 - s * s).sqrt())
            .collect()
    }
}

/// A hyperbola branch restricted to `t` in `t1 → t2`; `t1 > t2` runs backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperbolaSegment {
    pub center: Position,
    pub a: f64,
    pub b: f64,
    pub angle: f64,
    pub t1: f64,
    pub t2: f64,
}

impl HyperbolaSegment {
    #[must_use]
    pub fn new(hyperbola: Hyperbola, t1: f64, t2: f64) -> Self {
        Self {
            center: hyperbola.center,
            a: hyperbola.a,
            b: hyperbola.b,
            angle: hyperbola.angle,
            t1,
            t2,
        }
    }

    #[must_use]
    pub fn hyperbola(&self) -> Hyperbola {
        Hyperbola::new(self.center, self.a, self.b, self.angle)
    }

    #[must_use]
    pub fn t_at_param(&self, param: f64) -> f64 {
        self.t1 + (self.t2 - self.t1) * param
    }

    #[must_use]
    pub fn param_of_t(&self, t: f64) -> f64 {
        if self.t1 == self.t2 {
            return 0.0;
        }
        (t - self.t1) / (self.t2 - self.t1)
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        self.hyperbola().point_at_t(self.t_at_param(param))
    }

    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        self.param_of_t(self.hyperbola().t_of_point(point))
    }

    #[must_use]
    pub fn derivatives_at_param(&self, param: f64) -> Derivatives {
        let k = self.t2 - self.t1;
        let d = self.hyperbola().derivatives_at_t(self.t_at_param(param));
        Derivatives {
            point: d.point,
            first: d.first * k,
            second: d.second * (k * k),
        }
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let h = self.hyperbola();
        let mut points = vec![h.point_at_t(self.t1), h.point_at_t(self.t2)];
        for t in h.extreme_ts() {
            if is_between(t, self.t1, self.t2) {
                points.push(h.point_at_t(t));
            }
        }
        get_points_bounding(&points)
            .unwrap_or_else(|| TwoPointsFormRegion::new(self.center, self.center))
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.hyperbola(), self.t2, self.t1)
    }

    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        Self::new(self.hyperbola(), self.t_at_param(from), self.t_at_param(to))
    }
}

/// Whether `point` lies on the branch within `delta`.
#[must_use]
pub fn point_is_on_hyperbola(point: &Position, hyperbola: &Hyperbola, delta: f64) -> bool {
    let t = hyperbola.t_of_point(point);
    get_two_points_distance(&hyperbola.point_at_t(t), point) < delta
}

#[must_use]
pub fn point_is_on_hyperbola_segment(
    point: &Position,
    segment: &HyperbolaSegment,
    delta: f64,
) -> bool {
    let h = segment.hyperbola();
    point_is_on_hyperbola(point, &h, delta) && is_between(h.t_of_point(point), segment.t1, segment.t2)
}

#[must_use]
pub fn is_same_hyperbola(a: &Hyperbola, b: &Hyperbola) -> bool {
    let same = |x: f64, y: f64| is_same_number_with(x, y, DELTA2);
    let turn = (a.angle - b.angle).rem_euclid(360.0);
    is_same_point_with(&a.center, &b.center, DELTA2)
        && same(a.a, b.a)
        && same(a.b, b.b)
        && (same(turn, 0.0) || same(turn, 360.0))
}

/// Joins two segments of the same branch when one ends where the other starts
/// and both run the same way.
#[must_use]
pub fn merge_hyperbola_segment(
    a: &HyperbolaSegment,
    b: &HyperbolaSegment,
) -> Option<HyperbolaSegment> {
    if !is_same_hyperbola(&a.hyperbola(), &b.hyperbola()) {
        return None;
    }
    if (a.t2 - a.t1) * (b.t2 - b.t1) <= 0.0 {
        return None;
    }
    let same = |x: f64, y: f64| is_same_number_with(x, y, DELTA2);
    if same(a.t2, b.t1) {
        Some(HyperbolaSegment::new(a.hyperbola(), a.t1, b.t2))
    } else if same(b.t2, a.t1) {
        Some(HyperbolaSegment::new(a.hyperbola(), b.t1, a.t2))
    } else {
        None
    }
}
