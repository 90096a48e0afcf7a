use std::f64::consts::PI;

use crate::geometry::angle::{angle_in_range_with, merge_angle_ranges, normalize_angle, AngleRange};
use crate::geometry::conic::Conic;
use crate::geometry::position::{get_two_points_distance, is_same_point_with};
use crate::math::{
    get_points_bounding, is_same_number_with, is_zero, Position, TwoPointsFormRegion, Vector,
    DELTA2,
};

use super::arc::Arc;
use super::Derivatives;

/// An ellipse with radii `rx`, `ry` whose x axis is rotated by `angle` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Position,
    pub rx: f64,
    pub ry: f64,
    pub angle: f64,
}

impl Ellipse {
    #[must_use]
    pub fn new(center: Position, rx: f64, ry: f64, angle: f64) -> Self {
        Self {
            center,
            rx,
            ry,
            angle,
        }
    }

    fn axes(&self) -> (Vector, Vector) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        (Vector::new(cos, sin), Vector::new(-sin, cos))
    }

    /// Coordinates of `point` in the frame of the ellipse axes.
    #[must_use]
    pub fn to_local(&self, point: &Position) -> Vector {
        let (u, v) = self.axes();
        let d = point - self.center;
        Vector::new(d.dot(&u), d.dot(&v))
    }

    #[must_use]
    pub fn from_local(&self, local: &Vector) -> Position {
        let (u, v) = self.axes();
        self.center + u * local.x + v * local.y
    }

    /// Point at parametric angle `radian`.
    #[must_use]
    pub fn point_at_radian(&self, radian: f64) -> Position {
        let (sin, cos) = radian.sin_cos();
        self.from_local(&Vector::new(self.rx * cos, self.ry * sin))
    }

    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Position {
        self.point_at_radian(angle.to_radians())
    }

    /// Parametric angle of `point` in radians.
    #[must_use]
    pub fn radian_of_point(&self, point: &Position) -> f64 {
        let l = self.to_local(point);
        (l.y / self.ry).atan2(l.x / self.rx)
    }

    #[must_use]
    pub fn angle_of_point(&self, point: &Position) -> f64 {
        self.radian_of_point(point).to_degrees()
    }

    /// Derivatives with respect to the parametric angle in radians.
    #[must_use]
    pub fn derivatives_at_radian(&self, radian: f64) -> Derivatives {
        let (u, v) = self.axes();
        let (sin, cos) = radian.sin_cos();
        Derivatives {
            point: self.center + u * (self.rx * cos) + v * (self.ry * sin),
            first: u * (-self.rx * sin) + v * (self.ry * cos),
            second: u * (-self.rx * cos) + v * (-self.ry * sin),
        }
    }

    /// `(X/rx)² + (Y/ry)² - 1 = 0` in the axis frame.
    #[must_use]
    pub fn to_conic(&self) -> Conic {
        let local = Conic::new(
            1.0 / (self.rx * self.rx),
            0.0,
            1.0 / (self.ry * self.ry),
            0.0,
            0.0,
            -1.0,
        );
        Conic::from_local(&self.center, self.angle, &local)
    }

    /// Parametric angles (radians) where x and y reach their extremes.
    fn extreme_radians(&self) -> [f64; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let x = (-self.ry * sin).atan2(self.rx * cos);
        let y = (self.ry * cos).atan2(self.rx * sin);
        [x, x + PI, y, y + PI]
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let points: Vec<Position> = self
            .extreme_radians()
            .iter()
            .map(|r| self.point_at_radian(*r))
            .collect();
        get_points_bounding(&points)
            .unwrap_or_else(|| TwoPointsFormRegion::new(self.center, self.center))
    }

    #[must_use]
    pub fn is_circle(&self) -> bool {
        is_same_number_with(self.rx, self.ry, DELTA2)
    }
}

/// An ellipse restricted to a range of parametric angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseArc {
    pub center: Position,
    pub rx: f64,
    pub ry: f64,
    pub angle: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub counterclockwise: bool,
}

impl EllipseArc {
    #[must_use]
    pub fn new(ellipse: Ellipse, range: AngleRange) -> Self {
        Self {
            center: ellipse.center,
            rx: ellipse.rx,
            ry: ellipse.ry,
            angle: ellipse.angle,
            start_angle: range.start_angle,
            end_angle: range.end_angle,
            counterclockwise: range.counterclockwise,
        }
    }

    #[must_use]
    pub fn from_ellipse(ellipse: Ellipse) -> Self {
        Self::new(ellipse, AngleRange::full())
    }

    #[must_use]
    pub fn ellipse(&self) -> Ellipse {
        Ellipse::new(self.center, self.rx, self.ry, self.angle)
    }

    #[must_use]
    pub fn range(&self) -> AngleRange {
        AngleRange::new(self.start_angle, self.end_angle, self.counterclockwise)
    }

    #[must_use]
    pub fn start_point(&self) -> Position {
        self.ellipse().point_at_angle(self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Position {
        self.ellipse().point_at_angle(self.end_angle)
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        self.ellipse()
            .point_at_angle(self.range().angle_at_param(param))
    }

    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        self.range()
            .param_at_angle(self.ellipse().angle_of_point(point))
    }

    /// Derivatives with respect to the `[0, 1]` param.
    #[must_use]
    pub fn derivatives_at_param(&self, param: f64) -> Derivatives {
        let range = self.range();
        let k = range.direction() * range.sweep().to_radians();
        let d = self
            .ellipse()
            .derivatives_at_radian(range.angle_at_param(param).to_radians());
        Derivatives {
            point: d.point,
            first: d.first * k,
            second: d.second * (k * k),
        }
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let ellipse = self.ellipse();
        let range = self.range();
        let mut points = vec![self.start_point(), self.end_point()];
        for radian in ellipse.extreme_radians() {
            if angle_in_range_with(radian.to_degrees(), &range, 0.0) {
                points.push(ellipse.point_at_radian(radian));
            }
        }
        get_points_bounding(&points).unwrap_or_else(|| ellipse.bounding())
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.ellipse(), self.range().reversed())
    }

    /// Sub-arc between two params; `from > to` reverses the traversal.
    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        let range = self.range();
        let counterclockwise = if from > to {
            !self.counterclockwise
        } else {
            self.counterclockwise
        };
        Self::new(
            self.ellipse(),
            AngleRange::new(
                range.angle_at_param(from),
                range.angle_at_param(to),
                counterclockwise,
            ),
        )
    }

    /// The equivalent circular arc when both radii agree.
    #[must_use]
    pub fn to_arc(&self) -> Option<Arc> {
        if !self.ellipse().is_circle() {
            return None;
        }
        Some(Arc::new(
            self.center,
            self.rx,
            AngleRange::new(
                self.start_angle + self.angle,
                self.end_angle + self.angle,
                self.counterclockwise,
            ),
        ))
    }
}

/// Whether `point` lies on `ellipse`, measured along the ray from its center.
#[must_use]
pub fn point_is_on_ellipse(point: &Position, ellipse: &Ellipse, delta: f64) -> bool {
    let l = ellipse.to_local(point);
    let v = ((l.x / ellipse.rx).powi(2) + (l.y / ellipse.ry).powi(2)).sqrt();
    if v == 0.0 {
        return ellipse.rx.min(ellipse.ry) < delta;
    }
    (l.norm() * (v - 1.0) / v).abs() < delta
}

#[must_use]
pub fn point_is_on_ellipse_arc(point: &Position, arc: &EllipseArc, delta: f64) -> bool {
    if !point_is_on_ellipse(point, &arc.ellipse(), delta) {
        return false;
    }
    angle_in_range_with(arc.ellipse().angle_of_point(point), &arc.range(), 0.0)
        || is_same_point_with(point, &arc.start_point(), delta)
        || is_same_point_with(point, &arc.end_point(), delta)
}

/// Ellipse arc from SVG endpoint parameters.
///
/// `sweep == true` makes the parametric angle grow from `from` to `to`.
/// Radii too small to reach both points are scaled up uniformly.
#[must_use]
pub fn get_ellipse_arc_by_start_end(
    from: &Position,
    rx: f64,
    ry: f64,
    angle: f64,
    large_arc: bool,
    sweep: bool,
    to: &Position,
) -> Option<EllipseArc> {
    if is_zero(get_two_points_distance(from, to)) || is_zero(rx) || is_zero(ry) {
        return None;
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let hx = (from.x - to.x) / 2.0;
    let hy = (from.y - to.y) / 2.0;
    let x1 = cos * hx + sin * hy;
    let y1 = -sin * hx + cos * hy;
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }
    let numerator = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
    let denominator = rx * rx * y1 * y1 + ry * ry * x1 * x1;
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coefficient = sign * (numerator / denominator).max(0.0).sqrt();
    let cx1 = coefficient * rx * y1 / ry;
    let cy1 = -coefficient * ry * x1 / rx;
    let center = Position::new(
        cos * cx1 - sin * cy1 + (from.x + to.x) / 2.0,
        sin * cx1 + cos * cy1 + (from.y + to.y) / 2.0,
    );
    let start = ((y1 - cy1) / ry).atan2((x1 - cx1) / rx).to_degrees();
    let end = ((-y1 - cy1) / ry).atan2((-x1 - cx1) / rx).to_degrees();
    Some(EllipseArc::new(
        Ellipse::new(center, rx, ry, angle),
        AngleRange::new(start, end, !sweep),
    ))
}

/// Two ellipses describing the same point set.
///
/// Swapped radii with a quarter-turn rotation count as the same ellipse, and
/// circles ignore their rotation.
#[must_use]
pub fn is_same_ellipse(a: &Ellipse, b: &Ellipse) -> bool {
    if !is_same_point_with(&a.center, &b.center, DELTA2) {
        return false;
    }
    let same = |x: f64, y: f64| is_same_number_with(x, y, DELTA2);
    if a.is_circle() && b.is_circle() {
        return same(a.rx, b.rx);
    }
    let turn = normalize_angle(a.angle - b.angle) % 180.0;
    let aligned = same(turn, 0.0) || same(turn, 180.0);
    let quarter = same(turn, 90.0);
    (aligned && same(a.rx, b.rx) && same(a.ry, b.ry))
        || (quarter && same(a.rx, b.ry) && same(a.ry, b.rx))
}

/// Joins two arcs of the same ellipse frame when one ends where the other starts.
#[must_use]
pub fn merge_ellipse_arc(a: &EllipseArc, b: &EllipseArc) -> Option<EllipseArc> {
    let same = |x: f64, y: f64| is_same_number_with(x, y, DELTA2);
    if !is_same_point_with(&a.center, &b.center, DELTA2)
        || !same(a.rx, b.rx)
        || !same(a.ry, b.ry)
        || !same(normalize_angle(a.angle - b.angle), 0.0)
    {
        return None;
    }
    let range = merge_angle_ranges(&a.range(), &b.range())?;
    Some(EllipseArc::new(a.ellipse(), range))
}
