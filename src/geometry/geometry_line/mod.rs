use crate::geometry::curve::arc::{merge_arc, point_is_on_arc};
use crate::geometry::curve::ellipse::{merge_ellipse_arc, point_is_on_ellipse_arc};
use crate::geometry::curve::hyperbola::{merge_hyperbola_segment, point_is_on_hyperbola_segment};
use crate::geometry::curve::line::{get_segment_param_at_point, point_is_on_line_segment};
use crate::geometry::curve::ray::point_is_on_ray;
use crate::geometry::curve::{
    Arc, BezierCurve, Derivatives, EllipseArc, HyperbolaSegment, Nurbs, QuadraticCurve, Ray,
};
use crate::geometry::position::{get_two_points_distance, is_same_point};
use crate::math::{
    cross, is_between_with, is_zero, larger_than_with, less_than_with,
    merge_boundings, radian_to_angle, romberg_integral, Position, TwoPointsFormRegion, Vector,
    DELTA1, DELTA2,
};

/// Which parts of a curve count when filtering params: the extension before
/// the start, the curve itself, the extension past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendType {
    pub head: bool,
    pub body: bool,
    pub tail: bool,
}

impl Default for ExtendType {
    fn default() -> Self {
        Self {
            head: false,
            body: true,
            tail: false,
        }
    }
}

impl ExtendType {
    /// The whole supporting curve.
    #[must_use]
    pub fn all() -> Self {
        Self {
            head: true,
            body: true,
            tail: true,
        }
    }
}

/// A single drawable curve piece.
///
/// Every variant except `Ray` runs over params `[0, 1]`. Ray params are signed
/// distances along the direction of travel.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryLine {
    Segment([Position; 2]),
    Arc(Arc),
    EllipseArc(EllipseArc),
    QuadraticCurve(QuadraticCurve),
    BezierCurve(BezierCurve),
    Nurbs(Nurbs),
    Ray(Ray),
    HyperbolaSegment(HyperbolaSegment),
}

impl From<Arc> for GeometryLine {
    fn from(value: Arc) -> Self {
        Self::Arc(value)
    }
}

impl From<EllipseArc> for GeometryLine {
    fn from(value: EllipseArc) -> Self {
        Self::EllipseArc(value)
    }
}

impl From<QuadraticCurve> for GeometryLine {
    fn from(value: QuadraticCurve) -> Self {
        Self::QuadraticCurve(value)
    }
}

impl From<BezierCurve> for GeometryLine {
    fn from(value: BezierCurve) -> Self {
        Self::BezierCurve(value)
    }
}

impl From<Nurbs> for GeometryLine {
    fn from(value: Nurbs) -> Self {
        Self::Nurbs(value)
    }
}

impl From<Ray> for GeometryLine {
    fn from(value: Ray) -> Self {
        Self::Ray(value)
    }
}

impl From<HyperbolaSegment> for GeometryLine {
    fn from(value: HyperbolaSegment) -> Self {
        Self::HyperbolaSegment(value)
    }
}

impl GeometryLine {
    /// Finite ends of the curve. Only rays have missing ends.
    #[must_use]
    pub fn start_and_end(&self) -> (Option<Position>, Option<Position>) {
        match self {
            Self::Segment([a, b]) => (Some(*a), Some(*b)),
            Self::Arc(arc) => (Some(arc.start_point()), Some(arc.end_point())),
            Self::EllipseArc(arc) => (Some(arc.start_point()), Some(arc.end_point())),
            Self::QuadraticCurve(curve) => (Some(curve.from), Some(curve.to)),
            Self::BezierCurve(curve) => (Some(curve.from), Some(curve.to)),
            Self::Nurbs(nurbs) => (Some(nurbs.start_point()), Some(nurbs.end_point())),
            Self::Ray(ray) => ray.start_and_end(),
            Self::HyperbolaSegment(segment) => {
                (Some(segment.point_at_param(0.0)), Some(segment.point_at_param(1.0)))
            }
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Position> {
        self.start_and_end().0
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Position> {
        self.start_and_end().1
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        match self {
            Self::Segment([a, b]) => a + (b - a) * param,
            Self::Arc(arc) => arc.point_at_param(param),
            Self::EllipseArc(arc) => arc.point_at_param(param),
            Self::QuadraticCurve(curve) => curve.point_at_param(param),
            Self::BezierCurve(curve) => curve.point_at_param(param),
            Self::Nurbs(nurbs) => nurbs.point_at_param(param),
            Self::Ray(ray) => ray.point_at_param(param),
            Self::HyperbolaSegment(segment) => segment.point_at_param(param),
        }
    }

    /// Param of `point`, which is assumed to lie on the curve or its extension.
    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        match self {
            Self::Segment([a, b]) => get_segment_param_at_point(a, b, point),
            Self::Arc(arc) => arc.param_at_point(point),
            Self::EllipseArc(arc) => arc.param_at_point(point),
            Self::QuadraticCurve(curve) => curve.param_at_point(point),
            Self::BezierCurve(curve) => curve.param_at_point(point),
            Self::Nurbs(nurbs) => nurbs.param_at_point(point),
            Self::Ray(ray) => ray.param_at_point(point),
            Self::HyperbolaSegment(segment) => segment.param_at_point(point),
        }
    }

    #[must_use]
    pub fn derivatives_at_param(&self, param: f64) -> Derivatives {
        match self {
            Self::Segment([a, b]) => Derivatives {
                point: a + (b - a) * param,
                first: b - a,
                second: Vector::zeros(),
            },
            Self::Arc(arc) => arc.derivatives_at_param(param),
            Self::EllipseArc(arc) => arc.derivatives_at_param(param),
            Self::QuadraticCurve(curve) => curve.derivatives_at_param(param),
            Self::BezierCurve(curve) => curve.derivatives_at_param(param),
            Self::Nurbs(nurbs) => nurbs.derivatives_at_param(param),
            Self::Ray(ray) => ray.derivatives_at_param(param),
            Self::HyperbolaSegment(segment) => segment.derivatives_at_param(param),
        }
    }

    /// Direction of travel in radians.
    #[must_use]
    pub fn tangent_radian_at_param(&self, param: f64) -> f64 {
        match self {
            Self::Segment([a, b]) => {
                let d = b - a;
                d.y.atan2(d.x)
            }
            _ => self.derivatives_at_param(param).tangent_radian(),
        }
    }

    /// Signed curvature; positive where the curve turns left.
    #[must_use]
    pub fn curvature_at_param(&self, param: f64) -> f64 {
        match self {
            Self::Segment(_) | Self::Ray(_) => 0.0,
            Self::Arc(arc) => arc.curvature(),
            _ => self.derivatives_at_param(param).curvature(),
        }
    }

    /// Params at which the body starts and ends; rays open to infinity.
    #[must_use]
    pub fn param_range(&self) -> (f64, f64) {
        match self {
            Self::Ray(ray) if ray.bidirectional => (f64::NEG_INFINITY, f64::INFINITY),
            Self::Ray(ray) if ray.reversed => (f64::NEG_INFINITY, 0.0),
            Self::Ray(_) => (0.0, f64::INFINITY),
            _ => (0.0, 1.0),
        }
    }

    /// Whether `param` falls on a part of the curve selected by `extend`.
    #[must_use]
    pub fn is_valid_param(&self, param: f64, extend: &ExtendType) -> bool {
        if !param.is_finite() {
            return false;
        }
        let (before, after) = match self {
            Self::Ray(ray) if ray.bidirectional => (false, false),
            Self::Ray(ray) if ray.reversed => (false, larger_than_with(param, 0.0, DELTA2)),
            Self::Ray(_) => (less_than_with(param, 0.0, DELTA2), false),
            Self::Arc(arc) if arc.range().is_full() => (false, false),
            Self::EllipseArc(arc) if arc.range().is_full() => (false, false),
            _ => (
                less_than_with(param, 0.0, DELTA2),
                larger_than_with(param, 1.0, DELTA2),
            ),
        };
        if before {
            extend.head
        } else if after {
            extend.tail
        } else {
            extend.body
        }
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        match self {
            Self::Segment([a, b]) => TwoPointsFormRegion::new(*a, *b),
            Self::Arc(arc) => arc.bounding(),
            Self::EllipseArc(arc) => arc.bounding(),
            Self::QuadraticCurve(curve) => curve.bounding(),
            Self::BezierCurve(curve) => curve.bounding(),
            Self::Nurbs(nurbs) => nurbs.bounding(),
            Self::Ray(ray) => ray.bounding(),
            Self::HyperbolaSegment(segment) => segment.bounding(),
        }
    }

    /// Sub-curve between two params; `from > to` reverses it.
    ///
    /// For rays an infinite param keeps that side open, so a ray cut at two
    /// finite distances becomes a segment.
    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        match self {
            Self::Segment(_) => Self::Segment([self.point_at_param(from), self.point_at_param(to)]),
            Self::Arc(arc) => Self::Arc(arc.part(from, to)),
            Self::EllipseArc(arc) => Self::EllipseArc(arc.part(from, to)),
            Self::QuadraticCurve(curve) => Self::QuadraticCurve(curve.part(from, to)),
            Self::BezierCurve(curve) => Self::BezierCurve(curve.part(from, to)),
            Self::Nurbs(nurbs) => Self::Nurbs(nurbs.part(from, to)),
            Self::Ray(ray) => get_ray_part(ray, from, to),
            Self::HyperbolaSegment(segment) => Self::HyperbolaSegment(segment.part(from, to)),
        }
    }

    /// The same points traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Segment([a, b]) => Self::Segment([*b, *a]),
            Self::Arc(arc) => Self::Arc(arc.reversed()),
            Self::EllipseArc(arc) => Self::EllipseArc(arc.reversed()),
            Self::QuadraticCurve(curve) => Self::QuadraticCurve(curve.reversed()),
            Self::BezierCurve(curve) => Self::BezierCurve(curve.reversed()),
            Self::Nurbs(nurbs) => Self::Nurbs(nurbs.reversed()),
            Self::Ray(ray) => Self::Ray(ray.reversed_ray()),
            Self::HyperbolaSegment(segment) => Self::HyperbolaSegment(segment.reversed()),
        }
    }
}

fn get_ray_part(ray: &Ray, from: f64, to: f64) -> GeometryLine {
    let d = ray.travel_direction();
    let travel = radian_to_angle(d.y.atan2(d.x));
    match (from.is_finite(), to.is_finite()) {
        (true, true) => GeometryLine::Segment([ray.point_at_param(from), ray.point_at_param(to)]),
        (true, false) => {
            let angle = if to > from { travel } else { travel + 180.0 };
            GeometryLine::Ray(Ray::new(ray.point_at_param(from), angle))
        }
        (false, true) => {
            let incoming = if from < to { travel } else { travel + 180.0 };
            GeometryLine::Ray(Ray {
                origin: ray.point_at_param(to),
                angle: incoming + 180.0,
                bidirectional: false,
                reversed: true,
            })
        }
        (false, false) => {
            let mut line = Ray::line(ray.origin, ray.angle);
            line.reversed = ray.reversed != (from > to);
            GeometryLine::Ray(line)
        }
    }
}

/// Whether `point` lies on `line` within `delta`.
#[must_use]
pub fn point_is_on_geometry_line(point: &Position, line: &GeometryLine, delta: f64) -> bool {
    match line {
        GeometryLine::Segment([a, b]) => point_is_on_line_segment(point, a, b, delta),
        GeometryLine::Arc(arc) => point_is_on_arc(point, arc, delta),
        GeometryLine::EllipseArc(arc) => point_is_on_ellipse_arc(point, arc, delta),
        GeometryLine::Ray(ray) => point_is_on_ray(point, ray, delta),
        GeometryLine::HyperbolaSegment(segment) => {
            point_is_on_hyperbola_segment(point, segment, delta)
        }
        GeometryLine::QuadraticCurve(_) | GeometryLine::BezierCurve(_) | GeometryLine::Nurbs(_) => {
            let param = line.param_at_point(point);
            is_between_with(param, 0.0, 1.0, DELTA2)
                && get_two_points_distance(&line.point_at_param(param), point) < delta
        }
    }
}

/// Drops degenerate pieces and rewrites pieces as simpler variants where
/// possible. `None` means nothing drawable is left.
#[must_use]
pub fn optimize_geometry_line(line: &GeometryLine) -> Option<GeometryLine> {
    match line {
        GeometryLine::Segment([a, b]) => (!is_same_point(a, b)).then(|| line.clone()),
        GeometryLine::Arc(arc) => {
            (!is_zero(arc.r) && !arc.range().is_degenerate()).then(|| line.clone())
        }
        GeometryLine::EllipseArc(arc) => {
            if is_zero(arc.rx) || is_zero(arc.ry) || arc.range().is_degenerate() {
                return None;
            }
            Some(arc.to_arc().map_or_else(|| line.clone(), GeometryLine::Arc))
        }
        GeometryLine::QuadraticCurve(curve) => {
            optimize_control_points(&[curve.from, curve.cp, curve.to]).or_else(|| Some(line.clone()))
        }
        GeometryLine::BezierCurve(curve) => {
            optimize_control_points(&[curve.from, curve.cp1, curve.cp2, curve.to])
                .or_else(|| Some(line.clone()))
        }
        GeometryLine::Nurbs(nurbs) => {
            if nurbs.validate().is_err() {
                return None;
            }
            if nurbs.weights.is_none() {
                if let Some(simple) = optimize_control_points(&nurbs.points) {
                    return Some(simple);
                }
            }
            if nurbs.points.iter().all(|p| is_same_point(p, &nurbs.points[0])) {
                return None;
            }
            Some(line.clone())
        }
        GeometryLine::Ray(_) => Some(line.clone()),
        GeometryLine::HyperbolaSegment(segment) => (!is_zero(segment.a)
            && !is_zero(segment.b)
            && !is_zero(segment.t2 - segment.t1))
            .then(|| line.clone()),
    }
}

/// A control polygon that runs straight and monotonically from its first point
/// to its last describes a segment.
fn optimize_control_points(points: &[Position]) -> Option<GeometryLine> {
    let (first, last) = (points.first()?, points.last()?);
    if is_same_point(first, last) {
        return None;
    }
    let d = last - first;
    let length = d.norm();
    let straight = points.iter().all(|p| {
        let v = p - first;
        is_zero(cross(&d, &v) / length)
            && is_between_with(v.dot(&d) / (length * length), 0.0, 1.0, DELTA1)
    });
    let monotonic = points
        .windows(2)
        .all(|w| (w[1] - w[0]).dot(&d) >= 0.0);
    (straight && monotonic).then(|| GeometryLine::Segment([*first, *last]))
}

/// Joins two pieces into one when `b` continues `a` on the same support.
#[must_use]
pub fn merge_geometry_lines(a: &GeometryLine, b: &GeometryLine) -> Option<GeometryLine> {
    match (a, b) {
        (GeometryLine::Segment([p0, p1]), GeometryLine::Segment([q0, q1])) => {
            continues_straight(p0, p1, q0, q1).then(|| GeometryLine::Segment([*p0, *q1]))
        }
        (GeometryLine::Arc(x), GeometryLine::Arc(y)) => {
            if !is_same_point(&x.end_point(), &y.start_point()) {
                return None;
            }
            merge_arc(x, y).map(GeometryLine::Arc)
        }
        (GeometryLine::EllipseArc(x), GeometryLine::EllipseArc(y)) => {
            merge_ellipse_arc(x, y).map(GeometryLine::EllipseArc)
        }
        (GeometryLine::HyperbolaSegment(x), GeometryLine::HyperbolaSegment(y)) => {
            if !is_same_point(&x.point_at_param(1.0), &y.point_at_param(0.0)) {
                return None;
            }
            merge_hyperbola_segment(x, y).map(GeometryLine::HyperbolaSegment)
        }
        (GeometryLine::Segment([p0, p1]), GeometryLine::Ray(ray))
            if !ray.bidirectional && !ray.reversed =>
        {
            let far = ray.point_at_param(1.0);
            continues_straight(p0, p1, &ray.origin, &far)
                .then(|| GeometryLine::Ray(Ray { origin: *p0, ..*ray }))
        }
        (GeometryLine::Ray(ray), GeometryLine::Segment([q0, q1]))
            if !ray.bidirectional && ray.reversed =>
        {
            let near = ray.point_at_param(-1.0);
            continues_straight(&near, &ray.origin, q0, q1)
                .then(|| GeometryLine::Ray(Ray { origin: *q1, ..*ray }))
        }
        (GeometryLine::Ray(x), GeometryLine::Ray(y))
            if !x.bidirectional && !y.bidirectional && x.reversed && !y.reversed =>
        {
            let near = x.point_at_param(-1.0);
            let far = y.point_at_param(1.0);
            continues_straight(&near, &x.origin, &y.origin, &far)
                .then(|| GeometryLine::Ray(Ray::line(y.origin, y.angle)))
        }
        _ => None,
    }
}

fn continues_straight(p0: &Position, p1: &Position, q0: &Position, q1: &Position) -> bool {
    if !is_same_point(p1, q0) {
        return false;
    }
    let u = p1 - p0;
    let v = q1 - q0;
    let scale = u.norm() * v.norm();
    scale > 0.0 && is_zero(cross(&u, &v) / scale) && u.dot(&v) > 0.0
}

/// Optimizes every piece, then merges neighbours, including the closing pair
/// of a loop.
#[must_use]
pub fn optimize_geometry_lines(lines: &[GeometryLine]) -> Vec<GeometryLine> {
    let mut result: Vec<GeometryLine> = Vec::with_capacity(lines.len());
    for line in lines.iter().filter_map(optimize_geometry_line) {
        if let Some(last) = result.last_mut() {
            if let Some(merged) = merge_geometry_lines(last, &line) {
                *last = merged;
                continue;
            }
        }
        result.push(line);
    }
    if result.len() > 1 {
        let merged = match (result.last(), result.first()) {
            (Some(last), Some(first)) => merge_geometry_lines(last, first),
            _ => None,
        };
        if let Some(merged) = merged {
            result.pop();
            result[0] = merged;
        }
    }
    result
}

#[must_use]
pub fn reverse_geometry_lines(lines: &[GeometryLine]) -> Vec<GeometryLine> {
    lines.iter().rev().map(GeometryLine::reversed).collect()
}

/// Splits a list into runs whose consecutive pieces are connected.
#[must_use]
pub fn get_separated_geometry_lines(lines: &[GeometryLine]) -> Vec<Vec<GeometryLine>> {
    let mut result: Vec<Vec<GeometryLine>> = Vec::new();
    let mut previous_end: Option<Position> = None;
    for line in lines {
        let connected = match (previous_end, line.start_point()) {
            (Some(end), Some(start)) => is_same_point(&end, &start),
            _ => false,
        };
        match result.last_mut() {
            Some(current) if connected => current.push(line.clone()),
            _ => result.push(vec![line.clone()]),
        }
        previous_end = line.end_point();
    }
    result
}

/// Whether the chain ends where it starts.
#[must_use]
pub fn is_geometry_lines_closed(lines: &[GeometryLine]) -> bool {
    let start = lines.first().and_then(GeometryLine::start_point);
    let end = lines.last().and_then(GeometryLine::end_point);
    match (start, end) {
        (Some(start), Some(end)) => is_same_point(&start, &end),
        _ => false,
    }
}

#[must_use]
pub fn get_geometry_lines_bounding(lines: &[GeometryLine]) -> Option<TwoPointsFormRegion> {
    let regions: Vec<TwoPointsFormRegion> = lines.iter().map(GeometryLine::bounding).collect();
    merge_boundings(&regions)
}

/// Signed area enclosed by a closed chain, by Green's theorem.
///
/// Positive when the loop turns the way angles grow. Rays contribute nothing.
#[must_use]
pub fn get_geometry_lines_signed_area(lines: &[GeometryLine]) -> f64 {
    lines.iter().map(get_green_integral).sum()
}

/// `½∮(x·dy - y·dx)` along one piece.
fn get_green_integral(line: &GeometryLine) -> f64 {
    match line {
        GeometryLine::Segment([a, b]) => (a.x * b.y - b.x * a.y) / 2.0,
        GeometryLine::Ray(_) => 0.0,
        GeometryLine::Arc(arc) => {
            let sweep = arc.signed_sweep_radian();
            let t1 = arc.start_angle.to_radians();
            let t2 = t1 + sweep;
            let (r, c) = (arc.r, arc.center);
            (r * r * sweep + r * c.x * (t2.sin() - t1.sin()) - r * c.y * (t2.cos() - t1.cos()))
                / 2.0
        }
        _ => {
            romberg_integral(
                0.0,
                1.0,
                |t| {
                    let d = line.derivatives_at_param(t);
                    d.point.x * d.first.y - d.point.y * d.first.x
                },
                DELTA2,
            ) / 2.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use std::f64::consts::PI;

    use super::*;
    use crate::geometry::angle::AngleRange;
    use crate::geometry::curve::{Ellipse, Hyperbola};

    fn samples() -> Vec<GeometryLine> {
        vec![
            GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(3.0, 4.0)]),
            Arc::new(Position::new(1.0, 1.0), 2.0, AngleRange::new(10.0, 250.0, false)).into(),
            EllipseArc::new(
                Ellipse::new(Position::new(0.0, 0.0), 3.0, 1.0, 30.0),
                AngleRange::new(200.0, 20.0, true),
            )
            .into(),
            QuadraticCurve::new(Position::new(0.0, 0.0), Position::new(1.0, 2.0), Position::new(3.0, 0.0))
                .into(),
            BezierCurve::new(
                Position::new(0.0, 0.0),
                Position::new(1.0, 3.0),
                Position::new(3.0, -2.0),
                Position::new(4.0, 1.0),
            )
            .into(),
            Nurbs::new(
                vec![
                    Position::new(0.0, 0.0),
                    Position::new(1.0, 2.0),
                    Position::new(3.0, 2.0),
                    Position::new(5.0, 0.0),
                    Position::new(6.0, 1.0),
                ],
                3,
            )
            .into(),
            Ray::new(Position::new(1.0, 1.0), 30.0).into(),
            HyperbolaSegment::new(Hyperbola::new(Position::new(0.0, 0.0), 1.0, 2.0, 15.0), -1.0, 2.0)
                .into(),
        ]
    }

    #[test]
    fn param_round_trip_for_every_variant() {
        for line in samples() {
            let params: &[f64] = if matches!(line, GeometryLine::Ray(_)) {
                &[0.0, 2.5, 10.0]
            } else {
                &[0.0, 0.3, 0.75, 1.0]
            };
            for &t in params {
                let p = line.point_at_param(t);
                assert_abs_diff_eq!(line.param_at_point(&p), t, epsilon = DELTA2);
                assert!(point_is_on_geometry_line(&p, &line, DELTA2), "{line:?} at {t}");
            }
        }
    }

    #[test]
    fn reversing_twice_is_identity() {
        for line in samples() {
            assert_eq!(line.reversed().reversed(), line);
            if let (Some(start), Some(end)) = line.start_and_end() {
                let (r_start, r_end) = line.reversed().start_and_end();
                assert!(is_same_point(&r_start.unwrap(), &end));
                assert!(is_same_point(&r_end.unwrap(), &start));
            }
        }
    }

    #[test]
    fn part_matches_points() {
        for line in samples() {
            if matches!(line, GeometryLine::Ray(_)) {
                continue;
            }
            let part = line.part(0.2, 0.6);
            assert!(is_same_point(&part.point_at_param(0.0), &line.point_at_param(0.2)));
            assert!(is_same_point(&part.point_at_param(1.0), &line.point_at_param(0.6)));
        }
    }

    #[test]
    fn ray_parts() {
        let ray = GeometryLine::Ray(Ray::new(Position::new(0.0, 0.0), 0.0));
        assert_eq!(
            ray.part(1.0, 3.0),
            GeometryLine::Segment([Position::new(1.0, 0.0), Position::new(3.0, 0.0)])
        );
        let tail = ray.part(2.0, f64::INFINITY);
        assert_eq!(tail.start_point(), Some(Position::new(2.0, 0.0)));
        let head = ray.part(f64::NEG_INFINITY, 2.0);
        assert_eq!(head.start_and_end().0, None);
        assert!(is_same_point(&head.end_point().unwrap(), &Position::new(2.0, 0.0)));
        assert!(point_is_on_geometry_line(&Position::new(-5.0, 0.0), &head, DELTA2));
    }

    #[test]
    fn extend_type_filters_params() {
        let segment = GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(1.0, 0.0)]);
        assert!(segment.is_valid_param(0.5, &ExtendType::default()));
        assert!(!segment.is_valid_param(-0.5, &ExtendType::default()));
        assert!(segment.is_valid_param(-0.5, &ExtendType::all()));
        let tail_only = ExtendType {
            head: false,
            body: false,
            tail: true,
        };
        assert!(segment.is_valid_param(1.5, &tail_only));
        assert!(!segment.is_valid_param(0.5, &tail_only));
        let ray = GeometryLine::Ray(Ray::new(Position::new(0.0, 0.0), 0.0));
        assert!(ray.is_valid_param(100.0, &ExtendType::default()));
        assert!(!ray.is_valid_param(-1.0, &ExtendType::default()));
    }

    #[test]
    fn optimize_simplifies() {
        let circle_like = GeometryLine::EllipseArc(EllipseArc::new(
            Ellipse::new(Position::new(0.0, 0.0), 2.0, 2.0, 10.0),
            AngleRange::new(0.0, 90.0, false),
        ));
        assert!(matches!(optimize_geometry_line(&circle_like), Some(GeometryLine::Arc(_))));
        let flat = GeometryLine::QuadraticCurve(QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(2.0, 2.0),
        ));
        assert_eq!(
            optimize_geometry_line(&flat),
            Some(GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(2.0, 2.0)]))
        );
        // a flat curve that folds back is not a segment
        let folded = GeometryLine::QuadraticCurve(QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(3.0, 0.0),
            Position::new(1.0, 0.0),
        ));
        assert!(matches!(optimize_geometry_line(&folded), Some(GeometryLine::QuadraticCurve(_))));
        let point = GeometryLine::Segment([Position::new(1.0, 1.0), Position::new(1.0, 1.0)]);
        assert_eq!(optimize_geometry_line(&point), None);
    }

    #[test]
    fn straight_control_polygons_become_segments() {
        let (start, end) = (Position::new(0.0, 0.0), Position::new(3.0, 0.0));
        let cubic = GeometryLine::BezierCurve(BezierCurve::new(
            start,
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
            end,
        ));
        assert_eq!(optimize_geometry_line(&cubic), Some(GeometryLine::Segment([start, end])));
        let nurbs = GeometryLine::Nurbs(Nurbs::new(
            vec![start, Position::new(1.0, 0.0), Position::new(2.0, 0.0), end],
            2,
        ));
        assert_eq!(optimize_geometry_line(&nurbs), Some(GeometryLine::Segment([start, end])));
        // control point past the end overshoots the chord
        let overshoot = GeometryLine::QuadraticCurve(QuadraticCurve::new(
            start,
            Position::new(4.0, 0.0),
            end,
        ));
        assert!(matches!(optimize_geometry_line(&overshoot), Some(GeometryLine::QuadraticCurve(_))));
    }

    #[test]
    fn optimize_merges_neighbours() {
        let lines = vec![
            GeometryLine::Segment([Position::new(1.0, 0.0), Position::new(2.0, 0.0)]),
            GeometryLine::Segment([Position::new(2.0, 0.0), Position::new(2.0, 2.0)]),
            GeometryLine::Segment([Position::new(2.0, 2.0), Position::new(0.0, 2.0)]),
            GeometryLine::Segment([Position::new(0.0, 2.0), Position::new(0.0, 0.0)]),
            GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(1.0, 0.0)]),
        ];
        let optimized = optimize_geometry_lines(&lines);
        assert_eq!(optimized.len(), 4);
        assert_eq!(
            optimized[0],
            GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(2.0, 0.0)])
        );
        let arcs = vec![
            GeometryLine::Arc(Arc::new(Position::new(0.0, 0.0), 1.0, AngleRange::new(0.0, 90.0, false))),
            GeometryLine::Arc(Arc::new(Position::new(0.0, 0.0), 1.0, AngleRange::new(90.0, 180.0, false))),
        ];
        let merged = optimize_geometry_lines(&arcs);
        assert_eq!(merged.len(), 1);
        assert_abs_diff_eq!(merged[0].bounding().start.x, -1.0, epsilon = DELTA1);
    }

    #[test]
    fn separation_and_closure() {
        let square = vec![
            GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(1.0, 0.0)]),
            GeometryLine::Segment([Position::new(1.0, 0.0), Position::new(1.0, 1.0)]),
            GeometryLine::Segment([Position::new(1.0, 1.0), Position::new(0.0, 1.0)]),
            GeometryLine::Segment([Position::new(0.0, 1.0), Position::new(0.0, 0.0)]),
        ];
        assert!(is_geometry_lines_closed(&square));
        assert!(!is_geometry_lines_closed(&square[..3]));
        let mut split = square.clone();
        split.push(GeometryLine::Segment([Position::new(5.0, 5.0), Position::new(6.0, 5.0)]));
        let groups = get_separated_geometry_lines(&split);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 4);
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&square), 1.0, epsilon = DELTA1);
        assert_abs_diff_eq!(
            get_geometry_lines_signed_area(&reverse_geometry_lines(&square)),
            -1.0,
            epsilon = DELTA1
        );
    }

    #[test]
    fn area_with_curves() {
        let circle = vec![GeometryLine::Arc(Arc::new(
            Position::new(2.0, 3.0),
            1.0,
            AngleRange::full(),
        ))];
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&circle), PI, epsilon = 1e-12);
        // half disc closed by its diameter, with the arc as an ellipse arc
        let half = vec![
            GeometryLine::EllipseArc(EllipseArc::new(
                Ellipse::new(Position::new(0.0, 0.0), 1.0, 1.0, 0.0),
                AngleRange::new(0.0, 180.0, false),
            )),
            GeometryLine::Segment([Position::new(-1.0, 0.0), Position::new(1.0, 0.0)]),
        ];
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&half), PI / 2.0, epsilon = 1e-4);
    }
}
