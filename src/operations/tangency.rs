use crate::geometry::curve::hyperbola::point_is_on_hyperbola;
use crate::geometry::position::deduplicate_positions;
use crate::geometry::{
    BezierCurve, Circle, Conic, Ellipse, ExtendType, GeometryLine, Hyperbola, Nurbs,
    QuadraticCurve,
};
use crate::math::{cross, Polynomial, Position, DELTA1, DELTA2};
use crate::operations::intersect::get_sampled_roots;

/// Tangency points on a conic: the conic cut by the polar line of `point`.
///
/// An inner point has a polar line that misses the conic, so nothing comes
/// back. A point on the conic yields itself.
fn get_conic_tangency_points(point: &Position, conic: &Conic) -> Vec<Position> {
    let Some(polar) = conic.polar_line(point) else {
        return Vec::new();
    };
    let origin = polar.any_point();
    let d = polar.direction().normalize();
    let x = Polynomial::linear(origin.x, d.x);
    let y = Polynomial::linear(origin.y, d.y);
    let points = conic
        .substitute_polynomial(&x, &y)
        .roots(0.0, DELTA1)
        .into_iter()
        .map(|t| origin + d * t)
        .collect();
    deduplicate_positions(points)
}

#[must_use]
pub fn get_tangency_points_to_circle(point: &Position, circle: &Circle) -> Vec<Position> {
    get_conic_tangency_points(point, &circle.to_conic())
}

#[must_use]
pub fn get_tangency_points_to_ellipse(point: &Position, ellipse: &Ellipse) -> Vec<Position> {
    get_conic_tangency_points(point, &ellipse.to_conic())
}

/// Tangency points on the branch; points the polar line finds on the other
/// branch are dropped.
#[must_use]
pub fn get_tangency_points_to_hyperbola(point: &Position, hyperbola: &Hyperbola) -> Vec<Position> {
    get_conic_tangency_points(point, &hyperbola.to_conic())
        .into_iter()
        .filter(|p| point_is_on_hyperbola(p, hyperbola, DELTA2))
        .collect()
}

/// Params where `(C(t) - p) × C'(t)` vanishes on a polynomial curve. The
/// leading terms cancel, so a quadratic gives a quadratic and a cubic a quartic.
fn get_polynomial_tangency_params(point: &Position, curve: &[Polynomial; 2]) -> Vec<f64> {
    let [x, y] = curve;
    let dx = x - &Polynomial::constant(point.x);
    let dy = y - &Polynomial::constant(point.y);
    let f = &(&dx * &y.derivative()) - &(&dy * &x.derivative());
    f.roots(0.5, DELTA1)
}

/// Tangency points on the whole supporting curve of a quadratic Bézier.
#[must_use]
pub fn get_tangency_points_to_quadratic_curve(
    point: &Position,
    curve: &QuadraticCurve,
) -> Vec<Position> {
    get_polynomial_tangency_params(point, &curve.polynomials())
        .into_iter()
        .map(|t| curve.point_at_param(t))
        .collect()
}

/// Tangency points on the whole supporting curve of a cubic Bézier.
#[must_use]
pub fn get_tangency_points_to_bezier_curve(point: &Position, curve: &BezierCurve) -> Vec<Position> {
    get_polynomial_tangency_params(point, &curve.polynomials())
        .into_iter()
        .map(|t| curve.point_at_param(t))
        .collect()
}

/// Tangency points on a NURBS curve.
///
/// Roots of `(C(t) - p) × C'(t)` between samples, refined with Newton on its
/// derivative `(C(t) - p) × C''(t)`. Where the line through `p` touches the
/// curve at an inflection the cross product keeps its sign, so a minimum of
/// its magnitude counts once it is within `DELTA2` of `|C(t) - p|·|C'(t)|`.
#[must_use]
pub fn get_tangency_points_to_nurbs(point: &Position, nurbs: &Nurbs) -> Vec<Position> {
    let g = |t: f64| {
        let d = nurbs.derivatives_at_param(t);
        cross(&(d.point - point), &d.first)
    };
    let g1 = |t: f64| {
        let d = nurbs.derivatives_at_param(t);
        cross(&(d.point - point), &d.second)
    };
    let is_tangent = |t: f64| {
        let d = nurbs.derivatives_at_param(t);
        let offset = d.point - point;
        cross(&offset, &d.first).abs() <= DELTA2 * offset.norm() * d.first.norm()
    };
    let count = (16 * nurbs.points.len()).max(64);
    let points = get_sampled_roots(g, g1, count, is_tangent)
        .into_iter()
        .map(|t| nurbs.point_at_param(t))
        .collect();
    deduplicate_positions(points)
}

/// Tangency points from `point` on `line`, restricted by `extend`. Straight
/// pieces have none.
#[must_use]
pub fn get_tangency_points_to_geometry_line(
    point: &Position,
    line: &GeometryLine,
    extend: &ExtendType,
) -> Vec<Position> {
    let candidates = match line {
        GeometryLine::Segment(_) | GeometryLine::Ray(_) => return Vec::new(),
        GeometryLine::Arc(arc) => get_tangency_points_to_circle(point, &arc.circle()),
        GeometryLine::EllipseArc(arc) => get_tangency_points_to_ellipse(point, &arc.ellipse()),
        GeometryLine::HyperbolaSegment(segment) => {
            get_tangency_points_to_hyperbola(point, &segment.hyperbola())
        }
        GeometryLine::QuadraticCurve(curve) => get_tangency_points_to_quadratic_curve(point, curve),
        GeometryLine::BezierCurve(curve) => get_tangency_points_to_bezier_curve(point, curve),
        GeometryLine::Nurbs(nurbs) => get_tangency_points_to_nurbs(point, nurbs),
    };
    candidates
        .into_iter()
        .filter(|p| line.is_valid_param(line.param_at_point(p), extend))
        .collect()
}
