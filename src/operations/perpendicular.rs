use std::f64::consts::PI;

use crate::geometry::curve::get_nearest_param;
use crate::geometry::curve::line::two_points_to_general_form_line;
use crate::geometry::position::{deduplicate_positions, get_two_points_distance};
use crate::geometry::{
    BezierCurve, Circle, Ellipse, ExtendType, GeneralFormLine, GeometryLine, HyperbolaSegment,
    Nurbs, Parabola, QuadraticCurve,
};
use crate::math::{
    calculate_equation3, is_zero, newton_iterate, NewtonOptions, Polynomial, Position, DELTA1,
    DELTA2,
};

/// The foot found by [`get_perpendicular_point_to_geometry_lines`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerpendicularPoint {
    pub point: Position,
    /// Index of the piece the foot lies on.
    pub index: usize,
    pub distance: f64,
}

/// Foot of the perpendicular from `point` to an infinite line.
#[must_use]
pub fn get_perpendicular_point(point: &Position, line: &GeneralFormLine) -> Position {
    line.perpendicular_point(point)
}

/// One of the two feet on a circle: the near one on the side of `point`, or
/// the far one opposite. `None` when `point` is the center.
#[must_use]
pub fn get_perpendicular_point_to_circle(
    point: &Position,
    circle: &Circle,
    near: bool,
) -> Option<Position> {
    let v = point - circle.center;
    let d = v.norm();
    if is_zero(d) {
        return None;
    }
    let offset = v * (circle.r / d);
    Some(if near {
        circle.center + offset
    } else {
        circle.center - offset
    })
}

/// Feet on an ellipse, up to four.
///
/// In the axis frame the condition `(P(θ) - p)·P'(θ) = 0` reads
/// `k·sinθ·cosθ + rx·x·sinθ - ry·y·cosθ = 0` with `k = ry² - rx²`. The
/// half-angle substitution turns it into a quartic; `θ = π` is checked apart.
#[must_use]
pub fn get_perpendicular_points_to_ellipse(point: &Position, ellipse: &Ellipse) -> Vec<Position> {
    let local = ellipse.to_local(point);
    let k = ellipse.ry * ellipse.ry - ellipse.rx * ellipse.rx;
    let px = ellipse.rx * local.x;
    let py = ellipse.ry * local.y;
    if is_zero(k) && is_zero(px) && is_zero(py) {
        return Vec::new();
    }
    let g = |r: f64| {
        let (sin, cos) = r.sin_cos();
        k * sin * cos + px * sin - py * cos
    };
    let g1 = |r: f64| {
        let (sin, cos) = r.sin_cos();
        k * (cos * cos - sin * sin) + px * cos + py * sin
    };
    let quartic = Polynomial::new(vec![-py, 2.0 * (k + px), 0.0, 2.0 * (px - k), py]);
    let mut radians: Vec<f64> = quartic
        .roots(0.0, DELTA1)
        .into_iter()
        .map(|u| 2.0 * u.atan())
        .collect();
    if is_zero(g(PI)) {
        radians.push(PI);
    }
    let points = radians
        .into_iter()
        .map(|r| {
            let polished = newton_iterate(r, g, g1, NewtonOptions::with_delta(DELTA1))
                .ok()
                .filter(|p| (p - r).abs() < 0.1)
                .unwrap_or(r);
            ellipse.point_at_radian(polished)
        })
        .collect();
    deduplicate_positions(points)
}

/// Params where `(C(t) - p)·C'(t)` vanishes on a polynomial curve.
fn get_polynomial_feet(point: &Position, curve: &[Polynomial; 2]) -> Vec<f64> {
    let [x, y] = curve;
    let dx = x - &Polynomial::constant(point.x);
    let dy = y - &Polynomial::constant(point.y);
    let f = &(&dx * &x.derivative()) + &(&dy * &y.derivative());
    f.roots(0.5, DELTA1)
}

/// Feet on the whole supporting curve of a quadratic Bézier (a cubic).
#[must_use]
pub fn get_perpendicular_points_to_quadratic_curve(
    point: &Position,
    curve: &QuadraticCurve,
) -> Vec<Position> {
    get_polynomial_feet(point, &curve.polynomials())
        .into_iter()
        .map(|t| curve.point_at_param(t))
        .collect()
}

/// Feet on the whole supporting curve of a cubic Bézier (a quintic).
#[must_use]
pub fn get_perpendicular_points_to_bezier_curve(
    point: &Position,
    curve: &BezierCurve,
) -> Vec<Position> {
    get_polynomial_feet(point, &curve.polynomials())
        .into_iter()
        .map(|t| curve.point_at_param(t))
        .collect()
}

/// Feet on a parabola.
///
/// With `P(t) = (p·t², t)` in the axis frame the condition is the cubic
/// `2p²·t³ + (1 - 2p·x)·t - y = 0`.
#[must_use]
pub fn get_perpendicular_points_to_parabola(point: &Position, parabola: &Parabola) -> Vec<Position> {
    let local = parabola.to_local(point);
    let p = parabola.p;
    calculate_equation3(2.0 * p * p, 0.0, 1.0 - 2.0 * p * local.x, -local.y, DELTA1)
        .into_iter()
        .map(|t| parabola.point_at_t(t))
        .collect()
}

/// Nearest point of a hyperbola segment, refined by Newton from the nearest sample.
#[must_use]
pub fn get_perpendicular_point_to_hyperbola_segment(
    point: &Position,
    segment: &HyperbolaSegment,
) -> Position {
    let t = get_nearest_param(|t| segment.derivatives_at_param(t), point, 32);
    segment.point_at_param(t)
}

/// Nearest point of a NURBS curve, refined by Newton from the nearest sample.
#[must_use]
pub fn get_perpendicular_point_to_nurbs(point: &Position, nurbs: &Nurbs) -> Position {
    let t = get_nearest_param(|t| nurbs.derivatives_at_param(t), point, 16 * nurbs.points.len());
    nurbs.point_at_param(t)
}

fn is_perpendicular_foot(line: &GeometryLine, param: f64, point: &Position) -> bool {
    let d = line.derivatives_at_param(param);
    let offset = point - d.point;
    let scale = d.first.norm() * offset.norm().max(1.0);
    scale == 0.0 || offset.dot(&d.first).abs() <= DELTA2 * scale
}

/// Feet of the perpendiculars from `point` to `line`, restricted by `extend`.
#[must_use]
pub fn get_perpendicular_points_to_geometry_line(
    point: &Position,
    line: &GeometryLine,
    extend: &ExtendType,
) -> Vec<Position> {
    let candidates = match line {
        GeometryLine::Segment([a, b]) => two_points_to_general_form_line(a, b)
            .map(|l| vec![l.perpendicular_point(point)])
            .unwrap_or_default(),
        GeometryLine::Ray(ray) => vec![ray.to_general_form_line().perpendicular_point(point)],
        GeometryLine::Arc(arc) => [true, false]
            .iter()
            .filter_map(|near| get_perpendicular_point_to_circle(point, &arc.circle(), *near))
            .collect(),
        GeometryLine::EllipseArc(arc) => get_perpendicular_points_to_ellipse(point, &arc.ellipse()),
        GeometryLine::QuadraticCurve(curve) => {
            get_perpendicular_points_to_quadratic_curve(point, curve)
        }
        GeometryLine::BezierCurve(curve) => get_perpendicular_points_to_bezier_curve(point, curve),
        GeometryLine::HyperbolaSegment(segment) => {
            vec![get_perpendicular_point_to_hyperbola_segment(point, segment)]
        }
        GeometryLine::Nurbs(nurbs) => vec![get_perpendicular_point_to_nurbs(point, nurbs)],
    };
    candidates
        .into_iter()
        .filter(|p| {
            let param = line.param_at_point(p);
            line.is_valid_param(param, extend) && is_perpendicular_foot(line, param, point)
        })
        .collect()
}

/// Point of `line` nearest to `point`: a foot on the body or an end point.
#[must_use]
pub fn get_point_and_geometry_line_nearest_point(
    point: &Position,
    line: &GeometryLine,
) -> Option<Position> {
    let mut candidates =
        get_perpendicular_points_to_geometry_line(point, line, &ExtendType::default());
    let (start, end) = line.start_and_end();
    candidates.extend(start);
    candidates.extend(end);
    candidates.into_iter().min_by(|a, b| {
        get_two_points_distance(a, point).total_cmp(&get_two_points_distance(b, point))
    })
}

#[must_use]
pub fn get_point_and_geometry_line_minimum_distance(point: &Position, line: &GeometryLine) -> f64 {
    get_point_and_geometry_line_nearest_point(point, line)
        .map_or(f64::INFINITY, |p| get_two_points_distance(&p, point))
}

/// The nearest perpendicular foot over a list of pieces, used for snapping.
#[must_use]
pub fn get_perpendicular_point_to_geometry_lines(
    point: &Position,
    lines: &[GeometryLine],
) -> Option<PerpendicularPoint> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(index, line)| {
            get_perpendicular_points_to_geometry_line(point, line, &ExtendType::default())
                .into_iter()
                .map(move |p| PerpendicularPoint {
                    point: p,
                    index,
                    distance: get_two_points_distance(&p, point),
                })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
