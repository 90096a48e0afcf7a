use tracing::trace;

use crate::geometry::geometry_line::GeometryLine;
use crate::geometry::position::is_same_point;
use crate::geometry::{Arc, BezierCurve, Derivatives, EllipseArc, HyperbolaSegment, Nurbs, QuadraticCurve};
use crate::math::Position;

use super::TessellationParams;

/// Segments needed to sweep `sweep` degrees around a radius of `radius`.
///
/// A chord spanning `θ` sits `r(1 - cos(θ/2))` inside the circle, so the
/// tolerance bounds the step to `2·acos(1 - tolerance/r)`. `angle_delta`
/// caps it further.
fn angular_segment_count(sweep: f64, radius: f64, params: &TessellationParams) -> usize {
    let mut step = params.angle_delta;
    if radius.is_finite() && radius > params.tolerance && params.tolerance > 0.0 {
        step = step.min((2.0 * (1.0 - params.tolerance / radius).acos()).to_degrees());
    }
    params.segment_count(sweep.abs() / step)
}

/// Segments needed for a curve on the `[0, 1]` param.
///
/// A chord over a param step `h` deviates at most `M·h²/8` from the curve,
/// where `M` bounds the second derivative. `M` is estimated from `probes`
/// evenly spaced samples.
fn param_segment_count<F>(derivatives: F, probes: usize, params: &TessellationParams) -> usize
where
    F: Fn(f64) -> Derivatives,
{
    let probes = probes.max(2);
    #[allow(clippy::cast_precision_loss)]
    let bound = (0..=probes)
        .map(|i| derivatives(i as f64 / probes as f64).second.norm())
        .fold(0.0, f64::max);
    if bound == 0.0 || params.tolerance <= 0.0 {
        return params.segment_count(0.0);
    }
    let step = (8.0 * params.tolerance / bound).sqrt();
    params.segment_count(1.0 / step)
}

#[allow(clippy::cast_precision_loss)]
fn sample<F>(point_at_param: F, count: usize) -> Vec<Position>
where
    F: Fn(f64) -> Position,
{
    (0..=count)
        .map(|i| point_at_param(i as f64 / count as f64))
        .collect()
}

#[must_use]
pub fn arc_to_polyline(arc: &Arc, params: &TessellationParams) -> Vec<Position> {
    let count = angular_segment_count(arc.range().sweep(), arc.r, params);
    sample(|t| arc.point_at_param(t), count)
}

/// Points along an ellipse arc, evenly spaced in parametric angle.
///
/// The ellipse is an affine image of a unit circle scaled by at most the
/// larger semi-axis, which bounds the chord error.
#[must_use]
pub fn ellipse_arc_to_polyline(arc: &EllipseArc, params: &TessellationParams) -> Vec<Position> {
    let radius = arc.rx.abs().max(arc.ry.abs());
    let count = angular_segment_count(arc.range().sweep(), radius, params);
    sample(|t| arc.point_at_param(t), count)
}

#[must_use]
pub fn get_quadratic_curve_points(curve: &QuadraticCurve, params: &TessellationParams) -> Vec<Position> {
    // constant second derivative, two probes are exact
    let count = param_segment_count(|t| curve.derivatives_at_param(t), 2, params);
    sample(|t| curve.point_at_param(t), count)
}

#[must_use]
pub fn get_bezier_curve_points(curve: &BezierCurve, params: &TessellationParams) -> Vec<Position> {
    // the second derivative is linear in t, so its ends bound it
    let count = param_segment_count(|t| curve.derivatives_at_param(t), 2, params);
    sample(|t| curve.point_at_param(t), count)
}

#[must_use]
pub fn get_nurbs_points(nurbs: &Nurbs, params: &TessellationParams) -> Vec<Position> {
    let probes = (nurbs.points.len() * 8).max(16);
    let count = param_segment_count(|t| nurbs.derivatives_at_param(t), probes, params);
    sample(|t| nurbs.point_at_param(t), count)
}

#[must_use]
pub fn get_hyperbola_points(segment: &HyperbolaSegment, params: &TessellationParams) -> Vec<Position> {
    let count = param_segment_count(|t| segment.derivatives_at_param(t), 32, params);
    sample(|t| segment.point_at_param(t), count)
}

/// Polyline of one curve.
///
/// Rays are unbounded and yield no points; drawing them is left to the
/// caller's viewport clipping.
#[must_use]
pub fn get_geometry_line_points(line: &GeometryLine, params: &TessellationParams) -> Vec<Position> {
    match line {
        GeometryLine::Segment([a, b]) => vec![*a, *b],
        GeometryLine::Arc(arc) => arc_to_polyline(arc, params),
        GeometryLine::EllipseArc(arc) => ellipse_arc_to_polyline(arc, params),
        GeometryLine::QuadraticCurve(curve) => get_quadratic_curve_points(curve, params),
        GeometryLine::BezierCurve(curve) => get_bezier_curve_points(curve, params),
        GeometryLine::Nurbs(nurbs) => get_nurbs_points(nurbs, params),
        GeometryLine::HyperbolaSegment(segment) => get_hyperbola_points(segment, params),
        GeometryLine::Ray(ray) => {
            trace!(?ray, "skipping unbounded ray");
            Vec::new()
        }
    }
}

/// Polyline of a chain; shared joints appear once.
#[must_use]
pub fn get_geometry_lines_points(lines: &[GeometryLine], params: &TessellationParams) -> Vec<Position> {
    let mut result: Vec<Position> = Vec::new();
    for line in lines {
        let points = get_geometry_line_points(line, params);
        let skip = match (result.last(), points.first()) {
            (Some(last), Some(first)) if is_same_point(last, first) => 1,
            _ => 0,
        };
        result.extend(points.into_iter().skip(skip));
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::position::get_two_points_distance;
    use crate::geometry::{AngleRange, Circle, Ellipse, Hyperbola, Ray};

    fn midpoint(a: &Position, b: &Position) -> Position {
        Position::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    #[test]
    fn quarter_arc_follows_angle_delta() {
        let arc = Arc::new(Position::origin(), 1.0, AngleRange::new(0.0, 90.0, false));
        let points = arc_to_polyline(&arc, &TessellationParams::default());
        assert_eq!(points.len(), 19);
        assert_abs_diff_eq!(points[0].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[18].y, 1.0, epsilon = 1e-12);
        for p in &points {
            assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn large_arc_respects_tolerance() {
        let params = TessellationParams {
            angle_delta: 90.0,
            ..TessellationParams::default()
        };
        let arc = Arc::new(Position::origin(), 1000.0, AngleRange::new(90.0, 0.0, true));
        let points = arc_to_polyline(&arc, &params);
        assert!(points.len() > 100);
        assert!(points[1].x > 0.0);
        for w in points.windows(2) {
            let sagitta = 1000.0 - midpoint(&w[0], &w[1]).coords.norm();
            assert!(sagitta <= params.tolerance + 1e-9);
        }
    }

    #[test]
    fn full_ellipse_closes() {
        let arc = EllipseArc::from_ellipse(Ellipse::new(Position::origin(), 4.0, 2.0, 0.0));
        let points = ellipse_arc_to_polyline(&arc, &TessellationParams::default());
        assert_eq!(points.len(), 73);
        let (first, last) = (points[0], points[72]);
        assert_abs_diff_eq!(get_two_points_distance(&first, &last), 0.0, epsilon = 1e-9);
        for p in &points {
            let value = (p.x / 4.0).powi(2) + (p.y / 2.0).powi(2);
            assert_abs_diff_eq!(value, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn quadratic_chords_stay_within_tolerance() {
        let curve = QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(2.0, 4.0),
            Position::new(4.0, 0.0),
        );
        let params = TessellationParams::default();
        let points = get_quadratic_curve_points(&curve, &params);
        let n = points.len() - 1;
        assert!(n > params.min_segments);
        for (i, w) in points.windows(2).enumerate() {
            let on_curve = curve.point_at_param((i as f64 + 0.5) / n as f64);
            let deviation = get_two_points_distance(&on_curve, &midpoint(&w[0], &w[1]));
            assert!(deviation <= params.tolerance + 1e-12);
        }
    }

    #[test]
    fn straight_quadratic_uses_minimum() {
        let curve = QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
        );
        assert_eq!(get_quadratic_curve_points(&curve, &TessellationParams::default()).len(), 5);
    }

    #[test]
    fn bezier_and_nurbs_keep_their_ends() {
        let params = TessellationParams::default();
        let bezier = BezierCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 3.0),
            Position::new(3.0, -2.0),
            Position::new(4.0, 1.0),
        );
        let points = get_bezier_curve_points(&bezier, &params);
        assert!(points.len() <= params.max_segments + 1);
        assert!(is_same_point(&points[0], &bezier.from));
        assert!(is_same_point(&points[points.len() - 1], &bezier.to));

        let nurbs = Nurbs::new(
            vec![
                Position::new(0.0, 0.0),
                Position::new(1.0, 2.0),
                Position::new(3.0, 2.0),
                Position::new(4.0, 0.0),
                Position::new(6.0, 1.0),
            ],
            3,
        );
        let points = get_nurbs_points(&nurbs, &params);
        assert!(points.len() > params.min_segments);
        assert!(is_same_point(&points[0], &nurbs.start_point()));
        assert!(is_same_point(&points[points.len() - 1], &nurbs.end_point()));
    }

    #[test]
    fn hyperbola_points_lie_on_the_curve() {
        let hyperbola = Hyperbola::new(Position::origin(), 1.0, 2.0, 0.0);
        let segment = HyperbolaSegment::new(hyperbola, -1.0, 2.0);
        let points = get_hyperbola_points(&segment, &TessellationParams::default());
        assert!(points.len() >= 5);
        for p in &points {
            assert_abs_diff_eq!(p.x * p.x - p.y * p.y / 4.0, 1.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(points[0].y, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[points.len() - 1].y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn chain_shares_joints() {
        let square: Vec<GeometryLine> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]
            .windows(2)
            .map(|w| GeometryLine::Segment([Position::new(w[0].0, w[0].1), Position::new(w[1].0, w[1].1)]))
            .collect();
        let points = get_geometry_lines_points(&square, &TessellationParams::default());
        assert_eq!(points.len(), 5);
        assert!(is_same_point(&points[0], &points[4]));
    }

    #[test]
    fn mixed_chain_and_rays() {
        let params = TessellationParams::default();
        let circle: GeometryLine = Arc::from_circle(&Circle::new(Position::origin(), 1.0)).into();
        let ray: GeometryLine = Ray::new(Position::origin(), 0.0).into();
        assert!(get_geometry_line_points(&ray, &params).is_empty());
        let points = get_geometry_lines_points(&[circle, ray], &params);
        assert_eq!(points.len(), 73);
    }
}
