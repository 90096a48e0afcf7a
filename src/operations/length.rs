use tracing::debug;

use crate::geometry::position::get_two_points_distance;
use crate::geometry::GeometryLine;
use crate::math::{
    is_zero, larger_than, newton_iterate, romberg_integral, NewtonOptions, Position, DELTA1,
    DELTA2,
};

fn get_length_between(line: &GeometryLine, from: f64, to: f64) -> f64 {
    romberg_integral(
        from,
        to,
        |t| line.derivatives_at_param(t).first.norm(),
        DELTA1,
    )
}

/// Length of the `[0, 1]` body; infinite for rays.
#[must_use]
pub fn get_geometry_line_length(line: &GeometryLine) -> f64 {
    match line {
        GeometryLine::Segment([a, b]) => get_two_points_distance(a, b),
        GeometryLine::Arc(arc) => arc.length(),
        GeometryLine::Ray(_) => f64::INFINITY,
        _ => get_length_between(line, 0.0, 1.0),
    }
}

/// Param at which the curve has covered `length` from its start.
///
/// Segments and arcs are proportional and rays measure distance directly.
/// Other curves solve `L(t) = length` with Newton, seeded proportionally.
#[must_use]
pub fn get_geometry_line_param_by_length(line: &GeometryLine, length: f64) -> f64 {
    let total = get_geometry_line_length(line);
    match line {
        GeometryLine::Ray(_) => length,
        _ if is_zero(total) => 0.0,
        GeometryLine::Segment(_) | GeometryLine::Arc(_) => length / total,
        _ => {
            let seed = length / total;
            let refined = newton_iterate(
                seed,
                |t| get_length_between(line, 0.0, t) - length,
                |t| line.derivatives_at_param(t).first.norm(),
                NewtonOptions::with_delta(DELTA1),
            );
            match refined {
                Ok(t) => t,
                Err(err) => {
                    debug!(%err, length, "param by length kept at the proportional estimate");
                    seed
                }
            }
        }
    }
}

/// Total length of a chain.
#[must_use]
pub fn get_geometry_lines_length(lines: &[GeometryLine]) -> f64 {
    lines.iter().map(get_geometry_line_length).sum()
}

/// Point at `length` along a chain; `None` outside `[0, total]`.
#[must_use]
pub fn get_geometry_lines_point_at_length(lines: &[GeometryLine], length: f64) -> Option<Position> {
    if larger_than(0.0, length) {
        return None;
    }
    let mut remaining = length;
    for line in lines {
        let piece = get_geometry_line_length(line);
        if remaining <= piece + DELTA2 {
            let param = get_geometry_line_param_by_length(line, remaining.min(piece));
            return Some(line.point_at_param(param));
        }
        remaining -= piece;
    }
    None
}

/// Point at `length` along `line` together with the tangent direction there.
#[must_use]
pub fn get_geometry_line_point_and_tangent_radian_by_length(
    line: &GeometryLine,
    length: f64,
) -> (Position, f64) {
    let param = get_geometry_line_param_by_length(line, length);
    (line.point_at_param(param), line.tangent_radian_at_param(param))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::angle::AngleRange;
    use crate::geometry::position::is_same_point_with;
    use crate::geometry::{Arc, Ellipse, EllipseArc, QuadraticCurve, Ray};

    #[test]
    fn closed_form_lengths() {
        let segment = GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(3.0, 4.0)]);
        assert_abs_diff_eq!(get_geometry_line_length(&segment), 5.0, epsilon = 1e-12);
        let arc: GeometryLine = Arc::new(Position::origin(), 2.0, AngleRange::new(0.0, 90.0, false)).into();
        assert_abs_diff_eq!(get_geometry_line_length(&arc), PI, epsilon = 1e-12);
        let ray: GeometryLine = Ray::new(Position::origin(), 0.0).into();
        assert!(get_geometry_line_length(&ray).is_infinite());
    }

    #[test]
    fn integrated_lengths() {
        // a full circle as an ellipse arc
        let ellipse: GeometryLine = EllipseArc::from_ellipse(Ellipse::new(Position::origin(), 1.0, 1.0, 0.0)).into();
        assert_abs_diff_eq!(get_geometry_line_length(&ellipse), 2.0 * PI, epsilon = 1e-6);
        // a straight quadratic has the chord length
        let flat: GeometryLine = QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
        )
        .into();
        assert_abs_diff_eq!(get_geometry_line_length(&flat), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn param_by_length() {
        let segment = GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(4.0, 0.0)]);
        assert_abs_diff_eq!(get_geometry_line_param_by_length(&segment, 1.0), 0.25, epsilon = 1e-12);
        // the ellipse arc runs at unit speed around a quarter circle
        let quarter: GeometryLine = EllipseArc::new(
            Ellipse::new(Position::origin(), 1.0, 1.0, 0.0),
            AngleRange::new(0.0, 90.0, false),
        )
        .into();
        let t = get_geometry_line_param_by_length(&quarter, FRAC_PI_2 / 3.0);
        assert_abs_diff_eq!(t, 1.0 / 3.0, epsilon = 1e-6);
        // a quadratic with uneven speed
        let curve: GeometryLine = QuadraticCurve::new(
            Position::new(0.0, 0.0),
            Position::new(0.2, 0.0),
            Position::new(2.0, 0.0),
        )
        .into();
        let t = get_geometry_line_param_by_length(&curve, 1.0);
        assert_abs_diff_eq!(curve.point_at_param(t).x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn chain_walk() {
        let lines = vec![
            GeometryLine::Segment([Position::new(0.0, 0.0), Position::new(2.0, 0.0)]),
            GeometryLine::Segment([Position::new(2.0, 0.0), Position::new(2.0, 3.0)]),
        ];
        assert_abs_diff_eq!(get_geometry_lines_length(&lines), 5.0, epsilon = 1e-12);
        let p = get_geometry_lines_point_at_length(&lines, 3.0).unwrap();
        assert!(is_same_point_with(&p, &Position::new(2.0, 1.0), 1e-12));
        let end = get_geometry_lines_point_at_length(&lines, 5.0).unwrap();
        assert!(is_same_point_with(&end, &Position::new(2.0, 3.0), 1e-12));
        assert!(get_geometry_lines_point_at_length(&lines, 5.5).is_none());
        assert!(get_geometry_lines_point_at_length(&lines, -1.0).is_none());
    }

    #[test]
    fn point_and_tangent() {
        let arc: GeometryLine = Arc::new(Position::origin(), 1.0, AngleRange::new(0.0, 180.0, false)).into();
        let (p, radian) = get_geometry_line_point_and_tangent_radian_by_length(&arc, FRAC_PI_2);
        assert!(is_same_point_with(&p, &Position::new(0.0, 1.0), 1e-12));
        assert_abs_diff_eq!(radian.abs(), PI, epsilon = 1e-9);
    }
}
