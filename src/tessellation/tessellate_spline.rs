use nalgebra::DMatrix;

use crate::error::{NumericError, OperationError, Result};
use crate::geometry::BezierCurve;
use crate::math::Position;

use super::tessellate_curve::get_bezier_curve_points;
use super::TessellationParams;

/// Cubic Bézier pieces of the natural cubic spline through `points`.
///
/// The first control points `P1` solve the tridiagonal system
///
/// ```text
/// 2·P1[0]   +   P1[1]              = K[0] + 2·K[1]
/// P1[i-1] + 4·P1[i] + P1[i+1]      = 4·K[i] + 2·K[i+1]
/// 2·P1[n-2] + 7·P1[n-1]            = 8·K[n-1] + K[n]
/// ```
///
/// and the second ones follow from C¹ continuity, with zero curvature at
/// both ends.
///
/// # Errors
///
/// - `OperationError::InvalidInput` for fewer than two points
/// - `NumericError::InvalidInput` when the system is singular
pub fn get_bezier_spline_curves(points: &[Position]) -> Result<Vec<BezierCurve>> {
    if points.len() < 2 {
        return Err(OperationError::InvalidInput("a spline needs two points".to_owned()).into());
    }
    let n = points.len() - 1;
    if n == 1 {
        let (a, b) = (points[0].coords, points[1].coords);
        return Ok(vec![BezierCurve::new(
            points[0],
            Position::from((a * 2.0 + b) / 3.0),
            Position::from((a + b * 2.0) / 3.0),
            points[1],
        )]);
    }

    let mut matrix = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DMatrix::<f64>::zeros(n, 2);
    for i in 0..n {
        let (diagonal, right) = if i == 0 {
            (2.0, points[0].coords + points[1].coords * 2.0)
        } else if i == n - 1 {
            (7.0, points[n - 1].coords * 8.0 + points[n].coords)
        } else {
            (4.0, points[i].coords * 4.0 + points[i + 1].coords * 2.0)
        };
        matrix[(i, i)] = diagonal;
        if i > 0 {
            matrix[(i, i - 1)] = if i == n - 1 { 2.0 } else { 1.0 };
        }
        if i + 1 < n {
            matrix[(i, i + 1)] = 1.0;
        }
        rhs[(i, 0)] = right.x;
        rhs[(i, 1)] = right.y;
    }
    let Some(first) = matrix.lu().solve(&rhs) else {
        return Err(NumericError::InvalidInput("singular spline system".into()).into());
    };
    let cp1: Vec<Position> = (0..n)
        .map(|i| Position::new(first[(i, 0)], first[(i, 1)]))
        .collect();

    Ok((0..n)
        .map(|i| {
            let cp2 = match cp1.get(i + 1) {
                Some(next) => Position::from(points[i + 1].coords * 2.0 - next.coords),
                None => Position::from((points[n].coords + cp1[i].coords) / 2.0),
            };
            BezierCurve::new(points[i], cp1[i], cp2, points[i + 1])
        })
        .collect())
}

/// Polyline of the natural cubic spline through `points`.
///
/// # Errors
///
/// Same as [`get_bezier_spline_curves`].
pub fn get_bezier_spline_points(points: &[Position], params: &TessellationParams) -> Result<Vec<Position>> {
    let mut result: Vec<Position> = Vec::new();
    for curve in get_bezier_spline_curves(points)? {
        let skip = usize::from(!result.is_empty());
        result.extend(get_bezier_curve_points(&curve, params).into_iter().skip(skip));
    }
    Ok(result)
}
