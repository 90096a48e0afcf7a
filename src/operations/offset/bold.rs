use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::geometry_line::{
    get_geometry_lines_signed_area, is_geometry_lines_closed, reverse_geometry_lines,
};
use crate::geometry::GeometryLine;
use crate::operations::split::split_geometry_lines;

use super::parallel::{get_parallel_geometry_lines_by_distance, get_round_join};
use super::trim::trim_hatch_geometry_lines;

/// Thickens chains into fillable outlines.
///
/// A closed loop becomes a ring: the loop grown by `distance` plus, where it
/// survives, the loop shrunk by `distance` as a hole. An open path becomes a
/// closed outline at `distance` on both sides with round caps at its ends.
/// Outlines are positive, holes negative.
#[derive(Debug)]
pub struct BoldGeometryLines {
    loops: Vec<Vec<GeometryLine>>,
    distance: f64,
}

impl BoldGeometryLines {
    #[must_use]
    pub fn new(loops: Vec<Vec<GeometryLine>>, distance: f64) -> Self {
        Self { loops, distance }
    }

    /// Executes the thickening, returning outlines and holes.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive distance or a
    /// chain containing rays, and `OperationError::Failed` if nothing is left.
    pub fn execute(&self) -> Result<Vec<Vec<GeometryLine>>> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "bold distance must be positive, got {}",
                self.distance
            ))
            .into());
        }
        if self
            .loops
            .iter()
            .flatten()
            .any(|line| matches!(line, GeometryLine::Ray(_)))
        {
            return Err(OperationError::InvalidInput("rays cannot be made bold".to_owned()).into());
        }

        let mut result = Vec::new();
        for lines in self.loops.iter().filter(|lines| !lines.is_empty()) {
            if is_geometry_lines_closed(lines) {
                result.extend(self.bold_closed(lines));
            } else {
                result.extend(self.bold_open(lines));
            }
        }

        if result.is_empty() {
            return Err(OperationError::Failed("bold outline collapsed completely".to_owned()).into());
        }
        Ok(result)
    }

    fn bold_closed(&self, lines: &[GeometryLine]) -> Vec<Vec<GeometryLine>> {
        // Step 1: orient the loop so that its left side is the inside.
        let oriented = if get_geometry_lines_signed_area(lines) < 0.0 {
            reverse_geometry_lines(lines)
        } else {
            lines.to_vec()
        };

        // Step 2: grow it.
        let outer = trim_hatch_geometry_lines(&get_parallel_geometry_lines_by_distance(
            &oriented,
            -self.distance,
        ));
        let mut result = Vec::new();
        if outer.is_empty() {
            debug!("bold outline of a loop vanished");
        } else {
            result.push(outer);
        }

        // Step 3: shrink it. Inverted pieces of a shrunk loop are not holes.
        let shrunk = get_parallel_geometry_lines_by_distance(&oriented, self.distance);
        let hole = split_geometry_lines(&shrunk)
            .into_iter()
            .filter(|part| is_geometry_lines_closed(part))
            .map(|part| (get_geometry_lines_signed_area(&part), part))
            .filter(|(area, _)| *area > 0.0)
            .max_by(|(a, _), (b, _)| a.total_cmp(b));
        match hole {
            Some((_, hole)) => result.push(reverse_geometry_lines(&hole)),
            None => debug!(distance = self.distance, "loop too thin to keep a hole"),
        }
        result
    }

    fn bold_open(&self, lines: &[GeometryLine]) -> Vec<Vec<GeometryLine>> {
        let left = get_parallel_geometry_lines_by_distance(lines, self.distance);
        let right = get_parallel_geometry_lines_by_distance(lines, -self.distance);
        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return Vec::new();
        };
        let ends = (
            first.start_point(),
            last.end_point(),
            left.first().and_then(GeometryLine::start_point),
            left.last().and_then(GeometryLine::end_point),
            right.first().and_then(GeometryLine::start_point),
            right.last().and_then(GeometryLine::end_point),
        );
        let (Some(start), Some(end), Some(left_start), Some(left_end), Some(right_start), Some(right_end)) =
            ends
        else {
            debug!("open path offsets left no ends to cap");
            return Vec::new();
        };
        let start_tangent = first.derivatives_at_param(first.param_range().0).first;
        let end_tangent = last.derivatives_at_param(last.param_range().1).first;

        let mut outline = left;
        outline.extend(get_round_join(&end, &left_end, &right_end, &end_tangent));
        outline.extend(reverse_geometry_lines(&right));
        outline.extend(get_round_join(&start, &right_start, &left_start, &-start_tangent));

        let trimmed = trim_hatch_geometry_lines(&outline);
        if trimmed.is_empty() {
            debug!("bold outline of an open path vanished");
            return Vec::new();
        }
        vec![trimmed]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::{Arc, Circle};
    use crate::math::Position;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn polyline(points: &[(f64, f64)]) -> Vec<GeometryLine> {
        points
            .windows(2)
            .map(|w| GeometryLine::Segment([Position::new(w[0].0, w[0].1), Position::new(w[1].0, w[1].1)]))
            .collect()
    }

    #[test]
    fn segment_becomes_a_stadium() {
        let path = polyline(&[(0.0, 0.0), (4.0, 0.0)]);
        let result = BoldGeometryLines::new(vec![path], 1.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!(is_geometry_lines_closed(&result[0]));
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&result[0]), 8.0 + PI, epsilon = 1e-9);
    }

    #[test]
    fn square_becomes_a_ring() {
        init_tracing();
        // clockwise input is oriented before offsetting
        let square = polyline(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]);
        let result = BoldGeometryLines::new(vec![square], 1.0).execute().unwrap();
        assert_eq!(result.len(), 2);
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&result[0]), 32.0 + PI, epsilon = 1e-9);
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&result[1]), -4.0, epsilon = 1e-9);
    }

    #[test]
    fn thin_circle_loses_its_hole() {
        let circle: GeometryLine = Arc::from_circle(&Circle::new(Position::origin(), 1.0)).into();
        let result = BoldGeometryLines::new(vec![vec![circle]], 2.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert_abs_diff_eq!(get_geometry_lines_signed_area(&result[0]), 9.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn invalid_input() {
        let path = polyline(&[(0.0, 0.0), (4.0, 0.0)]);
        assert!(BoldGeometryLines::new(vec![path.clone()], 0.0).execute().is_err());
        assert!(BoldGeometryLines::new(vec![path], f64::NAN).execute().is_err());
        let ray: GeometryLine = crate::geometry::Ray::new(Position::origin(), 0.0).into();
        assert!(BoldGeometryLines::new(vec![vec![ray]], 1.0).execute().is_err());
        assert!(BoldGeometryLines::new(Vec::new(), 1.0).execute().is_err());
    }
}
