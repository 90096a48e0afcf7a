use crate::geometry::geometry_line::{get_geometry_lines_signed_area, reverse_geometry_lines};
use crate::geometry::GeometryLine;
use crate::math::Position;
use crate::operations::perpendicular::get_point_and_geometry_line_minimum_distance;
use crate::operations::split::split_geometry_lines;

/// Cleans a closed offset outline for filling.
///
/// The outline is split at its self-intersections and the loop enclosing the
/// largest area is kept, oriented so that its signed area is positive.
#[must_use]
pub fn trim_hatch_geometry_lines(lines: &[GeometryLine]) -> Vec<GeometryLine> {
    let oriented = if get_geometry_lines_signed_area(lines) < 0.0 {
        reverse_geometry_lines(lines)
    } else {
        lines.to_vec()
    };
    let Some((area, largest)) = split_geometry_lines(&oriented)
        .into_iter()
        .map(|part| (get_geometry_lines_signed_area(&part), part))
        .max_by(|(a, _), (b, _)| a.abs().total_cmp(&b.abs()))
    else {
        return Vec::new();
    };
    if area < 0.0 {
        reverse_geometry_lines(&largest)
    } else {
        largest
    }
}

/// Drops the loops an offset chain tied into itself and returns the branch
/// lying nearest to `reference`, usually a point of the source chain.
#[must_use]
pub fn trim_geometry_lines_offset_result(
    lines: &[GeometryLine],
    reference: &Position,
) -> Vec<GeometryLine> {
    let distance = |part: &[GeometryLine]| {
        part.iter()
            .map(|line| get_point_and_geometry_line_minimum_distance(reference, line))
            .fold(f64::INFINITY, f64::min)
    };
    split_geometry_lines(lines)
        .into_iter()
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
        .unwrap_or_default()
}
