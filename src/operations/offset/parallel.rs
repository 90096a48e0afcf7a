use tracing::debug;

use crate::geometry::angle::AngleRange;
use crate::geometry::curve::line::get_parallel_segments_by_distance;
use crate::geometry::curve::nurbs::interpolate_nurbs;
use crate::geometry::geometry_line::is_geometry_lines_closed;
use crate::geometry::position::{get_two_points_distance, is_same_point};
use crate::geometry::{Arc, Circle, ExtendType, GeometryLine, Ray};
use crate::math::polygon_2d::left_normal;
use crate::math::{is_zero, Position, Vector, DELTA1};
use crate::operations::intersect::get_two_geometry_lines_intersections;

const OFFSET_SAMPLES: usize = 24;

/// The curve at signed `distance` from `line`; positive distances move to
/// the left of the direction of travel.
///
/// Segments, rays and arcs are exact. Other curves are sampled and rebuilt as
/// a cubic NURBS through the shifted samples. `None` when an arc collapses
/// through its center or the rebuild fails.
#[must_use]
pub fn get_parallel_geometry_line_by_distance(
    line: &GeometryLine,
    distance: f64,
) -> Option<GeometryLine> {
    match line {
        GeometryLine::Segment(segment) => get_parallel_segments_by_distance(segment, distance)
            .map(|[left, _]| GeometryLine::Segment(left)),
        GeometryLine::Ray(ray) => {
            let normal = left_normal(ray.travel_direction());
            Some(GeometryLine::Ray(Ray {
                origin: ray.origin + normal * distance,
                ..*ray
            }))
        }
        GeometryLine::Arc(arc) => {
            let r = arc.r - distance * arc.range().direction();
            (r > DELTA1).then(|| GeometryLine::Arc(Arc::new(arc.center, r, arc.range())))
        }
        GeometryLine::Nurbs(nurbs) => {
            get_sampled_parallel_line(line, distance, (8 * nurbs.points.len()).max(OFFSET_SAMPLES))
        }
        _ => get_sampled_parallel_line(line, distance, OFFSET_SAMPLES),
    }
}

fn get_sampled_parallel_line(
    line: &GeometryLine,
    distance: f64,
    samples: usize,
) -> Option<GeometryLine> {
    #[allow(clippy::cast_precision_loss)]
    let points: Vec<Position> = (0..=samples)
        .map(|i| {
            let d = line.derivatives_at_param(i as f64 / samples as f64);
            let (sin, cos) = d.tangent_radian().sin_cos();
            d.point + Vector::new(-sin, cos) * distance
        })
        .collect();
    match interpolate_nurbs(&points, 3) {
        Ok(nurbs) => Some(GeometryLine::Nurbs(nurbs)),
        Err(err) => {
            debug!(%err, "parallel curve rebuild failed");
            None
        }
    }
}

/// Offsets every piece of a chain and reconnects the results.
///
/// Where neighbouring offsets cross they are trimmed at the crossing nearest
/// the original joint. Where they leave a gap a round join around the joint
/// closes it. Closed chains get their closing joint treated the same way.
#[must_use]
pub fn get_parallel_geometry_lines_by_distance(
    lines: &[GeometryLine],
    distance: f64,
) -> Vec<GeometryLine> {
    let closed = is_geometry_lines_closed(lines);
    let mut result: Vec<GeometryLine> = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(offset) = get_parallel_geometry_line_by_distance(line, distance) else {
            debug!(distance, "piece dropped from the offset chain");
            continue;
        };
        match result.last_mut() {
            Some(previous) => {
                let corner = line.start_point();
                let joined = join_offset_pieces(previous, offset, corner);
                result.extend(joined);
            }
            None => result.push(offset),
        }
    }
    if closed && result.len() > 1 {
        let corner = lines.first().and_then(GeometryLine::start_point);
        if let (Some(mut last), Some(first)) = (result.pop(), result.first().cloned()) {
            let mut joined = join_offset_pieces(&mut last, first, corner);
            result.push(last);
            if let Some(first) = joined.pop() {
                result[0] = first;
            }
            result.extend(joined);
        }
    }
    result
}

/// Connects `next` to the end of `previous`, trimming `previous` in place.
/// Returns what follows it: an optional join piece, then `next`.
fn join_offset_pieces(
    previous: &mut GeometryLine,
    next: GeometryLine,
    corner: Option<Position>,
) -> Vec<GeometryLine> {
    let (Some(end), Some(start)) = (previous.end_point(), next.start_point()) else {
        return vec![next];
    };
    if is_same_point(&end, &start) {
        return vec![next];
    }
    let reference = corner.unwrap_or(end);
    let crossing = get_two_geometry_lines_intersections(previous, &next, &ExtendType::default())
        .into_iter()
        .min_by(|a, b| {
            get_two_points_distance(&a.point, &reference)
                .total_cmp(&get_two_points_distance(&b.point, &reference))
        });
    if let Some(hit) = crossing {
        *previous = previous.part(previous.param_range().0, hit.t1);
        return vec![next.part(hit.t2, next.param_range().1)];
    }
    let incoming = previous
        .derivatives_at_param(previous.param_range().1)
        .first;
    let join = corner.and_then(|c| {
        let outward = (end - c) + (start - c);
        let bulge = if is_zero(outward.norm()) { incoming } else { outward };
        get_round_join(&c, &end, &start, &bulge)
    });
    vec![join.unwrap_or(GeometryLine::Segment([end, start])), next]
}

/// Arc around `center` from `from` to `to`, taking the side `bulge` points to.
pub(crate) fn get_round_join(
    center: &Position,
    from: &Position,
    to: &Position,
    bulge: &Vector,
) -> Option<GeometryLine> {
    let r = get_two_points_distance(center, from);
    if r < DELTA1 {
        return None;
    }
    let circle = Circle::new(*center, r);
    let (a1, a2) = (circle.angle_of_point(from), circle.angle_of_point(to));
    [false, true]
        .into_iter()
        .map(|counterclockwise| Arc::new(*center, r, AngleRange::new(a1, a2, counterclockwise)))
        .find(|arc| (arc.point_at_param(0.5) - center).dot(bulge) >= 0.0)
        .map(GeometryLine::Arc)
}
