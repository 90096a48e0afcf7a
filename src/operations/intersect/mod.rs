mod algebraic;
mod numeric;

pub use algebraic::{
    get_general_form_line_circle_intersection_points, get_two_circles_intersection_points,
};

use tracing::trace;

use crate::geometry::geometry_line::is_geometry_lines_closed;
use crate::geometry::position::{
    deduplicate_positions, get_two_points_distance, is_same_point, is_same_point_with,
};
use crate::geometry::{ExtendType, GeometryLine};
use crate::math::{Position, DELTA2};

use algebraic::{
    get_polynomial_conic_points, get_rational_conic_points, implicit_form, polynomial_form,
    rational_form,
};
use numeric::{get_curve_curve_points, get_implicit_curve_points};
pub(crate) use numeric::get_sampled_roots;

/// Result of a curve-curve intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionResult {
    /// The intersection point.
    pub point: Position,
    /// Param on the first curve.
    pub t1: f64,
    /// Param on the second curve.
    pub t2: f64,
}

/// An intersection between two pieces of one or two chains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainIntersection {
    pub point: Position,
    pub index1: usize,
    pub t1: f64,
    pub index2: usize,
    pub t2: f64,
}

/// Intersection points of `a` and `b`, restricted by `extend` on both.
#[must_use]
pub fn get_two_geometry_lines_intersection_points(
    a: &GeometryLine,
    b: &GeometryLine,
    extend: &ExtendType,
) -> Vec<Position> {
    get_two_geometry_lines_intersections(a, b, extend)
        .into_iter()
        .map(|r| r.point)
        .collect()
}

/// Intersections of `a` and `b` with their params on both curves.
///
/// Pairs reduce to a few kernels: a polynomial curve or a rational conic
/// parametrisation substituted into an implicit conic, the radical line of
/// two circles, and a sampled numeric search for pieces with no algebraic
/// form.
#[must_use]
pub fn get_two_geometry_lines_intersections(
    a: &GeometryLine,
    b: &GeometryLine,
    extend: &ExtendType,
) -> Vec<IntersectionResult> {
    let body_only = !extend.head && !extend.tail;
    if body_only && !a.bounding().intersects(&b.bounding(), DELTA2) {
        return Vec::new();
    }
    let mut result: Vec<IntersectionResult> = Vec::new();
    for point in deduplicate_positions(get_candidate_points(a, b)) {
        // numeric refinements of one crossing land a few ulps apart
        if result
            .iter()
            .any(|r| is_same_point_with(&r.point, &point, DELTA2))
        {
            continue;
        }
        let t1 = a.param_at_point(&point);
        let t2 = b.param_at_point(&point);
        if a.is_valid_param(t1, extend)
            && b.is_valid_param(t2, extend)
            && is_on_support(a, t1, &point)
            && is_on_support(b, t2, &point)
        {
            result.push(IntersectionResult { point, t1, t2 });
        }
    }
    trace!(count = result.len(), "geometry line intersections");
    result
}

fn is_on_support(line: &GeometryLine, param: f64, point: &Position) -> bool {
    get_two_points_distance(&line.point_at_param(param), point) < DELTA2
}

fn get_candidate_points(a: &GeometryLine, b: &GeometryLine) -> Vec<Position> {
    if let (GeometryLine::Arc(x), GeometryLine::Arc(y)) = (a, b) {
        return get_two_circles_intersection_points(&x.circle(), &y.circle());
    }
    let polynomial = [(a, b), (b, a)]
        .into_iter()
        .filter_map(|(curve, support)| {
            let form = polynomial_form(curve)?;
            let (conic, degree) = implicit_form(support)?;
            let curve_degree = form[0].degree().max(form[1].degree());
            Some((curve_degree * degree, form, conic))
        })
        .min_by_key(|(degree, _, _)| *degree);
    if let Some((_, form, conic)) = polynomial {
        return get_polynomial_conic_points(&form, &conic);
    }
    for (curve, support) in [(a, b), (b, a)] {
        if let (Some(form), Some((conic, _))) = (rational_form(curve), implicit_form(support)) {
            return get_rational_conic_points(&form, &conic);
        }
    }
    if let Some((conic, _)) = implicit_form(a) {
        return get_implicit_curve_points(&conic, b);
    }
    if let Some((conic, _)) = implicit_form(b) {
        return get_implicit_curve_points(&conic, a);
    }
    get_curve_curve_points(a, b)
}

/// Every intersection between a piece of `lines1` and a piece of `lines2`,
/// produced lazily pair by pair.
pub fn iterate_geometry_lines_intersection_points<'a>(
    lines1: &'a [GeometryLine],
    lines2: &'a [GeometryLine],
) -> impl Iterator<Item = ChainIntersection> + 'a {
    lines1.iter().enumerate().flat_map(move |(index1, a)| {
        lines2.iter().enumerate().flat_map(move |(index2, b)| {
            get_two_geometry_lines_intersections(a, b, &ExtendType::default())
                .into_iter()
                .map(move |r| ChainIntersection {
                    point: r.point,
                    index1,
                    t1: r.t1,
                    index2,
                    t2: r.t2,
                })
        })
    })
}

/// Intersections of a chain with itself, skipping the joints where
/// neighbouring pieces meet.
pub fn iterate_geometry_lines_self_intersection_points(
    lines: &[GeometryLine],
) -> impl Iterator<Item = ChainIntersection> + '_ {
    let closed = is_geometry_lines_closed(lines);
    let count = lines.len();
    (0..count)
        .flat_map(move |i| ((i + 1)..count).map(move |j| (i, j)))
        .flat_map(move |(index1, index2)| {
            let joint = if index2 == index1 + 1 {
                lines[index1].end_point()
            } else if closed && index1 == 0 && index2 == count - 1 {
                lines[0].start_point()
            } else {
                None
            };
            get_two_geometry_lines_intersections(&lines[index1], &lines[index2], &ExtendType::default())
                .into_iter()
                .filter(move |r| joint.map_or(true, |p| !is_same_point(&p, &r.point)))
                .map(move |r| ChainIntersection {
                    point: r.point,
                    index1,
                    t1: r.t1,
                    index2,
                    t2: r.t2,
                })
        })
}
