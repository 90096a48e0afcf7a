use crate::geometry::angle::AngleRange;
use crate::geometry::curve::circle::is_same_circle;
use crate::geometry::curve::ellipse::is_same_ellipse;
use crate::geometry::curve::hyperbola::is_same_hyperbola;
use crate::geometry::curve::line::is_same_line;
use crate::geometry::{GeneralFormLine, GeometryLine, Ray};
use crate::math::{radian_to_angle, Position, Vector, DELTA2};

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// `range` with every range of `others` cut out. Pieces no longer than
/// [`DELTA2`] are dropped.
#[must_use]
pub fn get_number_ranges_difference(range: (f64, f64), others: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pieces = vec![ordered(range)];
    for other in others {
        let (lo, hi) = ordered(*other);
        pieces = pieces
            .into_iter()
            .flat_map(|(a, b)| {
                if hi <= a || lo >= b {
                    return vec![(a, b)];
                }
                let mut kept = Vec::with_capacity(2);
                if lo > a {
                    kept.push((a, lo));
                }
                if hi < b {
                    kept.push((hi, b));
                }
                kept
            })
            .collect();
    }
    pieces.retain(|(a, b)| b - a > DELTA2);
    pieces
}

/// Sorted union of `ranges`; ranges closer than [`DELTA2`] are joined.
#[must_use]
pub fn get_number_ranges_union(ranges: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(f64, f64)> = ranges.iter().copied().map(ordered).collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut result: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
    for (lo, hi) in sorted {
        match result.last_mut() {
            Some(last) if lo <= last.1 + DELTA2 => last.1 = last.1.max(hi),
            _ => result.push((lo, hi)),
        }
    }
    result
}

/// Both pieces in the coordinate of the first one's support.
struct SharedRanges {
    own: (f64, f64),
    others: Vec<(f64, f64)>,
    /// The coordinate runs against the first piece.
    descending: bool,
}

fn get_line_frame(line: &GeometryLine) -> Option<(Position, Vector)> {
    match line {
        GeometryLine::Segment([a, b]) => {
            let d = b - a;
            let length = d.norm();
            (length > 0.0).then(|| (*a, d / length))
        }
        GeometryLine::Ray(ray) => Some((ray.origin, ray.travel_direction())),
        _ => None,
    }
}

fn get_line_range(line: &GeometryLine, origin: &Position, direction: &Vector) -> Option<(f64, f64)> {
    let project = |p: &Position| (p - origin).dot(direction);
    match line {
        GeometryLine::Segment([a, b]) => Some(ordered((project(a), project(b)))),
        GeometryLine::Ray(ray) => {
            let sign = ray.travel_direction().dot(direction).signum();
            let c = project(&ray.origin);
            let (lo, hi) = line.param_range();
            Some(ordered((c + sign * lo, c + sign * hi)))
        }
        _ => None,
    }
}

/// Relative angles along the first arc; the second one is repeated a turn
/// before and after so that ranges across the seam still meet.
fn get_angle_ranges(
    own: &AngleRange,
    other: &AngleRange,
    other_start: f64,
    other_end: f64,
) -> SharedRanges {
    let direction = own.direction();
    let sweep = if other.is_full() {
        360.0
    } else {
        ((other_end - other_start) * other.direction()).rem_euclid(360.0)
    };
    let start = ((other_start - own.start_angle) * direction).rem_euclid(360.0);
    let base = if other.counterclockwise == own.counterclockwise {
        (start, start + sweep)
    } else {
        (start - sweep, start)
    };
    SharedRanges {
        own: (0.0, own.sweep()),
        others: [-360.0, 0.0, 360.0]
            .into_iter()
            .map(|k| (base.0 + k, base.1 + k))
            .collect(),
        descending: false,
    }
}

/// Both pieces measured in one coordinate along the support of `a`: signed
/// distance for lines, relative angle for circles and ellipses, the
/// hyperbola parameter for hyperbolas.
fn get_shared_ranges(a: &GeometryLine, b: &GeometryLine) -> Option<SharedRanges> {
    match (a, b) {
        (GeometryLine::Segment(_) | GeometryLine::Ray(_), GeometryLine::Segment(_) | GeometryLine::Ray(_)) => {
            let (origin, direction) = get_line_frame(a)?;
            let (bo, bd) = get_line_frame(b)?;
            let through = |o: &Position, d: &Vector| GeneralFormLine::from_point_and_radian(o, d.y.atan2(d.x));
            if !is_same_line(&through(&origin, &direction), &through(&bo, &bd)) {
                return None;
            }
            Some(SharedRanges {
                own: get_line_range(a, &origin, &direction)?,
                others: vec![get_line_range(b, &origin, &direction)?],
                descending: false,
            })
        }
        (GeometryLine::Arc(x), GeometryLine::Arc(y)) => {
            if !is_same_circle(&x.circle(), &y.circle()) {
                return None;
            }
            let circle = x.circle();
            Some(get_angle_ranges(
                &x.range(),
                &y.range(),
                circle.angle_of_point(&y.start_point()),
                circle.angle_of_point(&y.end_point()),
            ))
        }
        (GeometryLine::EllipseArc(x), GeometryLine::EllipseArc(y)) => {
            if !is_same_ellipse(&x.ellipse(), &y.ellipse()) {
                return None;
            }
            let ellipse = x.ellipse();
            Some(get_angle_ranges(
                &x.range(),
                &y.range(),
                ellipse.angle_of_point(&y.start_point()),
                ellipse.angle_of_point(&y.end_point()),
            ))
        }
        (GeometryLine::HyperbolaSegment(x), GeometryLine::HyperbolaSegment(y)) => {
            if !is_same_hyperbola(&x.hyperbola(), &y.hyperbola()) {
                return None;
            }
            Some(SharedRanges {
                own: ordered((x.t1, x.t2)),
                others: vec![ordered((y.t1, y.t2))],
                descending: x.t1 > x.t2,
            })
        }
        _ => None,
    }
}

/// The piece of `line`'s support between two shared coordinates.
fn get_piece(line: &GeometryLine, from: f64, to: f64) -> Option<GeometryLine> {
    match line {
        GeometryLine::Segment(_) | GeometryLine::Ray(_) => {
            let (origin, direction) = get_line_frame(line)?;
            let support = GeometryLine::Ray(Ray::line(origin, radian_to_angle(direction.y.atan2(direction.x))));
            Some(support.part(from, to))
        }
        GeometryLine::Arc(arc) => {
            let sweep = arc.range().sweep();
            let to = to.min(from + 360.0);
            Some(GeometryLine::Arc(arc.part(from / sweep, to / sweep)))
        }
        GeometryLine::EllipseArc(arc) => {
            let sweep = arc.range().sweep();
            let to = to.min(from + 360.0);
            Some(GeometryLine::EllipseArc(arc.part(from / sweep, to / sweep)))
        }
        GeometryLine::HyperbolaSegment(segment) => {
            let (p1, p2) = ordered((segment.param_of_t(from), segment.param_of_t(to)));
            Some(GeometryLine::HyperbolaSegment(segment.part(p1, p2)))
        }
        _ => None,
    }
}

/// What remains of `a` after removing the part covered by `b`.
///
/// `None` when the two do not share a support, in which case nothing can be
/// removed. An empty list means `b` covers `a` entirely.
#[must_use]
pub fn get_two_geometry_lines_difference_line(
    a: &GeometryLine,
    b: &GeometryLine,
) -> Option<Vec<GeometryLine>> {
    let shared = get_shared_ranges(a, b)?;
    let mut pieces: Vec<GeometryLine> = get_number_ranges_difference(shared.own, &shared.others)
        .into_iter()
        .filter_map(|(from, to)| get_piece(a, from, to))
        .collect();
    if shared.descending {
        pieces.reverse();
    }
    Some(pieces)
}

/// One piece covering both `a` and `b`, running the way `a` runs.
///
/// `None` unless the two share a support and overlap or touch.
#[must_use]
pub fn get_two_geometry_lines_union_line(a: &GeometryLine, b: &GeometryLine) -> Option<GeometryLine> {
    let shared = get_shared_ranges(a, b)?;
    let (lo, hi) = shared.own;
    let touching: Vec<(f64, f64)> = shared
        .others
        .into_iter()
        .filter(|(from, to)| *from <= hi + DELTA2 && *to >= lo - DELTA2)
        .collect();
    if touching.is_empty() {
        return None;
    }
    let mut ranges = touching;
    ranges.push(shared.own);
    let (from, to) = get_number_ranges_union(&ranges).into_iter().next()?;
    get_piece(a, from, to)
}

/// Every piece of `lines` with the parts covered by `others` removed.
#[must_use]
pub fn get_geometry_lines_difference_lines(
    lines: &[GeometryLine],
    others: &[GeometryLine],
) -> Vec<GeometryLine> {
    lines
        .iter()
        .flat_map(|line| {
            others.iter().fold(vec![line.clone()], |pieces, other| {
                pieces
                    .into_iter()
                    .flat_map(|piece| {
                        get_two_geometry_lines_difference_line(&piece, other)
                            .unwrap_or_else(|| vec![piece])
                    })
                    .collect()
            })
        })
        .collect()
}
