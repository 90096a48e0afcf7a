use crate::geometry::angle::{angle_in_range_with, merge_angle_ranges, AngleRange};
use crate::geometry::position::{get_two_point_center, get_two_points_distance, is_same_point_with};
use crate::math::{get_points_bounding, is_zero, Position, TwoPointsFormRegion, Vector, DELTA1};

use super::circle::{is_same_circle, point_is_on_circle, Circle};
use super::Derivatives;

/// A circular arc: a circle restricted to an [`AngleRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Position,
    pub r: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub counterclockwise: bool,
}

impl Arc {
    #[must_use]
    pub fn new(center: Position, r: f64, range: AngleRange) -> Self {
        Self {
            center,
            r,
            start_angle: range.start_angle,
            end_angle: range.end_angle,
            counterclockwise: range.counterclockwise,
        }
    }

    /// The whole circle as an arc from 0° to 360°.
    #[must_use]
    pub fn from_circle(circle: &Circle) -> Self {
        Self::new(circle.center, circle.r, AngleRange::full())
    }

    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.r)
    }

    #[must_use]
    pub fn range(&self) -> AngleRange {
        AngleRange::new(self.start_angle, self.end_angle, self.counterclockwise)
    }

    /// Swept angle in radians, negative when the angle shrinks along the arc.
    #[must_use]
    pub fn signed_sweep_radian(&self) -> f64 {
        let range = self.range();
        range.direction() * range.sweep().to_radians()
    }

    #[must_use]
    pub fn start_point(&self) -> Position {
        self.circle().point_at_angle(self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Position {
        self.circle().point_at_angle(self.end_angle)
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        self.circle().point_at_angle(self.range().angle_at_param(param))
    }

    /// Param of the polar angle of `point`; outside `[0, 1]` beyond the ends.
    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        self.range()
            .param_at_angle(self.circle().angle_of_point(point))
    }

    #[must_use]
    pub fn derivatives_at_param(&self, param: f64) -> Derivatives {
        let k = self.signed_sweep_radian();
        let radian = self.range().angle_at_param(param).to_radians();
        let (sin, cos) = radian.sin_cos();
        Derivatives {
            point: Position::new(self.center.x + self.r * cos, self.center.y + self.r * sin),
            first: Vector::new(-sin, cos) * (self.r * k),
            second: Vector::new(cos, sin) * (-self.r * k * k),
        }
    }

    /// Signed curvature, `1/r` when the angle grows along the arc.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        if self.r == 0.0 {
            return 0.0;
        }
        self.range().direction() / self.r
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.r * self.range().sweep().to_radians()
    }

    /// Endpoints plus every axis extreme the arc passes.
    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let range = self.range();
        let mut points = vec![self.start_point(), self.end_point()];
        for angle in [0.0, 90.0, 180.0, 270.0] {
            if angle_in_range_with(angle, &range, 0.0) {
                points.push(self.circle().point_at_angle(angle));
            }
        }
        get_points_bounding(&points).unwrap_or_else(|| self.circle().bounding())
    }

    /// The same points traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.center, self.r, self.range().reversed())
    }

    /// Sub-arc between two params; `from > to` reverses the traversal.
    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        let range = self.range();
        let counterclockwise = if from > to {
            !self.counterclockwise
        } else {
            self.counterclockwise
        };
        Self::new(
            self.center,
            self.r,
            AngleRange::new(
                range.angle_at_param(from),
                range.angle_at_param(to),
                counterclockwise,
            ),
        )
    }
}

/// Whether `point` is on the circle of `arc` and inside its angle range.
#[must_use]
pub fn point_is_on_arc(point: &Position, arc: &Arc, delta: f64) -> bool {
    if !point_is_on_circle(point, &arc.circle(), delta) {
        return false;
    }
    angle_in_range_with(arc.circle().angle_of_point(point), &arc.range(), 0.0)
        || is_same_point_with(point, &arc.start_point(), delta)
        || is_same_point_with(point, &arc.end_point(), delta)
}

/// Arc from SVG endpoint parameters.
///
/// `sweep == true` means the angle grows from `from` to `to`. A radius too
/// small to span the chord is scaled up to half the chord.
#[must_use]
pub fn get_arc_by_start_end(
    from: &Position,
    radius: f64,
    large_arc: bool,
    sweep: bool,
    to: &Position,
) -> Option<Arc> {
    let chord = get_two_points_distance(from, to);
    if is_zero(chord) {
        return None;
    }
    let r = radius.abs().max(chord / 2.0);
    let h = (r * r - chord * chord / 4.0).max(0.0).sqrt();
    let d = (to - from) / chord;
    let normal = Vector::new(-d.y, d.x);
    let side = if sweep == large_arc { -1.0 } else { 1.0 };
    let center = get_two_point_center(from, to) + normal * (h * side);
    let circle = Circle::new(center, r);
    Some(Arc::new(
        center,
        r,
        AngleRange::new(
            circle.angle_of_point(from),
            circle.angle_of_point(to),
            !sweep,
        ),
    ))
}

/// Arc from its chord endpoints and a bulge `tan(sweep / 4)`.
///
/// Positive bulge makes the angle grow along the arc. Returns `None` for a
/// zero bulge (a straight segment) or a zero-length chord.
#[must_use]
pub fn get_arc_by_start_end_bulge(start: &Position, end: &Position, bulge: f64) -> Option<Arc> {
    let chord = get_two_points_distance(start, end);
    if chord < DELTA1 || is_zero(bulge) || !bulge.is_finite() {
        return None;
    }
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let d = (end - start) / chord;
    let normal = Vector::new(-d.y, d.x);
    let center = get_two_point_center(start, end) + normal * (sagitta_ratio * chord * 0.5);
    let r = (chord * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (start.y - center.y).atan2(start.x - center.x).to_degrees();
    let sweep = (4.0 * bulge.atan()).to_degrees();
    Some(Arc::new(
        center,
        r,
        AngleRange::new(start_angle, start_angle + sweep, bulge < 0.0),
    ))
}

/// Bulge of an arc, the inverse of [`get_arc_by_start_end_bulge`].
#[must_use]
pub fn get_arc_bulge(arc: &Arc) -> f64 {
    (arc.signed_sweep_radian() / 4.0).tan()
}

/// Joins two arcs on the same circle when one ends where the other starts.
///
/// Both arcs must run in the same direction. The result covers at most the
/// whole circle.
#[must_use]
pub fn merge_arc(a: &Arc, b: &Arc) -> Option<Arc> {
    if !is_same_circle(&a.circle(), &b.circle()) {
        return None;
    }
    let range = merge_angle_ranges(&a.range(), &b.range())?;
    Some(Arc::new(a.center, a.r, range))
}
