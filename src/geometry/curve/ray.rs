use crate::geometry::position::get_direction_by_radian;
use crate::math::{
    is_zero, larger_or_equal_with, less_or_equal_with, Position, TwoPointsFormRegion, Vector,
};

use super::line::{point_is_on_line, GeneralFormLine};
use super::Derivatives;

/// A half-line from `origin` pointing at `angle` degrees, or a whole line when
/// `bidirectional`.
///
/// `reversed` only flips the traversal: a reversed ray comes in from infinity
/// and ends at `origin`. The param is the signed distance along the traversal
/// direction, so it runs over `[0, ∞)` normally and `(-∞, 0]` when reversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Position,
    pub angle: f64,
    pub bidirectional: bool,
    pub reversed: bool,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Position, angle: f64) -> Self {
        Self {
            origin,
            angle,
            bidirectional: false,
            reversed: false,
        }
    }

    /// The whole line through `origin` at `angle` degrees.
    #[must_use]
    pub fn line(origin: Position, angle: f64) -> Self {
        Self {
            bidirectional: true,
            ..Self::new(origin, angle)
        }
    }

    /// Ray from `from` through `to`; `None` when the points coincide.
    #[must_use]
    pub fn through(from: &Position, to: &Position) -> Option<Self> {
        let d = to - from;
        if is_zero(d.norm()) {
            return None;
        }
        Some(Self::new(*from, d.y.atan2(d.x).to_degrees()))
    }

    /// Unit vector at `angle`.
    #[must_use]
    pub fn direction(&self) -> Vector {
        get_direction_by_radian(self.angle.to_radians())
    }

    /// Unit vector of travel.
    #[must_use]
    pub fn travel_direction(&self) -> Vector {
        if self.reversed {
            -self.direction()
        } else {
            self.direction()
        }
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        self.origin + self.travel_direction() * param
    }

    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        (point - self.origin).dot(&self.travel_direction())
    }

    /// Whether `param` is inside the ray, within `delta`.
    #[must_use]
    pub fn contains_param(&self, param: f64, delta: f64) -> bool {
        if self.bidirectional {
            true
        } else if self.reversed {
            less_or_equal_with(param, 0.0, delta)
        } else {
            larger_or_equal_with(param, 0.0, delta)
        }
    }

    #[must_use]
    pub fn derivatives_at_param(&self, param: f64) -> Derivatives {
        Derivatives {
            point: self.point_at_param(param),
            first: self.travel_direction(),
            second: Vector::zeros(),
        }
    }

    /// The finite ends: `(Some(origin), None)` for a plain ray,
    /// `(None, Some(origin))` when reversed, `(None, None)` for a line.
    #[must_use]
    pub fn start_and_end(&self) -> (Option<Position>, Option<Position>) {
        match (self.bidirectional, self.reversed) {
            (true, _) => (None, None),
            (false, false) => (Some(self.origin), None),
            (false, true) => (None, Some(self.origin)),
        }
    }

    /// The supporting line, travelling the same way as the ray.
    #[must_use]
    pub fn to_general_form_line(&self) -> GeneralFormLine {
        let d = self.travel_direction();
        GeneralFormLine::from_point_and_radian(&self.origin, d.y.atan2(d.x))
    }

    #[must_use]
    pub fn reversed_ray(&self) -> Self {
        Self {
            reversed: !self.reversed,
            ..*self
        }
    }

    /// Unbounded along every axis the ray extends into.
    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let d = self.direction();
        let axis = |origin: f64, component: f64| -> (f64, f64) {
            if is_zero(component) {
                (origin, origin)
            } else if self.bidirectional {
                (f64::NEG_INFINITY, f64::INFINITY)
            } else if component > 0.0 {
                (origin, f64::INFINITY)
            } else {
                (f64::NEG_INFINITY, origin)
            }
        };
        let (x0, x1) = axis(self.origin.x, d.x);
        let (y0, y1) = axis(self.origin.y, d.y);
        TwoPointsFormRegion {
            start: Position::new(x0, y0),
            end: Position::new(x1, y1),
        }
    }
}

/// Whether `point` lies on `ray` within `delta`.
#[must_use]
pub fn point_is_on_ray(point: &Position, ray: &Ray, delta: f64) -> bool {
    point_is_on_line(point, &ray.to_general_form_line(), delta)
        && ray.contains_param(ray.param_at_point(point), delta)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::position::is_same_point;
    use crate::math::DELTA2;

    #[test]
    fn params_follow_traversal() {
        let ray = Ray::new(Position::new(1.0, 1.0), 90.0);
        assert!(is_same_point(&ray.point_at_param(2.0), &Position::new(1.0, 3.0)));
        assert_abs_diff_eq!(ray.param_at_point(&Position::new(1.0, 4.0)), 3.0, epsilon = 1e-12);
        let reversed = ray.reversed_ray();
        assert_abs_diff_eq!(reversed.param_at_point(&Position::new(1.0, 4.0)), -3.0, epsilon = 1e-12);
        assert!(reversed.contains_param(-3.0, DELTA2));
        assert!(!reversed.contains_param(1.0, DELTA2));
        assert_eq!(reversed.reversed_ray(), ray);
    }

    #[test]
    fn membership() {
        let ray = Ray::through(&Position::new(0.0, 0.0), &Position::new(1.0, 1.0)).unwrap();
        assert!(point_is_on_ray(&Position::new(2.0, 2.0), &ray, DELTA2));
        assert!(!point_is_on_ray(&Position::new(-2.0, -2.0), &ray, DELTA2));
        let line = Ray::line(Position::new(0.0, 0.0), 45.0);
        assert!(point_is_on_ray(&Position::new(-2.0, -2.0), &line, DELTA2));
        assert!(Ray::through(&Position::new(1.0, 1.0), &Position::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn ends_and_bounding() {
        let ray = Ray::new(Position::new(1.0, 2.0), 0.0);
        assert_eq!(ray.start_and_end(), (Some(Position::new(1.0, 2.0)), None));
        assert_eq!(ray.reversed_ray().start_and_end(), (None, Some(Position::new(1.0, 2.0))));
        let b = ray.bounding();
        assert_abs_diff_eq!(b.start.x, 1.0);
        assert!(b.end.x.is_infinite());
        assert_abs_diff_eq!(b.start.y, 2.0);
        assert_abs_diff_eq!(b.end.y, 2.0);
    }
}
