use crate::error::Result;
use crate::geometry::GeometryLine;
use crate::math::{Matrix3, Position};

use super::GeneralTransform;

/// Rotates curve pieces around a center.
#[derive(Debug)]
pub struct Rotate {
    center: Position,
    angle: f64,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    ///
    /// * `angle` - Rotation angle in radians, positive in the direction
    ///   angles grow.
    #[must_use]
    pub fn new(center: Position, angle: f64) -> Self {
        Self { center, angle }
    }

    /// Executes the rotation, modifying the pieces in place.
    ///
    /// # Errors
    ///
    /// A rotation never collapses the plane, so the only failure is
    /// `NumericError::InvalidInput` if a mapped ellipse arc cannot be
    /// decomposed back into axes and radii.
    pub fn execute(&self, lines: &mut [GeometryLine]) -> Result<()> {
        // Translate to origin, rotate, translate back
        let t_neg = Matrix3::new_translation(&(-self.center.coords));
        let rot = Matrix3::new_rotation(self.angle);
        let t_pos = Matrix3::new_translation(&self.center.coords);
        GeneralTransform::new(t_pos * rot * t_neg).execute(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::position::is_same_point_with;
    use crate::geometry::{Ellipse, EllipseArc, Ray};

    #[test]
    fn rotate_90_around_a_center() {
        let mut lines = vec![
            GeometryLine::Segment([Position::new(2.0, 1.0), Position::new(3.0, 1.0)]),
            Ray::new(Position::new(2.0, 1.0), 0.0).into(),
        ];
        Rotate::new(Position::new(1.0, 1.0), FRAC_PI_2)
            .execute(&mut lines)
            .unwrap();
        let GeometryLine::Segment([a, b]) = lines[0] else {
            panic!("segments stay segments");
        };
        assert!(is_same_point_with(&a, &Position::new(1.0, 2.0), 1e-12));
        assert!(is_same_point_with(&b, &Position::new(1.0, 3.0), 1e-12));
        let GeometryLine::Ray(ray) = lines[1] else {
            panic!("rays stay rays");
        };
        assert_abs_diff_eq!(ray.angle, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn rotated_ellipse_turns_its_axis() {
        let ellipse = Ellipse::new(Position::origin(), 3.0, 1.0, 10.0);
        let mut lines: Vec<GeometryLine> = vec![EllipseArc::from_ellipse(ellipse).into()];
        Rotate::new(Position::origin(), FRAC_PI_2).execute(&mut lines).unwrap();
        let GeometryLine::EllipseArc(arc) = &lines[0] else {
            panic!("ellipse arcs stay ellipse arcs");
        };
        assert_abs_diff_eq!(arc.rx, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.ry, 1.0, epsilon = 1e-9);
        let start = arc.start_point();
        assert!(is_same_point_with(&start, &Position::new(-ellipse.point_at_angle(0.0).y, ellipse.point_at_angle(0.0).x), 1e-9));
    }
}
