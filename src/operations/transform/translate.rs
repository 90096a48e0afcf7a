use crate::error::Result;
use crate::geometry::GeometryLine;
use crate::math::{Matrix3, Vector};

use super::GeneralTransform;

/// Moves curve pieces by a displacement vector.
#[derive(Debug)]
pub struct Translate {
    displacement: Vector,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(displacement: Vector) -> Self {
        Self { displacement }
    }

    /// Executes the translation, modifying the pieces in place.
    ///
    /// # Errors
    ///
    /// A translation never collapses the plane, so the only failure is
    /// `NumericError::InvalidInput` if a mapped ellipse arc cannot be
    /// decomposed back into axes and radii.
    pub fn execute(&self, lines: &mut [GeometryLine]) -> Result<()> {
        GeneralTransform::new(Matrix3::new_translation(&self.displacement)).execute(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::angle::AngleRange;
    use crate::geometry::position::is_same_point_with;
    use crate::geometry::{Arc, Ellipse, EllipseArc};
    use crate::math::Position;

    #[test]
    fn translate_arc() {
        let mut lines: Vec<GeometryLine> =
            vec![Arc::new(Position::new(1.0, 1.0), 2.0, AngleRange::new(0.0, 90.0, false)).into()];
        Translate::new(Vector::new(3.0, -1.0)).execute(&mut lines).unwrap();
        let GeometryLine::Arc(arc) = &lines[0] else {
            panic!("translated arcs stay arcs");
        };
        assert!(is_same_point_with(&arc.center, &Position::new(4.0, 0.0), 1e-12));
        assert!(is_same_point_with(&arc.end_point(), &Position::new(4.0, 2.0), 1e-12));
        assert!(!arc.counterclockwise);
    }

    #[test]
    fn translated_ellipse_keeps_its_radii() {
        let ellipse = Ellipse::new(Position::new(1.0, 1.0), 4.0, 2.0, 30.0);
        let mut lines: Vec<GeometryLine> = vec![EllipseArc::from_ellipse(ellipse).into()];
        Translate::new(Vector::new(-1.0, 2.0)).execute(&mut lines).unwrap();
        let GeometryLine::EllipseArc(arc) = &lines[0] else {
            panic!("translated ellipse arcs stay ellipse arcs");
        };
        assert!(is_same_point_with(&arc.center, &Position::new(0.0, 3.0), 1e-12));
        assert!((arc.rx - 4.0).abs() < 1e-9);
        assert!((arc.ry - 2.0).abs() < 1e-9);
    }
}
