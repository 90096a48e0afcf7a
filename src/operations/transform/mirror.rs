use crate::error::{OperationError, Result};
use crate::geometry::position::is_same_point;
use crate::geometry::GeometryLine;
use crate::math::{Matrix3, Position};

use super::GeneralTransform;

/// Mirrors curve pieces across the line through two points.
#[derive(Debug)]
pub struct Mirror {
    p1: Position,
    p2: Position,
}

impl Mirror {
    /// Creates a new `Mirror` operation.
    #[must_use]
    pub fn new(p1: Position, p2: Position) -> Self {
        Self { p1, p2 }
    }

    /// Executes the mirror, modifying the pieces in place. Arcs and ellipse
    /// arcs come out running the other way round.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the two points coincide, or
    /// `NumericError::InvalidInput` if a mapped ellipse arc cannot be
    /// decomposed back into axes and radii.
    pub fn execute(&self, lines: &mut [GeometryLine]) -> Result<()> {
        if is_same_point(&self.p1, &self.p2) {
            return Err(OperationError::InvalidInput("mirror line needs two distinct points".into()).into());
        }
        let d = (self.p2 - self.p1).normalize();
        let t_neg = Matrix3::new_translation(&(-self.p1.coords));
        #[rustfmt::skip]
        let reflect = Matrix3::new(
            d.x * d.x - d.y * d.y, 2.0 * d.x * d.y,       0.0,
            2.0 * d.x * d.y,       d.y * d.y - d.x * d.x, 0.0,
            0.0,                   0.0,                   1.0,
        );
        let t_pos = Matrix3::new_translation(&self.p1.coords);
        GeneralTransform::new(t_pos * reflect * t_neg).execute(lines)
    }
}
