use crate::error::Result;
use crate::geometry::GeometryLine;
use crate::math::{Matrix3, Position, Vector};

use super::GeneralTransform;

/// Scales curve pieces from a center point, independently per axis.
#[derive(Debug)]
pub struct Scale {
    center: Position,
    factor: Vector,
}

impl Scale {
    /// Creates a new `Scale` operation.
    #[must_use]
    pub fn new(center: Position, sx: f64, sy: f64) -> Self {
        Self {
            center,
            factor: Vector::new(sx, sy),
        }
    }

    /// Uniform scaling by `factor`.
    #[must_use]
    pub fn uniform(center: Position, factor: f64) -> Self {
        Self::new(center, factor, factor)
    }

    /// Executes the scaling, modifying the pieces in place.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if a factor is zero, which makes
    /// the matrix singular, or `NumericError::InvalidInput` if a mapped ellipse arc cannot be
    /// decomposed back into axes and radii.
    pub fn execute(&self, lines: &mut [GeometryLine]) -> Result<()> {
        let t_neg = Matrix3::new_translation(&(-self.center.coords));
        let scale = Matrix3::new_nonuniform_scaling(&self.factor);
        let t_pos = Matrix3::new_translation(&self.center.coords);
        GeneralTransform::new(t_pos * scale * t_neg).execute(lines)
    }
}
