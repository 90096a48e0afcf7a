use crate::error::Result;
use crate::geometry::GeometryLine;
use crate::math::{Matrix3, Position};

use super::GeneralTransform;

/// Shears curve pieces around a center.
#[derive(Debug)]
pub struct Skew {
    center: Position,
    x_angle: f64,
    y_angle: f64,
}

impl Skew {
    /// Creates a new `Skew` operation.
    ///
    /// * `x_angle` - Lean of vertical lines towards +x, in radians.
    /// * `y_angle` - Lean of horizontal lines towards +y, in radians.
    #[must_use]
    pub fn new(center: Position, x_angle: f64, y_angle: f64) -> Self {
        Self {
            center,
            x_angle,
            y_angle,
        }
    }

    /// Executes the shear, modifying the pieces in place.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the two shears make the
    /// matrix singular (`tan(x_angle)·tan(y_angle) = 1`), or
    /// `NumericError::InvalidInput` if a mapped ellipse arc cannot be
    /// decomposed back into axes and radii.
    pub fn execute(&self, lines: &mut [GeometryLine]) -> Result<()> {
        let t_neg = Matrix3::new_translation(&(-self.center.coords));
        #[rustfmt::skip]
        let skew = Matrix3::new(
            1.0,                 self.x_angle.tan(), 0.0,
            self.y_angle.tan(),  1.0,                0.0,
            0.0,                 0.0,                1.0,
        );
        let t_pos = Matrix3::new_translation(&self.center.coords);
        GeneralTransform::new(t_pos * skew * t_neg).execute(lines)
    }
}
