use crate::geometry::curve::line::GeneralFormLine;
use crate::math::{Matrix3, Polynomial, Position, Vector};

/// Second-degree curve `a·x² + b·xy + c·y² + d·x + e·y + f = 0`.
///
/// Circles, ellipses, hyperbolas and parabolas all reduce to this form, which
/// lets intersection and tangency code substitute one curve into another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Conic {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Reads the coefficients back from a symmetric conic matrix.
    #[must_use]
    pub fn from_matrix(m: &Matrix3) -> Self {
        Self::new(
            m[(0, 0)],
            m[(0, 1)] + m[(1, 0)],
            m[(1, 1)],
            m[(0, 2)] + m[(2, 0)],
            m[(1, 2)] + m[(2, 1)],
            m[(2, 2)],
        )
    }

    /// Symmetric matrix `M` with `pᵀ·M·p = 0` for homogeneous points on the curve.
    #[must_use]
    pub fn matrix(&self) -> Matrix3 {
        Matrix3::new(
            self.a,
            self.b / 2.0,
            self.d / 2.0,
            self.b / 2.0,
            self.c,
            self.e / 2.0,
            self.d / 2.0,
            self.e / 2.0,
            self.f,
        )
    }

    /// Places a conic written in a frame centered at `center` and rotated by
    /// `angle` degrees into world coordinates.
    #[must_use]
    pub fn from_local(center: &Position, angle: f64, local: &Conic) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        let to_local = Matrix3::new(
            cos,
            sin,
            -(cos * center.x + sin * center.y),
            -sin,
            cos,
            sin * center.x - cos * center.y,
            0.0,
            0.0,
            1.0,
        );
        Self::from_matrix(&(to_local.transpose() * local.matrix() * to_local))
    }

    /// The curve after the points are mapped by `transform`, given the inverse.
    #[must_use]
    pub fn transformed_by_inverse(&self, inverse: &Matrix3) -> Self {
        Self::from_matrix(&(inverse.transpose() * self.matrix() * inverse))
    }

    #[must_use]
    pub fn evaluate(&self, p: &Position) -> f64 {
        self.a * p.x * p.x
            + self.b * p.x * p.y
            + self.c * p.y * p.y
            + self.d * p.x
            + self.e * p.y
            + self.f
    }

    #[must_use]
    pub fn gradient(&self, p: &Position) -> Vector {
        Vector::new(
            2.0 * self.a * p.x + self.b * p.y + self.d,
            self.b * p.x + 2.0 * self.c * p.y + self.e,
        )
    }

    /// Polar line of `p`. For an external point it passes through both
    /// tangency points.
    #[must_use]
    pub fn polar_line(&self, p: &Position) -> Option<GeneralFormLine> {
        let l = self.matrix() * nalgebra::Vector3::new(p.x, p.y, 1.0);
        let line = GeneralFormLine::new(l.x, l.y, l.z);
        if line.is_degenerate() {
            None
        } else {
            Some(line)
        }
    }

    /// Substitutes the homogeneous rational curve `(x/w, y/w)`, clearing `w²`.
    #[must_use]
    pub fn substitute(&self, x: &Polynomial, y: &Polynomial, w: &Polynomial) -> Polynomial {
        &(&(&(&(&(x * x).scale(self.a) + &(x * y).scale(self.b)) + &(y * y).scale(self.c))
            + &(x * w).scale(self.d))
            + &(y * w).scale(self.e))
            + &(w * w).scale(self.f)
    }

    /// Substitutes a polynomial curve `(x(t), y(t))`.
    #[must_use]
    pub fn substitute_polynomial(&self, x: &Polynomial, y: &Polynomial) -> Polynomial {
        self.substitute(x, y, &Polynomial::constant(1.0))
    }
}
