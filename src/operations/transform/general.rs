use nalgebra::Matrix2;

use crate::error::{NumericError, OperationError, Result};
use crate::geometry::angle::AngleRange;
use crate::geometry::{Arc, Ellipse, EllipseArc, GeometryLine, Hyperbola, HyperbolaSegment};
use crate::math::{cross, is_same_number, is_zero, radian_to_angle, Matrix3, Position, Vector};

/// Applies an arbitrary 3x3 affine matrix to curve pieces.
#[derive(Debug)]
pub struct GeneralTransform {
    matrix: Matrix3,
}

impl GeneralTransform {
    /// Creates a new `GeneralTransform` operation.
    #[must_use]
    pub fn new(matrix: Matrix3) -> Self {
        Self { matrix }
    }

    /// Executes the transformation, modifying every piece in place.
    ///
    /// Arcs stay arcs under similarities and become ellipse arcs otherwise.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the matrix collapses the plane,
    /// or `NumericError::InvalidInput` if an ellipse cannot be decomposed.
    pub fn execute(&self, lines: &mut [GeometryLine]) -> Result<()> {
        let linear = self.linear();
        if is_zero(linear.determinant()) {
            return Err(OperationError::InvalidInput("transform matrix must be invertible".into()).into());
        }
        for line in lines.iter_mut() {
            *line = self.transform_line(line)?;
        }
        Ok(())
    }

    fn linear(&self) -> Matrix2<f64> {
        self.matrix.fixed_view::<2, 2>(0, 0).into_owned()
    }

    fn point(&self, point: &Position) -> Position {
        self.matrix.transform_point(point)
    }

    fn direction(&self, vector: &Vector) -> Vector {
        self.linear() * vector
    }

    fn is_similarity(&self) -> bool {
        let linear = self.linear();
        let (c0, c1) = (linear.column(0).into_owned(), linear.column(1).into_owned());
        is_same_number(c0.norm(), c1.norm()) && is_zero(c0.dot(&c1) / (c0.norm() * c1.norm()))
    }

    fn transform_line(&self, line: &GeometryLine) -> Result<GeometryLine> {
        let result = match line {
            GeometryLine::Segment([a, b]) => GeometryLine::Segment([self.point(a), self.point(b)]),
            GeometryLine::QuadraticCurve(curve) => {
                let mut curve = *curve;
                for p in [&mut curve.from, &mut curve.cp, &mut curve.to] {
                    *p = self.point(p);
                }
                GeometryLine::QuadraticCurve(curve)
            }
            GeometryLine::BezierCurve(curve) => {
                let mut curve = *curve;
                for p in [&mut curve.from, &mut curve.cp1, &mut curve.cp2, &mut curve.to] {
                    *p = self.point(p);
                }
                GeometryLine::BezierCurve(curve)
            }
            GeometryLine::Nurbs(nurbs) => {
                let mut nurbs = nurbs.clone();
                for p in &mut nurbs.points {
                    *p = self.point(p);
                }
                GeometryLine::Nurbs(nurbs)
            }
            GeometryLine::Ray(ray) => {
                let d = self.direction(&ray.direction());
                let mut ray = *ray;
                ray.origin = self.point(&ray.origin);
                ray.angle = radian_to_angle(d.y.atan2(d.x));
                GeometryLine::Ray(ray)
            }
            GeometryLine::Arc(arc) if self.is_similarity() => GeometryLine::Arc(self.transform_arc(arc)),
            GeometryLine::Arc(arc) => {
                let ellipse = Ellipse::new(arc.center, arc.r, arc.r, 0.0);
                GeometryLine::EllipseArc(self.transform_ellipse_arc(&EllipseArc::new(ellipse, arc.range()))?)
            }
            GeometryLine::EllipseArc(arc) => GeometryLine::EllipseArc(self.transform_ellipse_arc(arc)?),
            GeometryLine::HyperbolaSegment(segment) => {
                GeometryLine::HyperbolaSegment(self.transform_hyperbola_segment(segment))
            }
        };
        Ok(result)
    }

    fn transform_arc(&self, arc: &Arc) -> Arc {
        let flip = self.linear().determinant() < 0.0;
        let center = self.point(&arc.center);
        let range = arc.range();
        let start = self.point(&arc.start_point()) - center;
        let start_angle = radian_to_angle(start.y.atan2(start.x));
        let counterclockwise = arc.counterclockwise != flip;
        let direction = if counterclockwise { -1.0 } else { 1.0 };
        Arc::new(
            center,
            start.norm(),
            AngleRange::new(
                start_angle,
                start_angle + direction * range.sweep(),
                counterclockwise,
            ),
        )
    }

    /// The mapped axis matrix `L·R·diag(rx, ry)` is split by SVD into
    /// `U·Σ·Vᵀ`: `U` gives the new axes, `Σ` the radii and `Vᵀ` a shift (or
    /// mirror) of the parametric angle.
    fn transform_ellipse_arc(&self, arc: &EllipseArc) -> Result<EllipseArc> {
        let (sin, cos) = arc.angle.to_radians().sin_cos();
        let axes = Matrix2::new(cos * arc.rx, -sin * arc.ry, sin * arc.rx, cos * arc.ry);
        let svd = (self.linear() * axes).svd(true, true);
        let (Some(mut u), Some(mut v_t)) = (svd.u, svd.v_t) else {
            return Err(NumericError::InvalidInput("ellipse axes could not be decomposed".into()).into());
        };
        if u.determinant() < 0.0 {
            let column = -u.column(1);
            let row = -v_t.row(1);
            u.set_column(1, &column);
            v_t.set_row(1, &row);
        }
        let alpha = radian_to_angle(v_t[(0, 1)].atan2(v_t[(0, 0)]));
        let mirrored = v_t.determinant() < 0.0;
        let ellipse = Ellipse::new(
            self.point(&arc.center),
            svd.singular_values[0],
            svd.singular_values[1],
            radian_to_angle(u[(1, 0)].atan2(u[(0, 0)])),
        );
        let range = if mirrored {
            AngleRange::new(alpha - arc.start_angle, alpha - arc.end_angle, !arc.counterclockwise)
        } else {
            AngleRange::new(arc.start_angle - alpha, arc.end_angle - alpha, arc.counterclockwise)
        };
        Ok(EllipseArc::new(ellipse, range))
    }

    /// The mapped branch `m1·cosh s + m2·sinh s` is rewritten with conjugate
    /// axes made perpendicular by a hyperbolic shift `κ` of the parameter.
    fn transform_hyperbola_segment(&self, segment: &HyperbolaSegment) -> HyperbolaSegment {
        let (sin, cos) = segment.angle.to_radians().sin_cos();
        let m1 = self.direction(&(Vector::new(cos, sin) * segment.a));
        let m2 = self.direction(&(Vector::new(-sin, cos) * segment.b));
        let kappa = (2.0 * m1.dot(&m2) / (m1.norm_squared() + m2.norm_squared())).atanh() / 2.0;
        let (sinh, cosh) = (kappa.sinh(), kappa.cosh());
        let axis = m1 * cosh - m2 * sinh;
        let conjugate = m2 * cosh - m1 * sinh;
        let sign = cross(&axis, &conjugate).signum();
        let hyperbola = Hyperbola::new(
            self.point(&segment.center),
            axis.norm(),
            conjugate.norm(),
            radian_to_angle(axis.y.atan2(axis.x)),
        );
        let shift = |t: f64| sign * (t.asinh() + kappa).sinh();
        HyperbolaSegment::new(hyperbola, shift(segment.t1), shift(segment.t2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::geometry::curve::hyperbola::point_is_on_hyperbola_segment;
    use crate::geometry::position::is_same_point_with;
    use crate::geometry::{BezierCurve, Nurbs, Ray};

    fn skew_mirror() -> Matrix3 {
        Matrix3::new(1.0, 0.7, 2.0, 0.3, -1.5, -1.0, 0.0, 0.0, 1.0)
    }

    fn assert_maps(matrix: &Matrix3, before: &GeometryLine, after: &GeometryLine) {
        for i in 0..=8 {
            let t = f64::from(i) / 8.0;
            let expected = matrix.transform_point(&before.point_at_param(t));
            assert!(
                is_same_point_with(&after.point_at_param(t), &expected, 1e-9),
                "param {t}: {:?} vs {expected:?}",
                after.point_at_param(t)
            );
        }
    }

    #[test]
    fn rotate_segment() {
        let mut lines = vec![GeometryLine::Segment([Position::new(1.0, 0.0), Position::new(2.0, 0.0)])];
        GeneralTransform::new(Matrix3::new_rotation(FRAC_PI_2)).execute(&mut lines).unwrap();
        let GeometryLine::Segment([a, b]) = lines[0] else {
            panic!("segments stay segments");
        };
        assert!(is_same_point_with(&a, &Position::new(0.0, 1.0), 1e-12));
        assert!(is_same_point_with(&b, &Position::new(0.0, 2.0), 1e-12));
    }

    #[test]
    fn arc_under_similarity() {
        let arc: GeometryLine = Arc::new(Position::new(1.0, 1.0), 2.0, AngleRange::new(10.0, 130.0, false)).into();
        let matrix = Matrix3::new(0.0, 2.0, 1.0, -2.0, 0.0, 3.0, 0.0, 0.0, 1.0);
        let mut lines = vec![arc.clone()];
        GeneralTransform::new(matrix).execute(&mut lines).unwrap();
        assert!(matches!(lines[0], GeometryLine::Arc(_)));
        assert_maps(&matrix, &arc, &lines[0]);
    }

    #[test]
    fn mirrored_arc_turns_the_other_way() {
        let arc: GeometryLine = Arc::new(Position::origin(), 1.0, AngleRange::new(0.0, 90.0, false)).into();
        let matrix = Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let mut lines = vec![arc.clone()];
        GeneralTransform::new(matrix).execute(&mut lines).unwrap();
        let GeometryLine::Arc(mirrored) = &lines[0] else {
            panic!("mirrored arcs stay arcs");
        };
        assert!(mirrored.counterclockwise);
        assert_maps(&matrix, &arc, &lines[0]);
    }

    #[test]
    fn arc_becomes_ellipse_arc() {
        let arc: GeometryLine = Arc::new(Position::new(1.0, -1.0), 1.5, AngleRange::new(200.0, 20.0, true)).into();
        for matrix in [Matrix3::new_nonuniform_scaling(&Vector::new(2.0, 0.5)), skew_mirror()] {
            let mut lines = vec![arc.clone()];
            GeneralTransform::new(matrix).execute(&mut lines).unwrap();
            assert!(matches!(lines[0], GeometryLine::EllipseArc(_)));
            assert_maps(&matrix, &arc, &lines[0]);
        }
    }

    #[test]
    fn ellipse_arc_keeps_its_params() {
        let arc: GeometryLine = EllipseArc::new(
            Ellipse::new(Position::new(-1.0, 2.0), 3.0, 1.0, 25.0),
            AngleRange::new(-40.0, 250.0, false),
        )
        .into();
        let mut lines = vec![arc.clone()];
        GeneralTransform::new(skew_mirror()).execute(&mut lines).unwrap();
        assert_maps(&skew_mirror(), &arc, &lines[0]);
    }

    #[test]
    fn control_points_and_rays() {
        let curve: GeometryLine = BezierCurve::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 2.0),
            Position::new(3.0, -1.0),
            Position::new(4.0, 0.0),
        )
        .into();
        let nurbs: GeometryLine = Nurbs::new(
            vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0), Position::new(2.0, 0.0), Position::new(3.0, 1.0)],
            2,
        )
        .into();
        let ray: GeometryLine = Ray::new(Position::new(1.0, 1.0), 30.0).into();
        let mut lines = vec![curve.clone(), nurbs.clone(), ray];
        GeneralTransform::new(skew_mirror()).execute(&mut lines).unwrap();
        assert_maps(&skew_mirror(), &curve, &lines[0]);
        assert_maps(&skew_mirror(), &nurbs, &lines[1]);
        let GeometryLine::Ray(mapped) = &lines[2] else {
            panic!("rays stay rays");
        };
        let along = Position::new(1.0, 1.0) + Ray::new(Position::origin(), 30.0).direction() * 5.0;
        let expected = skew_mirror().transform_point(&along);
        let found = mapped.origin + mapped.direction() * (expected - mapped.origin).norm();
        assert!(is_same_point_with(&found, &expected, 1e-9));
    }

    #[test]
    fn hyperbola_segment() {
        let segment = HyperbolaSegment::new(Hyperbola::new(Position::new(1.0, 0.0), 2.0, 1.0, 30.0), -1.5, 2.0);
        let line: GeometryLine = segment.into();
        let mut lines = vec![line.clone()];
        GeneralTransform::new(skew_mirror()).execute(&mut lines).unwrap();
        let GeometryLine::HyperbolaSegment(mapped) = &lines[0] else {
            panic!("hyperbolas stay hyperbolas");
        };
        for t in [0.0, 1.0] {
            let expected = skew_mirror().transform_point(&line.point_at_param(t));
            assert!(is_same_point_with(&mapped.point_at_param(t), &expected, 1e-9));
        }
        for t in [0.25, 0.5, 0.75] {
            let p = skew_mirror().transform_point(&line.point_at_param(t));
            assert!(point_is_on_hyperbola_segment(&p, mapped, 1e-9));
        }
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let mut lines = vec![GeometryLine::Segment([Position::origin(), Position::new(1.0, 0.0)])];
        let matrix = Matrix3::new_nonuniform_scaling(&Vector::new(1.0, 0.0));
        assert!(GeneralTransform::new(matrix).execute(&mut lines).is_err());
    }
}
