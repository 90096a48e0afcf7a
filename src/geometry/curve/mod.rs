pub mod arc;
pub mod bezier;
pub mod circle;
pub mod ellipse;
pub mod hyperbola;
pub mod line;
pub mod nurbs;
pub mod parabola;
pub mod ray;

pub use arc::Arc;
pub use bezier::{BezierCurve, QuadraticCurve};
pub use circle::Circle;
pub use ellipse::{Ellipse, EllipseArc};
pub use hyperbola::{Hyperbola, HyperbolaSegment};
pub use line::GeneralFormLine;
pub use nurbs::Nurbs;
pub use parabola::{Parabola, ParabolaSegment};
pub use ray::Ray;

use crate::math::{cross, newton_iterate, NewtonOptions, Position, Vector, DELTA1};

/// Position with its first and second derivative at one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivatives {
    pub point: Position,
    pub first: Vector,
    pub second: Vector,
}

impl Derivatives {
    /// Signed curvature `(x'y'' - y'x'') / (x'² + y'²)^1.5`.
    ///
    /// Zero where the first derivative vanishes.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        let speed2 = self.first.norm_squared();
        if speed2 == 0.0 {
            return 0.0;
        }
        cross(&self.first, &self.second) / speed2.powf(1.5)
    }

    /// Direction of travel in radians.
    ///
    /// Falls back to the second derivative at cusps, where a curve with a
    /// doubled control point still has a well-defined tangent.
    #[must_use]
    pub fn tangent_radian(&self) -> f64 {
        let v = if self.first.norm_squared() == 0.0 {
            self.second
        } else {
            self.first
        };
        v.y.atan2(v.x)
    }
}

/// Param in `[0, 1]` of the curve point nearest to `point`.
///
/// Seeds from `samples` evenly spaced params and refines with Newton on
/// `(C(t) - p)·C'(t) = 0`. The sample wins when the refinement wanders off.
#[must_use]
pub fn get_nearest_param<F>(derivatives: F, point: &Position, samples: usize) -> f64
where
    F: Fn(f64) -> Derivatives,
{
    let samples = samples.max(2);
    #[allow(clippy::cast_precision_loss)]
    let step = 1.0 / samples as f64;
    let mut best = (0.0, f64::INFINITY);
    for i in 0..=samples {
        #[allow(clippy::cast_precision_loss)]
        let t = step * i as f64;
        let distance = (derivatives(t).point - point).norm_squared();
        if distance < best.1 {
            best = (t, distance);
        }
    }
    let refined = newton_iterate(
        best.0,
        |t| {
            let d = derivatives(t);
            (d.point - point).dot(&d.first)
        },
        |t| {
            let d = derivatives(t);
            d.first.norm_squared() + (d.point - point).dot(&d.second)
        },
        NewtonOptions::with_delta(DELTA1),
    );
    match refined {
        Ok(t) if (0.0..=1.0).contains(&t)
            && (derivatives(t).point - point).norm_squared() <= best.1 =>
        {
            t
        }
        _ => best.0,
    }
}
