pub mod angle;
pub mod conic;
pub mod curve;
pub mod geometry_line;
pub mod position;

pub use angle::AngleRange;
pub use conic::Conic;
pub use curve::{
    Arc, BezierCurve, Circle, Derivatives, Ellipse, EllipseArc, GeneralFormLine, Hyperbola,
    HyperbolaSegment, Nurbs, Parabola, ParabolaSegment, QuadraticCurve, Ray,
};
pub use geometry_line::{ExtendType, GeometryLine};
