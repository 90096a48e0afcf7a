pub mod boolean;
pub mod intersect;
pub mod length;
pub mod offset;
pub mod perpendicular;
pub mod split;
pub mod tangency;
pub mod tangent_circle;
pub mod transform;
