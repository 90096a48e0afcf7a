use crate::geometry::conic::Conic;
use crate::geometry::position::{get_two_points_distance, is_same_point_with};
use crate::math::{is_same_number_with, is_zero_with, Position, TwoPointsFormRegion, DELTA2};

/// A full circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Position,
    pub r: f64,
}

impl Circle {
    #[must_use]
    pub fn new(center: Position, r: f64) -> Self {
        Self { center, r }
    }

    /// Point at `angle` degrees.
    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Position {
        self.point_at_radian(angle.to_radians())
    }

    #[must_use]
    pub fn point_at_radian(&self, radian: f64) -> Position {
        let (sin, cos) = radian.sin_cos();
        Position::new(self.center.x + self.r * cos, self.center.y + self.r * sin)
    }

    /// Polar angle of `point` around the center, in degrees.
    #[must_use]
    pub fn angle_of_point(&self, point: &Position) -> f64 {
        self.radian_of_point(point).to_degrees()
    }

    #[must_use]
    pub fn radian_of_point(&self, point: &Position) -> f64 {
        (point.y - self.center.y).atan2(point.x - self.center.x)
    }

    /// `(x - cx)² + (y - cy)² - r² = 0`.
    #[must_use]
    pub fn to_conic(&self) -> Conic {
        let c = self.center;
        Conic::new(
            1.0,
            0.0,
            1.0,
            -2.0 * c.x,
            -2.0 * c.y,
            c.x * c.x + c.y * c.y - self.r * self.r,
        )
    }

    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        TwoPointsFormRegion::new(
            Position::new(self.center.x - self.r, self.center.y - self.r),
            Position::new(self.center.x + self.r, self.center.y + self.r),
        )
    }
}

/// Whether `point` lies on `circle` within `delta`.
#[must_use]
pub fn point_is_on_circle(point: &Position, circle: &Circle, delta: f64) -> bool {
    is_zero_with(get_two_points_distance(point, &circle.center) - circle.r, delta)
}

/// The circle through three points, or `None` when they are collinear.
#[must_use]
pub fn get_three_points_circle(p1: &Position, p2: &Position, p3: &Position) -> Option<Circle> {
    let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));
    let scale = (p2 - p1).norm() * (p3 - p1).norm();
    if scale == 0.0 || is_zero_with(d / scale, 1e-10) {
        return None;
    }
    let s1 = p1.x * p1.x + p1.y * p1.y;
    let s2 = p2.x * p2.x + p2.y * p2.y;
    let s3 = p3.x * p3.x + p3.y * p3.y;
    let center = Position::new(
        (s1 * (p2.y - p3.y) + s2 * (p3.y - p1.y) + s3 * (p1.y - p2.y)) / d,
        (s1 * (p3.x - p2.x) + s2 * (p1.x - p3.x) + s3 * (p2.x - p1.x)) / d,
    );
    Some(Circle::new(center, get_two_points_distance(&center, p1)))
}

/// Same center and radius within [`DELTA2`].
#[must_use]
pub fn is_same_circle(a: &Circle, b: &Circle) -> bool {
    is_same_point_with(&a.center, &b.center, DELTA2) && is_same_number_with(a.r, b.r, DELTA2)
}

/// Concentric circles at `distance`: the grown one first, then the shrunk one
/// when its radius stays positive.
#[must_use]
pub fn get_parallel_circles_by_distance(circle: &Circle, distance: f64) -> Vec<Circle> {
    let distance = distance.abs();
    let mut result = vec![Circle::new(circle.center, circle.r + distance)];
    if circle.r - distance > 0.0 {
        result.push(Circle::new(circle.center, circle.r - distance));
    }
    result
}
