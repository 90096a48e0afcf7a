use super::Position;

/// Axis-aligned bounding region given by its minimum (`start`) and maximum (`end`) corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPointsFormRegion {
    pub start: Position,
    pub end: Position,
}

impl TwoPointsFormRegion {
    /// Creates a region from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            start: Position::new(a.x.min(b.x), a.y.min(b.y)),
            end: Position::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.end.x - self.start.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.end.y - self.start.y
    }

    #[must_use]
    pub fn center(&self) -> Position {
        nalgebra::center(&self.start, &self.end)
    }

    /// Whether `point` lies inside the region, expanded by `margin` on every side.
    #[must_use]
    pub fn contains(&self, point: &Position, margin: f64) -> bool {
        point.x >= self.start.x - margin
            && point.x <= self.end.x + margin
            && point.y >= self.start.y - margin
            && point.y <= self.end.y + margin
    }

    /// Whether two regions overlap, expanded by `margin`.
    #[must_use]
    pub fn intersects(&self, other: &Self, margin: f64) -> bool {
        self.start.x <= other.end.x + margin
            && other.start.x <= self.end.x + margin
            && self.start.y <= other.end.y + margin
            && other.start.y <= self.end.y + margin
    }
}

/// Bounding region of a point set. `None` for an empty slice.
#[must_use]
pub fn get_points_bounding(points: &[Position]) -> Option<TwoPointsFormRegion> {
    let first = points.first()?;
    let mut start = *first;
    let mut end = *first;
    for p in &points[1..] {
        start.x = start.x.min(p.x);
        start.y = start.y.min(p.y);
        end.x = end.x.max(p.x);
        end.y = end.y.max(p.y);
    }
    Some(TwoPointsFormRegion { start, end })
}

/// Smallest region containing every input region.
#[must_use]
pub fn merge_boundings(regions: &[TwoPointsFormRegion]) -> Option<TwoPointsFormRegion> {
    let points: Vec<Position> = regions.iter().flat_map(|r| [r.start, r.end]).collect();
    get_points_bounding(&points)
}
