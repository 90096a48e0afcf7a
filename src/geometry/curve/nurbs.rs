use nalgebra::{DMatrix, DVector, Vector3};

use crate::error::{GeometryError, NumericError, Result};
use crate::geometry::position::get_two_points_distance;
use crate::math::{get_points_bounding, is_same_number, Position, TwoPointsFormRegion, Vector};

use super::{get_nearest_param, Derivatives};

/// Non-uniform rational B-spline.
///
/// `knots` defaults to clamped uniform knots on `[0, 1]` and `weights` to all
/// ones. The `[0, 1]` param is mapped linearly onto the knot domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Nurbs {
    pub points: Vec<Position>,
    pub degree: usize,
    pub knots: Option<Vec<f64>>,
    pub weights: Option<Vec<f64>>,
}

impl Nurbs {
    /// Non-rational B-spline with default knots.
    #[must_use]
    pub fn new(points: Vec<Position>, degree: usize) -> Self {
        Self {
            points,
            degree,
            knots: None,
            weights: None,
        }
    }

    /// Checks the structural invariants.
    ///
    /// # Errors
    ///
    /// - `GeometryError::ParameterOutOfRange` when the degree is not in
    ///   `[1, points - 1]`
    /// - `GeometryError::InvalidNurbs` when the knot vector has the wrong
    ///   length or decreases, or a weight is missing or non-positive
    pub fn validate(&self) -> Result<()> {
        let n = self.points.len();
        if self.degree == 0 || n <= self.degree {
            #[allow(clippy::cast_precision_loss)]
            let (value, max) = (self.degree as f64, n as f64 - 1.0);
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "degree",
                value,
                min: 1.0,
                max,
            }
            .into());
        }
        if let Some(knots) = &self.knots {
            if knots.len() != n + self.degree + 1 {
                return Err(GeometryError::InvalidNurbs(format!(
                    "expected {} knots, got {}",
                    n + self.degree + 1,
                    knots.len()
                ))
                .into());
            }
            if knots.windows(2).any(|w| w[1] < w[0]) {
                return Err(GeometryError::InvalidNurbs("knots must not decrease".into()).into());
            }
            if knots[self.degree] >= knots[n] {
                return Err(GeometryError::InvalidNurbs("empty knot domain".into()).into());
            }
        }
        if let Some(weights) = &self.weights {
            if weights.len() != n {
                return Err(GeometryError::InvalidNurbs(format!(
                    "expected {n} weights, got {}",
                    weights.len()
                ))
                .into());
            }
            if weights.iter().any(|w| *w <= 0.0) {
                return Err(GeometryError::InvalidNurbs("weights must be positive".into()).into());
            }
        }
        Ok(())
    }

    /// The explicit knot vector or the default clamped uniform one.
    #[must_use]
    pub fn knot_vector(&self) -> Vec<f64> {
        self.knots
            .clone()
            .unwrap_or_else(|| get_default_nurbs_knots(self.points.len(), self.degree))
    }

    #[must_use]
    pub fn weight_vector(&self) -> Vec<f64> {
        self.weights
            .clone()
            .unwrap_or_else(|| vec![1.0; self.points.len()])
    }

    /// Knot values at the ends of the curve.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        let knots = self.knot_vector();
        let n = self.points.len();
        match (knots.get(self.degree), knots.get(n)) {
            (Some(a), Some(b)) => (*a, *b),
            _ => (0.0, 1.0),
        }
    }

    fn knot_at_param(&self, param: f64) -> f64 {
        let (a, b) = self.domain();
        a + (b - a) * param
    }

    /// Inverse of the param-to-knot mapping.
    #[must_use]
    pub fn param_at_knot(&self, u: f64) -> f64 {
        let (a, b) = self.domain();
        if a == b {
            0.0
        } else {
            (u - a) / (b - a)
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Position {
        self.point_at_param(0.0)
    }

    #[must_use]
    pub fn end_point(&self) -> Position {
        self.point_at_param(1.0)
    }

    #[must_use]
    pub fn point_at_param(&self, param: f64) -> Position {
        self.derivatives_at_param(param).point
    }

    /// Rational derivatives with respect to the `[0, 1]` param.
    #[must_use]
    pub fn derivatives_at_param(&self, param: f64) -> Derivatives {
        let knots = self.knot_vector();
        let weights = self.weight_vector();
        let p = self.degree;
        let u = self.knot_at_param(param);
        let (a, b) = self.domain();
        let Some(span) = find_span(self.points.len(), p, u, &knots) else {
            let point = self.points.first().copied().unwrap_or_else(Position::origin);
            return Derivatives {
                point,
                first: Vector::zeros(),
                second: Vector::zeros(),
            };
        };
        let ders = basis_function_derivatives(span, u, p, 2, &knots);
        // homogeneous derivatives (w·x, w·y, w)
        let mut homogeneous = [Vector3::zeros(); 3];
        for (k, row) in ders.iter().enumerate() {
            for (j, n) in row.iter().enumerate() {
                let i = span - p + j;
                let w = weights[i];
                homogeneous[k] += Vector3::new(self.points[i].x * w, self.points[i].y * w, w) * *n;
            }
        }
        let [a0, a1, a2] = homogeneous;
        let w0 = a0.z;
        let c0 = Vector::new(a0.x, a0.y) / w0;
        let c1 = (Vector::new(a1.x, a1.y) - c0 * a1.z) / w0;
        let c2 = (Vector::new(a2.x, a2.y) - c1 * (2.0 * a1.z) - c0 * a2.z) / w0;
        let scale = b - a;
        Derivatives {
            point: Position::from(c0),
            first: c1 * scale,
            second: c2 * (scale * scale),
        }
    }

    /// Param of the curve point nearest to `point`.
    #[must_use]
    pub fn param_at_point(&self, point: &Position) -> f64 {
        get_nearest_param(|t| self.derivatives_at_param(t), point, 16 * self.points.len())
    }

    /// Bounding region of a dense sample of the curve.
    #[must_use]
    pub fn bounding(&self) -> TwoPointsFormRegion {
        let count = 32 * self.points.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        let points: Vec<Position> = (0..=count)
            .map(|i| self.point_at_param(i as f64 / count as f64))
            .collect();
        get_points_bounding(&points)
            .unwrap_or_else(|| TwoPointsFormRegion::new(Position::origin(), Position::origin()))
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        let knots = self.knots.as_ref().map(|knots| {
            let (first, last) = (knots.first().copied(), knots.last().copied());
            let sum = first.unwrap_or(0.0) + last.unwrap_or(0.0);
            knots.iter().rev().map(|k| sum - k).collect()
        });
        let weights = self.weights.as_ref().map(|w| w.iter().rev().copied().collect());
        Self {
            points,
            degree: self.degree,
            knots,
            weights,
        }
    }

    /// Inserts knot value `u` once, keeping the curve unchanged.
    #[must_use]
    pub fn insert_knot(&self, u: f64) -> Self {
        let knots = self.knot_vector();
        let weights = self.weight_vector();
        let p = self.degree;
        let n = self.points.len();
        let Some(k) = find_span(n, p, u, &knots) else {
            return self.clone();
        };
        let homogeneous: Vec<Vector3<f64>> = self
            .points
            .iter()
            .zip(&weights)
            .map(|(pt, w)| Vector3::new(pt.x * w, pt.y * w, *w))
            .collect();
        let mut inserted = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let q = if i + p <= k {
                homogeneous[i]
            } else if i > k {
                homogeneous[i - 1]
            } else {
                let denominator = knots[i + p] - knots[i];
                let alpha = if denominator == 0.0 {
                    0.0
                } else {
                    (u - knots[i]) / denominator
                };
                homogeneous[i] * alpha + homogeneous[i - 1] * (1.0 - alpha)
            };
            inserted.push(q);
        }
        let mut new_knots = knots.clone();
        new_knots.insert(k + 1, u);
        let points = inserted
            .iter()
            .map(|h| Position::new(h.x / h.z, h.y / h.z))
            .collect();
        let weights = self
            .weights
            .as_ref()
            .map(|_| inserted.iter().map(|h| h.z).collect());
        Self {
            points,
            degree: p,
            knots: Some(new_knots),
            weights,
        }
    }

    /// Sub-curve between two params; `from > to` reverses it.
    #[must_use]
    pub fn part(&self, from: f64, to: f64) -> Self {
        if from > to {
            return self.part(to, from).reversed();
        }
        let from = from.clamp(0.0, 1.0);
        let to = to.clamp(0.0, 1.0);
        let p = self.degree;
        let u1 = self.knot_at_param(from);
        let u2 = self.knot_at_param(to);
        if is_same_number(u1, u2) {
            let point = self.point_at_param(from);
            return Self::new(vec![point; p + 1], p);
        }
        let mut curve = self.clone();
        for u in [u1, u2] {
            while multiplicity(&curve.knot_vector(), u) < p {
                curve = curve.insert_knot(u);
            }
        }
        let knots = curve.knot_vector();
        let weights = curve.weight_vector();
        let last_u1 = knots.iter().rposition(|k| is_same_number(*k, u1)).unwrap_or(p);
        let first_u2 = knots
            .iter()
            .position(|k| is_same_number(*k, u2))
            .unwrap_or(knots.len() - p - 1);
        let start = last_u1.saturating_sub(p);
        let end = first_u2.saturating_sub(1).max(start);
        let points = curve.points[start..=end].to_vec();
        let mut new_knots = vec![u1; p + 1];
        new_knots.extend_from_slice(&knots[last_u1 + 1..first_u2]);
        new_knots.extend(std::iter::repeat(u2).take(p + 1));
        let normalized = new_knots.iter().map(|k| (k - u1) / (u2 - u1)).collect();
        Self {
            points,
            degree: p,
            knots: Some(normalized),
            weights: self
                .weights
                .as_ref()
                .map(|_| weights[start..=end].to_vec()),
        }
    }
}

/// Clamped uniform knots on `[0, 1]`.
#[must_use]
pub fn get_default_nurbs_knots(point_count: usize, degree: usize) -> Vec<f64> {
    let interior = point_count.saturating_sub(degree + 1);
    let mut knots = vec![0.0; degree + 1];
    #[allow(clippy::cast_precision_loss)]
    for i in 1..=interior {
        knots.push(i as f64 / (interior + 1) as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

fn multiplicity(knots: &[f64], u: f64) -> usize {
    knots.iter().filter(|k| is_same_number(**k, u)).count()
}

/// Knot span index `i` with `U[i] <= u < U[i+1]`, clamped to the domain.
fn find_span(point_count: usize, degree: usize, u: f64, knots: &[f64]) -> Option<usize> {
    if point_count <= degree || knots.len() != point_count + degree + 1 {
        return None;
    }
    let n = point_count - 1;
    if u >= knots[n + 1] {
        let mut span = n;
        while span > degree && knots[span] >= knots[n + 1] {
            span -= 1;
        }
        return Some(span);
    }
    if u <= knots[degree] {
        let mut span = degree;
        while span < n && knots[span + 1] <= knots[degree] {
            span += 1;
        }
        return Some(span);
    }
    let (mut low, mut high) = (degree, n + 1);
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    Some(mid)
}

/// Non-zero basis functions and their derivatives up to order `count` at `u`.
///
/// Row `k` holds the `k`-th derivatives of `N[span-p..=span]`.
fn basis_function_derivatives(
    span: usize,
    u: f64,
    p: usize,
    count: usize,
    knots: &[f64],
) -> Vec<Vec<f64>> {
    let mut ndu = vec![vec![0.0; p + 1]; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    ndu[0][0] = 1.0;
    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }
    let mut ders = vec![vec![0.0; p + 1]; count + 1];
    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }
    let top = count.min(p);
    let mut a = vec![vec![0.0; p + 1]; 2];
    for r in 0..=p {
        let (mut s1, mut s2) = (0, 1);
        a[0][0] = 1.0;
        for k in 1..=top {
            let mut d = 0.0;
            let rk = r.checked_sub(k);
            let pk = p - k;
            if let Some(rk) = rk {
                a[s2][0] = a[s1][0] / ndu[pk + 1][rk];
                d = a[s2][0] * ndu[rk][pk];
            }
            let j1 = if rk.is_some() || r + 1 == k { 1 } else { k - r };
            let j2 = if r <= pk + 1 { k - 1 } else { p - r };
            for j in j1..=j2 {
                let index = r + j - k;
                a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][index];
                d += a[s2][j] * ndu[index][pk];
            }
            if r <= pk {
                a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                d += a[s2][k] * ndu[r][pk];
            }
            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }
    #[allow(clippy::cast_precision_loss)]
    {
        let mut factor = p as f64;
        for (k, row) in ders.iter_mut().enumerate().take(top + 1).skip(1) {
            for value in row.iter_mut() {
                *value *= factor;
            }
            factor *= (p - k) as f64;
        }
    }
    ders
}

/// B-spline of `degree` passing through every point (global interpolation
/// with chord-length params and averaged knots).
///
/// # Errors
///
/// - `GeometryError::InvalidNurbs` for fewer than two points
/// - `NumericError::InvalidInput` when the collocation matrix is singular
pub fn interpolate_nurbs(points: &[Position], degree: usize) -> Result<Nurbs> {
    if points.len() < 2 {
        return Err(GeometryError::InvalidNurbs("interpolation needs two points".into()).into());
    }
    let n = points.len() - 1;
    let p = degree.clamp(1, n);
    let lengths: Vec<f64> = points
        .windows(2)
        .map(|w| get_two_points_distance(&w[0], &w[1]))
        .collect();
    let total: f64 = lengths.iter().sum();
    let mut params = Vec::with_capacity(n + 1);
    params.push(0.0);
    let mut acc = 0.0;
    for (i, l) in lengths.iter().enumerate() {
        acc += l;
        #[allow(clippy::cast_precision_loss)]
        let fallback = (i + 1) as f64 / n as f64;
        params.push(if total > 0.0 { acc / total } else { fallback });
    }
    let mut knots = vec![0.0; p + 1];
    #[allow(clippy::cast_precision_loss)]
    for j in 1..=(n - p) {
        knots.push(params[j..j + p].iter().sum::<f64>() / p as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(p + 1));

    let mut matrix = DMatrix::<f64>::zeros(n + 1, n + 1);
    for (row, u) in params.iter().enumerate() {
        let Some(span) = find_span(n + 1, p, *u, &knots) else {
            return Err(NumericError::InvalidInput("invalid interpolation knots".into()).into());
        };
        let basis = basis_function_derivatives(span, *u, p, 0, &knots);
        for (j, value) in basis[0].iter().enumerate() {
            matrix[(row, span - p + j)] = *value;
        }
    }
    let lu = matrix.lu();
    let xs = DVector::from_iterator(n + 1, points.iter().map(|p| p.x));
    let ys = DVector::from_iterator(n + 1, points.iter().map(|p| p.y));
    let (Some(cx), Some(cy)) = (lu.solve(&xs), lu.solve(&ys)) else {
        return Err(NumericError::InvalidInput("singular interpolation matrix".into()).into());
    };
    Ok(Nurbs {
        points: cx.iter().zip(cy.iter()).map(|(x, y)| Position::new(*x, *y)).collect(),
        degree: p,
        knots: Some(knots),
        weights: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::PlangeoError;
    use crate::geometry::curve::bezier::BezierCurve;
    use crate::geometry::position::{is_same_point, is_same_point_with};
    use crate::math::DELTA2;

    fn cubic_points() -> Vec<Position> {
        vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 3.0),
            Position::new(3.0, -2.0),
            Position::new(4.0, 1.0),
        ]
    }

    fn spline() -> Nurbs {
        Nurbs::new(
            vec![
                Position::new(0.0, 0.0),
                Position::new(1.0, 2.0),
                Position::new(3.0, 2.0),
                Position::new(4.0, 0.0),
                Position::new(6.0, 1.0),
                Position::new(7.0, 3.0),
            ],
            3,
        )
    }

    #[test]
    fn default_knots_are_clamped_uniform() {
        assert_eq!(get_default_nurbs_knots(4, 3), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            get_default_nurbs_knots(5, 2),
            vec![0.0, 0.0, 0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn validation() {
        assert!(spline().validate().is_ok());
        let mut bad = spline();
        bad.knots = Some(vec![0.0, 1.0]);
        assert!(bad.validate().is_err());
        let mut bad = spline();
        bad.weights = Some(vec![1.0, 1.0, 0.0, 1.0, 1.0, 1.0]);
        assert!(bad.validate().is_err());
        assert!(Nurbs::new(vec![Position::new(0.0, 0.0)], 1).validate().is_err());
    }

    #[test]
    fn degree_must_fit_the_points() {
        match Nurbs::new(cubic_points(), 4).validate() {
            Err(PlangeoError::Geometry(GeometryError::ParameterOutOfRange {
                parameter,
                value,
                min,
                max,
            })) => {
                assert_eq!(parameter, "degree");
                assert_abs_diff_eq!(value, 4.0);
                assert_abs_diff_eq!(min, 1.0);
                assert_abs_diff_eq!(max, 3.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            Nurbs::new(cubic_points(), 0).validate(),
            Err(PlangeoError::Geometry(GeometryError::ParameterOutOfRange { .. }))
        ));
    }

    #[test]
    fn single_segment_matches_bezier() {
        let nurbs = Nurbs::new(cubic_points(), 3);
        let p = cubic_points();
        let bezier = BezierCurve::new(p[0], p[1], p[2], p[3]);
        for &t in &[0.0, 0.3, 0.5, 1.0] {
            let a = nurbs.derivatives_at_param(t);
            let b = bezier.derivatives_at_param(t);
            assert!(is_same_point(&a.point, &b.point));
            assert_abs_diff_eq!(a.first.x, b.first.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.first.y, b.first.y, epsilon = 1e-9);
            assert_abs_diff_eq!(a.second.x, b.second.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.second.y, b.second.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn rational_quarter_circle() {
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let nurbs = Nurbs {
            points: vec![
                Position::new(1.0, 0.0),
                Position::new(1.0, 1.0),
                Position::new(0.0, 1.0),
            ],
            degree: 2,
            knots: None,
            weights: Some(vec![1.0, w, 1.0]),
        };
        for &t in &[0.1, 0.5, 0.9] {
            let d = nurbs.derivatives_at_param(t);
            assert_abs_diff_eq!(d.point.coords.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(d.curvature(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn knot_insertion_keeps_shape() {
        let s = spline();
        let inserted = s.insert_knot(0.4).insert_knot(0.4);
        assert!(inserted.validate().is_ok());
        assert_eq!(inserted.points.len(), s.points.len() + 2);
        for &t in &[0.0, 0.2, 0.4, 0.65, 1.0] {
            assert!(is_same_point_with(&inserted.point_at_param(t), &s.point_at_param(t), 1e-9));
        }
    }

    #[test]
    fn part_extraction() {
        let s = spline();
        let part = s.part(0.2, 0.7);
        assert!(part.validate().is_ok());
        for &t in &[0.0, 0.25, 0.5, 1.0] {
            let expected = s.point_at_param(0.2 + 0.5 * t);
            assert!(is_same_point_with(&part.point_at_param(t), &expected, 1e-9));
        }
        let backwards = s.part(0.7, 0.2);
        assert!(is_same_point_with(&backwards.start_point(), &s.point_at_param(0.7), 1e-9));
        assert!(is_same_point_with(&backwards.end_point(), &s.point_at_param(0.2), 1e-9));
    }

    #[test]
    fn reverse_and_param_round_trip() {
        let s = spline();
        let r = s.reversed();
        assert!(is_same_point(&r.point_at_param(0.3), &s.point_at_param(0.7)));
        assert_eq!(r.reversed(), s);
        for &t in &[0.0, 0.33, 0.8, 1.0] {
            assert_abs_diff_eq!(s.param_at_point(&s.point_at_param(t)), t, epsilon = DELTA2);
        }
    }

    #[test]
    fn interpolation_passes_through_points() {
        let points = vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(2.0, 0.5),
            Position::new(3.0, 2.0),
            Position::new(5.0, 1.0),
        ];
        let curve = interpolate_nurbs(&points, 3).unwrap();
        assert!(curve.validate().is_ok());
        let sampled: Vec<Position> = (0..=200).map(|i| curve.point_at_param(f64::from(i) / 200.0)).collect();
        for p in &points {
            let nearest = sampled
                .iter()
                .map(|q| get_two_points_distance(p, q))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest < 0.05);
        }
        assert!(is_same_point_with(&curve.start_point(), &points[0], 1e-9));
        assert!(is_same_point_with(&curve.end_point(), &points[4], 1e-9));
        assert!(interpolate_nurbs(&points[..1], 3).is_err());
    }
}
