use nalgebra::Matrix2;
use tracing::trace;

use crate::geometry::conic::Conic;
use crate::geometry::GeometryLine;
use crate::math::{
    cross, is_between_with, newton_iterate, newton_iterate2, NewtonOptions, Position,
    TwoPointsFormRegion, Vector, DELTA1, DELTA2,
};

/// Sample count used to bracket roots on a curve without a closed form.
pub(crate) fn get_sample_count(line: &GeometryLine) -> usize {
    match line {
        GeometryLine::Nurbs(nurbs) => (16 * nurbs.points.len()).max(64),
        _ => 64,
    }
}

#[allow(clippy::cast_precision_loss)]
fn sample_params(count: usize) -> impl Iterator<Item = f64> {
    (0..=count).map(move |i| i as f64 / count as f64)
}

const GOLDEN_SECTION_STEPS: usize = 80;

/// Param in `[a, b]` minimising a unimodal `f`.
fn get_minimum_param<F>(f: F, mut a: f64, mut b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - ratio * (b - a);
    let mut d = a + ratio * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));
    for _ in 0..GOLDEN_SECTION_STEPS {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - ratio * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + ratio * (b - a);
            fd = f(d);
        }
    }
    (a + b) / 2.0
}

/// Roots of `f` on `[0, 1]` bracketed by `count` samples.
///
/// A sign change between two samples is refined with Newton from its secant
/// estimate. A sample closer to zero than both neighbours, all three of one
/// sign, may hide a touching root: the minimum of `|f|` between the
/// neighbours is searched and kept when `is_root` accepts it.
pub(crate) fn get_sampled_roots<F, D, R>(f: F, f1: D, count: usize, is_root: R) -> Vec<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
    R: Fn(f64) -> bool,
{
    let values: Vec<(f64, f64)> = sample_params(count.max(2)).map(|t| (t, f(t))).collect();
    let mut roots = Vec::new();
    for (i, &(t, value)) in values.iter().enumerate() {
        if value == 0.0 {
            roots.push(t);
            continue;
        }
        if let Some(&(next_t, next_value)) = values.get(i + 1) {
            if value * next_value < 0.0 {
                let seed = t + (next_t - t) * value / (value - next_value);
                let root = match newton_iterate(seed, &f, &f1, NewtonOptions::with_delta(DELTA1)) {
                    Ok(s) if is_between_with(s, t, next_t, DELTA1) => s,
                    _ => {
                        trace!(seed, "root kept at the secant estimate");
                        seed
                    }
                };
                roots.push(root);
                continue;
            }
        }
        let (Some(&(prev_t, prev_value)), Some(&(next_t, next_value))) =
            (i.checked_sub(1).and_then(|j| values.get(j)), values.get(i + 1))
        else {
            continue;
        };
        let dips = value.abs() < prev_value.abs()
            && value.abs() <= next_value.abs()
            && prev_value * value > 0.0
            && value * next_value > 0.0;
        if !dips {
            continue;
        }
        let touch = get_minimum_param(|s| f(s).abs(), prev_t, next_t);
        if is_root(touch) {
            trace!(touch, "touching root between samples");
            roots.push(touch);
        }
    }
    roots
}

/// Points of `curve` on an implicit conic.
///
/// Roots of `conic(C(t))` along the sampled `[0, 1]` body of the curve. A
/// touching root counts once the conic's first-order distance
/// `|conic| / |∇conic|` there is within `DELTA2`.
pub(crate) fn get_implicit_curve_points(conic: &Conic, curve: &GeometryLine) -> Vec<Position> {
    let value = |s: f64| conic.evaluate(&curve.point_at_param(s));
    let slope = |s: f64| {
        let d = curve.derivatives_at_param(s);
        conic.gradient(&d.point).dot(&d.first)
    };
    let is_on_conic = |s: f64| {
        let p = curve.point_at_param(s);
        conic.evaluate(&p).abs() <= DELTA2 * conic.gradient(&p).norm()
    };
    get_sampled_roots(value, slope, get_sample_count(curve), is_on_conic)
        .into_iter()
        .map(|t| curve.point_at_param(t))
        .collect()
}

struct Chord {
    start: (f64, Position),
    end: (f64, Position),
    bounding: TwoPointsFormRegion,
}

fn get_chords(line: &GeometryLine) -> Vec<Chord> {
    let samples: Vec<(f64, Position)> = sample_params(get_sample_count(line))
        .map(|t| (t, line.point_at_param(t)))
        .collect();
    samples
        .windows(2)
        .map(|w| Chord {
            start: w[0],
            end: w[1],
            bounding: TwoPointsFormRegion::new(w[0].1, w[1].1),
        })
        .collect()
}

/// Crossing of two chords as fractions along each.
fn get_chords_crossing(a: &Chord, b: &Chord) -> Option<(f64, f64)> {
    let da = a.end.1 - a.start.1;
    let db = b.end.1 - b.start.1;
    let denominator = cross(&da, &db);
    if denominator == 0.0 {
        return None;
    }
    let offset = b.start.1 - a.start.1;
    let s = cross(&offset, &db) / denominator;
    let u = cross(&offset, &da) / denominator;
    let margin = 1e-9;
    (is_between_with(s, 0.0, 1.0, margin) && is_between_with(u, 0.0, 1.0, margin)).then_some((s, u))
}

/// Curve-curve intersection for pieces without an algebraic path: polyline
/// crossings refined with two-dimensional Newton.
pub(crate) fn get_curve_curve_points(a: &GeometryLine, b: &GeometryLine) -> Vec<Position> {
    let chords_a = get_chords(a);
    let chords_b = get_chords(b);
    let mut points = Vec::new();
    for ca in &chords_a {
        for cb in &chords_b {
            if !ca.bounding.intersects(&cb.bounding, DELTA1) {
                continue;
            }
            let Some((s, u)) = get_chords_crossing(ca, cb) else {
                continue;
            };
            let seed = Vector::new(
                ca.start.0 + (ca.end.0 - ca.start.0) * s,
                cb.start.0 + (cb.end.0 - cb.start.0) * u,
            );
            let refined = newton_iterate2(
                seed,
                |v| a.point_at_param(v.x) - b.point_at_param(v.y),
                |v| {
                    let da = a.derivatives_at_param(v.x).first;
                    let db = b.derivatives_at_param(v.y).first;
                    Matrix2::new(da.x, -db.x, da.y, -db.y)
                },
                NewtonOptions::with_delta(DELTA1),
            );
            match refined {
                Ok(v) => points.push(a.point_at_param(v.x)),
                Err(err) => {
                    trace!(%err, "curve crossing kept at the chord estimate");
                    points.push(ca.start.1 + (ca.end.1 - ca.start.1) * s);
                }
            }
        }
    }
    points
}
