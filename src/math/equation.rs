use std::f64::consts::PI;

use tracing::trace;

use super::newton::{newton_iterate, NewtonOptions};
use super::{deduplicate_numbers, is_zero_with};

/// Solves `a x + b = 0`.
///
/// Like every solver here, takes coefficients highest degree first and
/// returns the distinct real roots, merging those closer than `delta`. A
/// leading coefficient within `delta` of zero drops to the next lower degree.
#[must_use]
pub fn calculate_equation1(a: f64, b: f64, delta: f64) -> Vec<f64> {
    if is_zero_with(a, delta) {
        return Vec::new();
    }
    vec![-b / a]
}

/// Solves `a x² + b x + c = 0`.
///
/// A slightly negative discriminant (relative to the magnitude of its terms)
/// is treated as zero, so tangent configurations keep their double root.
#[must_use]
pub fn calculate_equation2(a: f64, b: f64, c: f64, delta: f64) -> Vec<f64> {
    if is_zero_with(a, delta) {
        return calculate_equation1(b, c, delta);
    }
    let discriminant = b * b - 4.0 * a * c;
    let scale = (b * b).max((4.0 * a * c).abs());
    if discriminant < 0.0 {
        if discriminant.abs() <= delta * scale {
            return vec![-b / (2.0 * a)];
        }
        return Vec::new();
    }
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        return vec![0.0];
    }
    let roots = vec![q / a, c / q];
    deduplicate_numbers(roots, delta)
}

/// Solves `a x³ + b x² + c x + d = 0` with Cardano's formula, switching to the
/// trigonometric form when there are three real roots.
#[must_use]
pub fn calculate_equation3(a: f64, b: f64, c: f64, d: f64, delta: f64) -> Vec<f64> {
    if is_zero_with(a, delta) {
        return calculate_equation2(b, c, d, delta);
    }
    let (b1, c1, d1) = (b / a, c / a, d / a);
    let p = c1 - b1 * b1 / 3.0;
    let q = 2.0 * b1 * b1 * b1 / 27.0 - b1 * c1 / 3.0 + d1;
    let offset = -b1 / 3.0;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let discriminant = half_q * half_q + third_p * third_p * third_p;
    let scale = (half_q * half_q).max((third_p * third_p * third_p).abs());

    let ys = if is_zero_with(p, delta) && is_zero_with(q, delta) {
        vec![0.0]
    } else if discriminant.abs() <= delta * scale {
        // double root
        vec![3.0 * q / p, -1.5 * q / p]
    } else if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        vec![(-half_q + sqrt_d).cbrt() + (-half_q - sqrt_d).cbrt()]
    } else {
        let r = 2.0 * (-third_p).sqrt();
        let cos_arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = cos_arg.acos() / 3.0;
        (0..3)
            .map(|k| r * (phi - 2.0 * PI * f64::from(k) / 3.0).cos())
            .collect()
    };

    let coefficients = [1.0, b1, c1, d1];
    let roots = ys.into_iter().map(|y| polish(&coefficients, y + offset)).collect();
    deduplicate_numbers(roots, delta)
}

/// Solves `a x⁴ + b x³ + c x² + d x + e = 0` with Ferrari's method.
#[must_use]
pub fn calculate_equation4(a: f64, b: f64, c: f64, d: f64, e: f64, delta: f64) -> Vec<f64> {
    if is_zero_with(a, delta) {
        return calculate_equation3(b, c, d, e, delta);
    }
    let (b1, c1, d1, e1) = (b / a, c / a, d / a, e / a);
    let p = c1 - 3.0 * b1 * b1 / 8.0;
    let q = b1 * b1 * b1 / 8.0 - b1 * c1 / 2.0 + d1;
    let r = -3.0 * b1.powi(4) / 256.0 + b1 * b1 * c1 / 16.0 - b1 * d1 / 4.0 + e1;
    let offset = -b1 / 4.0;

    let mut ys = Vec::new();
    if is_zero_with(q, delta) {
        // biquadratic: z = y²
        for z in calculate_equation2(1.0, p, r, delta) {
            if is_zero_with(z, delta) {
                ys.push(0.0);
            } else if z > 0.0 {
                let s = z.sqrt();
                ys.push(s);
                ys.push(-s);
            }
        }
    } else {
        // resolvent cubic 8m³ + 8pm² + (2p² - 8r)m - q² = 0 has a positive root
        let m = calculate_equation3(8.0, 8.0 * p, 2.0 * p * p - 8.0 * r, -q * q, delta * 1e-3)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        if m > 0.0 {
            let s = (2.0 * m).sqrt();
            ys.extend(calculate_equation2(1.0, -s, p / 2.0 + m + q / (2.0 * s), delta));
            ys.extend(calculate_equation2(1.0, s, p / 2.0 + m - q / (2.0 * s), delta));
        }
    }

    let coefficients = [1.0, b1, c1, d1, e1];
    let roots = ys.into_iter().map(|y| polish(&coefficients, y + offset)).collect();
    deduplicate_numbers(roots, delta)
}

/// Newton–Horner deflation for polynomials of any degree (typically ≥ 5).
///
/// Newton iteration starts from `seed`; each converged root is divided out of
/// the polynomial and the next search starts from that root. Once the
/// remainder is quartic or lower the closed forms finish the job. If the very
/// first Newton run fails the result is empty: there is no bisection
/// fallback, so a badly placed seed can miss roots.
#[must_use]
pub fn calculate_equation5(coefficients: &[f64], seed: f64, delta: f64) -> Vec<f64> {
    let start = coefficients
        .iter()
        .position(|c| !is_zero_with(*c, delta))
        .unwrap_or(coefficients.len());
    let original: Vec<f64> = coefficients[start..].to_vec();
    if original.len() <= 5 {
        return solve_closed_form(&original, delta);
    }
    let leading = original[0];
    let original: Vec<f64> = original.iter().map(|c| c / leading).collect();

    let mut roots = Vec::new();
    let mut current = original.clone();
    let mut x0 = seed;
    while current.len() > 5 {
        let poly = current.clone();
        let options = NewtonOptions {
            delta,
            max_iterations: 200,
        };
        match newton_iterate(
            x0,
            |x| horner(&poly, x).0,
            |x| horner(&poly, x).1,
            options,
        ) {
            Ok(root) => {
                let root = polish(&original, root);
                roots.push(root);
                current = deflate(&current, root);
                x0 = root;
            }
            Err(err) => {
                trace!(%err, degree = current.len() - 1, "deflation stopped");
                if roots.is_empty() {
                    return Vec::new();
                }
                return deduplicate_numbers(roots, delta);
            }
        }
    }
    roots.extend(
        solve_closed_form(&current, delta)
            .into_iter()
            .map(|r| polish(&original, r)),
    );
    deduplicate_numbers(roots, delta)
}

fn solve_closed_form(d: &[f64], delta: f64) -> Vec<f64> {
    match d.len() {
        0 | 1 => Vec::new(),
        2 => calculate_equation1(d[0], d[1], delta),
        3 => calculate_equation2(d[0], d[1], d[2], delta),
        4 => calculate_equation3(d[0], d[1], d[2], d[3], delta),
        _ => calculate_equation4(d[0], d[1], d[2], d[3], d[4], delta),
    }
}

/// Evaluates a descending-coefficient polynomial and its derivative.
fn horner(coefficients: &[f64], x: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;
    for c in coefficients {
        derivative = derivative * x + value;
        value = value * x + c;
    }
    (value, derivative)
}

/// Synthetic division by `(x - root)`, dropping the remainder.
fn deflate(coefficients: &[f64], root: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(coefficients.len() - 1);
    let mut acc = 0.0;
    for c in &coefficients[..coefficients.len() - 1] {
        acc = acc * root + c;
        result.push(acc);
    }
    result
}

/// A few Newton steps on the original polynomial; keeps the input when they do not help.
fn polish(coefficients: &[f64], x: f64) -> f64 {
    let mut best = x;
    let mut best_value = horner(coefficients, x).0.abs();
    let mut current = x;
    for _ in 0..4 {
        let (value, derivative) = horner(coefficients, current);
        if derivative == 0.0 || !derivative.is_finite() {
            break;
        }
        current -= value / derivative;
        let v = horner(coefficients, current).0.abs();
        if v < best_value {
            best = current;
            best_value = v;
        }
    }
    best
}
