use tracing::trace;

/// Upper bound on panel doublings; 2^20 panels is far beyond what smooth
/// curve-length integrands need.
const MAX_LEVEL: usize = 20;

/// Doublings performed before convergence is accepted, so that periodic
/// integrands cannot agree by accident on the first coarse panels.
const MIN_LEVEL: usize = 3;

/// Romberg integration of `f` over `[a, b]`.
///
/// Trapezoid estimates with a doubling panel count are refined by Richardson
/// extrapolation until two successive diagonal entries agree within `delta`.
#[must_use]
pub fn romberg_integral<F>(a: f64, b: f64, f: F, delta: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let mut previous_row: Vec<f64> = vec![(b - a) * (f(a) + f(b)) / 2.0];
    let mut panels: u32 = 1;
    for level in 1..=MAX_LEVEL {
        let h = (b - a) / f64::from(panels * 2);
        let midpoint_sum: f64 = (0..panels)
            .map(|i| f(a + h * f64::from(2 * i + 1)))
            .sum();
        let mut row = Vec::with_capacity(level + 1);
        row.push(previous_row[0] / 2.0 + h * midpoint_sum);
        let mut factor = 1.0;
        for j in 1..=level {
            factor *= 4.0;
            let value = row[j - 1] + (row[j - 1] - previous_row[j - 1]) / (factor - 1.0);
            row.push(value);
        }
        let current = row[level];
        let last = previous_row[level - 1];
        if level >= MIN_LEVEL && (current - last).abs() < delta {
            return current;
        }
        previous_row = row;
        panels *= 2;
    }
    trace!(a, b, "romberg integration hit the level cap");
    previous_row[MAX_LEVEL]
}

/// Composite Newton–Cotes (Boole's rule) integration of `f` over `[a, b]`.
///
/// The panel count doubles until two successive estimates agree within `delta`.
#[must_use]
pub fn cotes_integral<F>(a: f64, b: f64, f: F, delta: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let mut panels: u32 = 1;
    let mut previous = boole(a, b, &f, panels);
    for level in 1..=MAX_LEVEL {
        panels *= 2;
        let current = boole(a, b, &f, panels);
        if level >= MIN_LEVEL && (current - previous).abs() < delta {
            return current;
        }
        previous = current;
    }
    trace!(a, b, "cotes integration hit the level cap");
    previous
}

fn boole<F>(a: f64, b: f64, f: &F, panels: u32) -> f64
where
    F: Fn(f64) -> f64,
{
    let width = (b - a) / f64::from(panels);
    let h = width / 4.0;
    (0..panels)
        .map(|i| {
            let x0 = a + width * f64::from(i);
            2.0 * h / 45.0
                * (7.0 * f(x0)
                    + 32.0 * f(x0 + h)
                    + 12.0 * f(x0 + 2.0 * h)
                    + 32.0 * f(x0 + 3.0 * h)
                    + 7.0 * f(x0 + 4.0 * h))
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn romberg_polynomial() {
        let v = romberg_integral(0.0, 2.0, |x| x * x * x, 1e-10);
        assert_abs_diff_eq!(v, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn romberg_sine() {
        let v = romberg_integral(0.0, PI, f64::sin, 1e-10);
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn romberg_quarter_circle_length() {
        // |d/dt (cos t, sin t)| = 1 → length π/2
        let v = romberg_integral(0.0, PI / 2.0, |t| (t.sin().powi(2) + t.cos().powi(2)).sqrt(), 1e-8);
        assert_abs_diff_eq!(v, PI / 2.0, epsilon = 1e-8);
    }

    #[test]
    fn reversed_bounds_negate() {
        let v = romberg_integral(1.0, 0.0, |x| x, 1e-10);
        assert_abs_diff_eq!(v, -0.5, epsilon = 1e-10);
    }

    #[test]
    fn cotes_exponential() {
        let v = cotes_integral(0.0, 1.0, f64::exp, 1e-10);
        assert_abs_diff_eq!(v, std::f64::consts::E - 1.0, epsilon = 1e-9);
    }
}
