use std::ops::{Add, Mul, Neg, Sub};

use super::equation::{
    calculate_equation1, calculate_equation2, calculate_equation3, calculate_equation4,
    calculate_equation5,
};

/// A real polynomial stored with ascending coefficients: `c0 + c1 x + c2 x² + ...`.
///
/// Used to carry out resultant elimination: parametric coordinates of one
/// curve are built as polynomials and substituted into another curve's
/// implicit equation, and the resulting univariate polynomial is solved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from ascending coefficients.
    #[must_use]
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Creates a polynomial from descending coefficients (`a xⁿ + ... + z`).
    #[must_use]
    pub fn from_descending(coefficients: &[f64]) -> Self {
        Self {
            coefficients: coefficients.iter().rev().copied().collect(),
        }
    }

    /// Constant polynomial.
    #[must_use]
    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    /// `c0 + c1 x`.
    #[must_use]
    pub fn linear(c0: f64, c1: f64) -> Self {
        Self::new(vec![c0, c1])
    }

    /// `c0 + c1 x + c2 x²`.
    #[must_use]
    pub fn quadratic(c0: f64, c1: f64, c2: f64) -> Self {
        Self::new(vec![c0, c1, c2])
    }

    /// Ascending coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Nominal degree (number of stored coefficients minus one).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial with Horner's scheme.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// First derivative.
    #[must_use]
    pub fn derivative(&self) -> Self {
        if self.coefficients.len() <= 1 {
            return Self::constant(0.0);
        }
        #[allow(clippy::cast_precision_loss)]
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Self::new(coefficients)
    }

    /// Multiplies every coefficient by `k`.
    #[must_use]
    pub fn scale(&self, k: f64) -> Self {
        Self::new(self.coefficients.iter().map(|c| c * k).collect())
    }

    /// Raises the polynomial to a small non-negative power.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        (0..n).fold(Self::constant(1.0), |acc, _| &acc * self)
    }

    /// Drops leading coefficients that are negligible relative to the largest one.
    #[must_use]
    pub fn trimmed(&self, delta: f64) -> Self {
        let max = self
            .coefficients
            .iter()
            .fold(0.0_f64, |m, c| m.max(c.abs()));
        if max == 0.0 {
            return Self::constant(0.0);
        }
        let mut coefficients = self.coefficients.clone();
        while coefficients.len() > 1 {
            match coefficients.last() {
                Some(c) if c.abs() <= delta * max => {
                    coefficients.pop();
                }
                _ => break,
            }
        }
        Self::new(coefficients)
    }

    /// Real roots of the polynomial.
    ///
    /// Coefficients are normalized by their largest magnitude before solving so
    /// that the degeneracy checks inside the solvers are scale independent.
    /// Degrees up to four use the closed forms; higher degrees use
    /// Newton–Horner deflation started at `seed`.
    #[must_use]
    pub fn roots(&self, seed: f64, delta: f64) -> Vec<f64> {
        let max = self
            .coefficients
            .iter()
            .fold(0.0_f64, |m, c| m.max(c.abs()));
        if max == 0.0 || !max.is_finite() {
            return Vec::new();
        }
        let normalized = self.scale(1.0 / max).trimmed(delta * 1e-3);
        let d: Vec<f64> = normalized.coefficients.iter().rev().copied().collect();
        match d.len() {
            0 | 1 => Vec::new(),
            2 => calculate_equation1(d[0], d[1], delta),
            3 => calculate_equation2(d[0], d[1], d[2], delta),
            4 => calculate_equation3(d[0], d[1], d[2], d[3], delta),
            5 => calculate_equation4(d[0], d[1], d[2], d[3], d[4], delta),
            _ => calculate_equation5(&d, seed, delta),
        }
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        let coefficients = (0..len)
            .map(|i| {
                self.coefficients.get(i).copied().unwrap_or(0.0)
                    + rhs.coefficients.get(i).copied().unwrap_or(0.0)
            })
            .collect();
        Polynomial::new(coefficients)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        &self + &rhs
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        self + &(-rhs)
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        &self - &rhs
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.coefficients.is_empty() || rhs.coefficients.is_empty() {
            return Polynomial::constant(0.0);
        }
        let mut coefficients = vec![0.0; self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Polynomial::new(coefficients)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}
