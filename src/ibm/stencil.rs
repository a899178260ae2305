//! One-dimensional polynomial fits along a cell link.

use nalgebra::{Matrix2, Matrix3, Vector3};

use crate::math::{Vector2, TOLERANCE};

fn distinct(a: f64, b: f64) -> bool {
    (a - b).abs() > TOLERANCE * (1.0 + a.abs().max(b.abs()))
}

/// `φ(η) = c0 η² + c1 η + c2` through three samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFit {
    coeffs: Vector3<f64>,
}

impl QuadraticFit {
    /// Fits the parabola through `(eta[i], values[i])`.
    ///
    /// Returns `None` when two abscissas coincide.
    #[must_use]
    pub fn through(eta: [f64; 3], values: [f64; 3]) -> Option<Self> {
        if !distinct(eta[0], eta[1]) || !distinct(eta[0], eta[2]) || !distinct(eta[1], eta[2]) {
            return None;
        }
        #[rustfmt::skip]
        let a = Matrix3::new(
            eta[0] * eta[0], eta[0], 1.0,
            eta[1] * eta[1], eta[1], 1.0,
            eta[2] * eta[2], eta[2], 1.0,
        );
        let coeffs = a.lu().solve(&Vector3::from(values))?;
        Some(Self { coeffs })
    }

    #[must_use]
    pub fn value(&self, eta: f64) -> f64 {
        self.coeffs[0] * eta * eta + self.coeffs[1] * eta + self.coeffs[2]
    }

    /// `dφ/dη`.
    #[must_use]
    pub fn derivative(&self, eta: f64) -> f64 {
        2.0 * self.coeffs[0] * eta + self.coeffs[1]
    }
}

/// `φ(η) = c0 η + c1` through two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    coeffs: Vector2,
}

impl LinearFit {
    /// Returns `None` when the abscissas coincide.
    #[must_use]
    pub fn through(eta: [f64; 2], values: [f64; 2]) -> Option<Self> {
        if !distinct(eta[0], eta[1]) {
            return None;
        }
        let a = Matrix2::new(eta[0], 1.0, eta[1], 1.0);
        let coeffs = a.lu().solve(&Vector2::from(values))?;
        Some(Self { coeffs })
    }

    #[must_use]
    pub fn value(&self, eta: f64) -> f64 {
        self.coeffs[0] * eta + self.coeffs[1]
    }
}
