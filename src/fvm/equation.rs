use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::{AddAssign, Neg};

use crate::math::Vector2;

use super::grid::CellId;

/// Value type an [`Equation`] can carry in its source term.
pub trait FieldValue: Copy + Debug + PartialEq + AddAssign + Neg<Output = Self> {
    fn zero() -> Self;
}

impl FieldValue for f64 {
    fn zero() -> Self {
        0.0
    }
}

impl FieldValue for Vector2 {
    fn zero() -> Self {
        Vector2::zeros()
    }
}

/// Sparse algebraic system `A φ + b = 0` keyed by cell.
///
/// Coefficients and sources accumulate, so several contributors can write
/// the same row.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation<T> {
    name: String,
    coeffs: BTreeMap<CellId, BTreeMap<CellId, f64>>,
    sources: BTreeMap<CellId, T>,
}

impl<T: FieldValue> Equation<T> {
    /// Creates an empty equation for the field called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coeffs: BTreeMap::new(),
            sources: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `coeff` to the matrix entry `(row, col)`.
    pub fn add(&mut self, row: CellId, col: CellId, coeff: f64) {
        *self.coeffs.entry(row).or_default().entry(col).or_insert(0.0) += coeff;
    }

    /// Adds `value` to the source of `row`.
    pub fn add_source(&mut self, row: CellId, value: T) {
        *self.sources.entry(row).or_insert_with(T::zero) += value;
    }

    #[must_use]
    pub fn coefficient(&self, row: CellId, col: CellId) -> f64 {
        self.coeffs
            .get(&row)
            .and_then(|r| r.get(&col))
            .copied()
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn diagonal(&self, row: CellId) -> f64 {
        self.coefficient(row, row)
    }

    #[must_use]
    pub fn source(&self, row: CellId) -> T {
        self.sources.get(&row).copied().unwrap_or_else(T::zero)
    }

    /// Cells with at least one coefficient or source, in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = CellId> + '_ {
        let mut rows: Vec<CellId> = self.coeffs.keys().chain(self.sources.keys()).copied().collect();
        rows.sort_unstable();
        rows.dedup();
        rows.into_iter()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows().count()
    }

    /// Number of stored coefficients in `row`.
    #[must_use]
    pub fn row_len(&self, row: CellId) -> usize {
        self.coeffs.get(&row).map_or(0, BTreeMap::len)
    }

    /// Accumulates every coefficient and source of `other` into `self`.
    pub fn merge(&mut self, other: &Equation<T>) {
        for (&row, cols) in &other.coeffs {
            for (&col, &coeff) in cols {
                self.add(row, col, coeff);
            }
        }
        for (&row, &value) in &other.sources {
            self.add_source(row, value);
        }
    }
}
