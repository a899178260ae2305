use serde::{Deserialize, Serialize};

use crate::error::{BoundaryError, Result};
use crate::fvm::{CellId, Equation, FieldValue};
use crate::math::{Vector2, TOLERANCE};

/// How a field is constrained inside an immersed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    Fixed,
    NormalGradient,
    PartialSlip,
}

impl BoundaryKind {
    /// Writes the rows of `cells` into `eqn`.
    ///
    /// `Fixed` pins every cell to `ref_value(cell)` with a unit diagonal and a
    /// negated source. `ref_value` is not called for the other kinds.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::Unsupported`] for every kind but `Fixed`, or any error
    /// raised by `ref_value`.
    pub fn synthesize<T, I, F>(
        self,
        operation: &'static str,
        eqn: &mut Equation<T>,
        cells: I,
        ref_value: F,
    ) -> Result<()>
    where
        T: FieldValue,
        I: IntoIterator<Item = CellId>,
        F: Fn(CellId) -> Result<T>,
    {
        match self {
            Self::Fixed => {
                for cell in cells {
                    let value = ref_value(cell)?;
                    eqn.add(cell, cell, 1.0);
                    eqn.add_source(cell, -value);
                }
                Ok(())
            }
            Self::NormalGradient | Self::PartialSlip => Err(BoundaryError::Unsupported {
                kind: self,
                operation,
            }
            .into()),
        }
    }
}

/// Reference value of a boundary condition: scalar for scalar fields, a
/// vector for vector fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefValue {
    Scalar(f64),
    Vector(Vector2),
}

impl Default for RefValue {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl RefValue {
    /// The scalar value, or a mismatch error naming `field`.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::RefValueMismatch`] if the value is a vector.
    pub fn scalar(&self, field: &str) -> Result<f64> {
        match self {
            Self::Scalar(v) => Ok(*v),
            Self::Vector(_) => Err(BoundaryError::RefValueMismatch {
                field: field.to_string(),
                expected: "scalar",
            }
            .into()),
        }
    }

    /// The vector value. A scalar zero is accepted as the zero vector.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::RefValueMismatch`] for a non-zero scalar.
    pub fn vector(&self, field: &str) -> Result<Vector2> {
        match self {
            Self::Vector(v) => Ok(*v),
            Self::Scalar(v) if v.abs() < TOLERANCE => Ok(Vector2::zeros()),
            Self::Scalar(_) => Err(BoundaryError::RefValueMismatch {
                field: field.to_string(),
                expected: "vector",
            }
            .into()),
        }
    }
}

/// Boundary condition of one field on an immersed body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    pub kind: BoundaryKind,
    #[serde(default)]
    pub value: RefValue,
}

impl BoundaryCondition {
    #[must_use]
    pub fn new(kind: BoundaryKind, value: RefValue) -> Self {
        Self { kind, value }
    }

    #[must_use]
    pub fn fixed_scalar(value: f64) -> Self {
        Self::new(BoundaryKind::Fixed, RefValue::Scalar(value))
    }

    #[must_use]
    pub fn fixed_vector(value: Vector2) -> Self {
        Self::new(BoundaryKind::Fixed, RefValue::Vector(value))
    }
}
