//! Grid, field and equation interfaces the immersed boundary consumes.
//!
//! The traits describe what the surrounding finite-volume solver provides.
//! [`CartesianGrid`] and [`CellField`] are small concrete implementations
//! for structured grids and tests.

pub mod equation;
pub mod field;
pub mod grid;

pub use equation::{Equation, FieldValue};
pub use field::{CellField, ScalarField, VectorField};
pub use grid::{CartesianGrid, CellId, Grid, Link};
