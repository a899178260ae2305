//! Immersed bodies on non-conforming grids.
//!
//! A body classifies the grid cells it covers, pins them through
//! boundary-condition equations and integrates the surface loads the fluid
//! exerts on it.

pub mod boundary;
pub mod config;
pub mod integrate;
pub mod object;
pub mod quadratic;
pub mod registry;
pub mod stencil;

pub use boundary::{BoundaryCondition, BoundaryKind, RefValue};
pub use config::{ImmersedBoundaryConfig, ShapeConfig};
pub use integrate::{BoundarySample, Traction};
pub use object::{IbObjectId, ImmersedBoundaryObject, Motion};
pub use quadratic::QuadraticImmersedBoundaryObject;
pub use registry::ImmersedBoundary;

use crate::error::Result;
use crate::fvm::{Equation, ScalarField, VectorField};
use crate::math::Vector2;
use crate::parallel::Communicator;

/// Per-time-step interface between an immersed body and the flow solver.
///
/// Call order within a step: [`update_cells`](Self::update_cells), the
/// boundary-condition methods for every transported field, then one of the
/// force computations once the flow is solved.
pub trait ImmersedBoundaryMethod {
    /// Reclassifies the grid cells against the current shape.
    fn update_cells(&mut self);

    /// Equation rows constraining a scalar field inside the body.
    ///
    /// # Errors
    ///
    /// Fails if the field has no boundary condition, its kind is not
    /// supported, or its reference value is not a scalar.
    fn bcs(&self, field: &dyn ScalarField) -> Result<Equation<f64>>;

    /// Equation rows constraining a vector field inside the body.
    ///
    /// # Errors
    ///
    /// As [`bcs`](Self::bcs), for a vector reference value.
    fn vector_bcs(&self, field: &dyn VectorField) -> Result<Equation<Vector2>>;

    /// Equation rows pinning the velocity inside the body to the body's own
    /// rigid motion.
    ///
    /// # Errors
    ///
    /// Fails if the field has no boundary condition or its kind is not
    /// supported.
    fn velocity_bcs(&self, field: &dyn VectorField) -> Result<Equation<Vector2>>;

    /// Force and torque for constant fluid density `rho` and viscosity `mu`.
    ///
    /// Collective over `comm`.
    ///
    /// # Errors
    ///
    /// Fails if an extrapolation stencil is singular or cannot be found.
    fn compute_force<C: Communicator>(
        &mut self,
        rho: f64,
        mu: f64,
        u: &dyn VectorField,
        p: &dyn ScalarField,
        g: &Vector2,
        comm: &C,
    ) -> Result<()>;

    /// Pressure force and torque for a variable fluid density.
    ///
    /// Collective over `comm`.
    ///
    /// # Errors
    ///
    /// Fails if an extrapolation stencil is singular or cannot be found.
    fn compute_force_variable<C: Communicator>(
        &mut self,
        rho: &dyn ScalarField,
        mu: &dyn ScalarField,
        u: &dyn VectorField,
        p: &dyn ScalarField,
        g: &Vector2,
        comm: &C,
    ) -> Result<()>;

    fn force(&self) -> Vector2;

    fn torque(&self) -> f64;
}
