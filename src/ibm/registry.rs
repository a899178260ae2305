use slotmap::SlotMap;

use crate::error::Result;
use crate::fvm::{CellId, Equation, Grid, ScalarField, VectorField};
use crate::math::Vector2;
use crate::parallel::Communicator;

use super::config::ImmersedBoundaryConfig;
use super::object::{IbObjectId, ImmersedBoundaryObject};
use super::quadratic::QuadraticImmersedBoundaryObject;
use super::ImmersedBoundaryMethod;

/// All immersed bodies sharing one grid.
///
/// Bodies are independent; iteration follows insertion order so every rank
/// visits them, and reaches their collectives, in the same sequence.
#[derive(Debug)]
pub struct ImmersedBoundary<'g, G> {
    grid: &'g G,
    objects: SlotMap<IbObjectId, QuadraticImmersedBoundaryObject<'g, G>>,
}

impl<'g, G: Grid> ImmersedBoundary<'g, G> {
    #[must_use]
    pub fn new(grid: &'g G) -> Self {
        Self {
            grid,
            objects: SlotMap::with_key(),
        }
    }

    /// Builds a body from `config` and registers it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn add_object(&mut self, config: &ImmersedBoundaryConfig) -> Result<IbObjectId> {
        let object = ImmersedBoundaryObject::from_config(config, self.grid)?;
        Ok(self.insert(QuadraticImmersedBoundaryObject::from_object(object)))
    }

    /// Registers an already built body, assigning it a fresh id.
    pub fn insert(&mut self, object: QuadraticImmersedBoundaryObject<'g, G>) -> IbObjectId {
        self.objects.insert_with_key(|id| {
            let mut object = object;
            object.object_mut().id = id;
            object
        })
    }

    pub fn remove(&mut self, id: IbObjectId) -> Option<QuadraticImmersedBoundaryObject<'g, G>> {
        self.objects.remove(id)
    }

    #[must_use]
    pub fn object(&self, id: IbObjectId) -> Option<&QuadraticImmersedBoundaryObject<'g, G>> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: IbObjectId) -> Option<&mut QuadraticImmersedBoundaryObject<'g, G>> {
        self.objects.get_mut(id)
    }

    /// The body whose solid or ib cells include `cell`.
    #[must_use]
    pub fn ib_obj(&self, cell: CellId) -> Option<&QuadraticImmersedBoundaryObject<'g, G>> {
        self.objects
            .values()
            .find(|ibo| ibo.object().cells().contains(&cell))
    }

    pub fn iter(&self) -> impl Iterator<Item = (IbObjectId, &QuadraticImmersedBoundaryObject<'g, G>)> + '_ {
        self.objects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn update_cells(&mut self) {
        for ibo in self.objects.values_mut() {
            ibo.update_cells();
        }
    }

    /// Boundary rows of every body for a scalar field.
    ///
    /// # Errors
    ///
    /// Fails on the first body that cannot constrain `field`.
    pub fn bcs(&self, field: &dyn ScalarField) -> Result<Equation<f64>> {
        let mut eqn = Equation::new(field.name());
        for ibo in self.objects.values() {
            eqn.merge(&ibo.bcs(field)?);
        }
        Ok(eqn)
    }

    /// Boundary rows of every body for a vector field.
    ///
    /// # Errors
    ///
    /// Fails on the first body that cannot constrain `field`.
    pub fn vector_bcs(&self, field: &dyn VectorField) -> Result<Equation<Vector2>> {
        let mut eqn = Equation::new(field.name());
        for ibo in self.objects.values() {
            eqn.merge(&ibo.vector_bcs(field)?);
        }
        Ok(eqn)
    }

    /// Velocity rows of every body.
    ///
    /// # Errors
    ///
    /// Fails on the first body that cannot constrain `field`.
    pub fn velocity_bcs(&self, field: &dyn VectorField) -> Result<Equation<Vector2>> {
        let mut eqn = Equation::new(field.name());
        for ibo in self.objects.values() {
            eqn.merge(&ibo.velocity_bcs(field)?);
        }
        Ok(eqn)
    }

    /// Computes force and torque on every body.
    ///
    /// # Errors
    ///
    /// Fails on the first body whose stencils cannot be built.
    pub fn compute_forces<C: Communicator>(
        &mut self,
        rho: f64,
        mu: f64,
        u: &dyn VectorField,
        p: &dyn ScalarField,
        g: &Vector2,
        comm: &C,
    ) -> Result<()> {
        for ibo in self.objects.values_mut() {
            ibo.compute_force(rho, mu, u, p, g, comm)?;
        }
        Ok(())
    }
}
