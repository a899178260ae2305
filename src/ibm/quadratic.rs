use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::error::{GeometryError, NumericError, Result};
use crate::fvm::{CellId, Equation, Grid, Link, ScalarField, VectorField};
use crate::geometry::{LineSegment2, Polygon};
use crate::math::{Point2, Vector2, Vector2Ext};
use crate::parallel::Communicator;

use super::integrate::{gather_samples, integrate_ring, sort_by_angle, BoundarySample, Traction};
use super::object::ImmersedBoundaryObject;
use super::stencil::{LinearFit, QuadraticFit};
use super::ImmersedBoundaryMethod;

/// Immersed body whose surface loads come from quadratic extrapolation
/// across the interface.
#[derive(Debug, Clone)]
pub struct QuadraticImmersedBoundaryObject<'g, G> {
    object: ImmersedBoundaryObject<'g, G>,
}

/// Geometry of one ib-cell to fluid-neighbour link.
#[derive(Debug, Clone, Copy)]
struct LinkStencil {
    stencil_cell: CellId,
    ib_cell: CellId,
    nb_cell: CellId,
    eta: [f64; 3],
    boundary_point: Point2,
    eta_b: f64,
}

impl LinkStencil {
    fn quadratic(&self, values: [f64; 3]) -> Result<QuadraticFit> {
        QuadraticFit::through(self.eta, values).ok_or_else(|| {
            NumericError::SingularStencil {
                cell: self.ib_cell.0,
            }
            .into()
        })
    }

    fn linear(&self, values: [f64; 2]) -> Result<LinearFit> {
        LinearFit::through([self.eta[0], self.eta[1]], values).ok_or_else(|| {
            NumericError::SingularStencil {
                cell: self.ib_cell.0,
            }
            .into()
        })
    }

    fn scalar(&self, field: &dyn ScalarField) -> [f64; 3] {
        [
            field.value(self.stencil_cell),
            field.value(self.ib_cell),
            field.value(self.nb_cell),
        ]
    }
}

#[derive(Debug, Default)]
struct SampleSets {
    pressure: Vec<BoundarySample>,
    shear_x: Vec<BoundarySample>,
    shear_y: Vec<BoundarySample>,
}

impl<'g, G: Grid> QuadraticImmersedBoundaryObject<'g, G> {
    #[must_use]
    pub fn new(name: impl Into<String>, grid: &'g G, shape: Polygon, rho: f64, mu: f64) -> Self {
        Self::from_object(ImmersedBoundaryObject::new(name, grid, shape, rho, mu))
    }

    #[must_use]
    pub fn from_object(object: ImmersedBoundaryObject<'g, G>) -> Self {
        Self { object }
    }

    #[must_use]
    pub fn object(&self) -> &ImmersedBoundaryObject<'g, G> {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut ImmersedBoundaryObject<'g, G> {
        &mut self.object
    }

    /// Every ib cell paired with each face neighbour outside the body.
    fn interface_links(&self) -> Vec<(CellId, Link)> {
        let object = &self.object;
        let grid = object.grid();
        object
            .ib_cells()
            .iter()
            .flat_map(move |&cell| {
                grid.neighbours(cell)
                    .iter()
                    .filter(move |nb| !object.is_in_ib(nb.cell()))
                    .map(move |nb| (cell, *nb))
            })
            .collect()
    }

    fn link_stencil(&self, cell: CellId, link: &Link) -> Result<LinkStencil> {
        let grid = self.object.grid();
        let xc = grid.centroid(cell);
        let xn = grid.centroid(link.cell());

        let reflected = xc + (xc - xn);
        let stencil_cell = grid.nearest_cell(&reflected).ok_or_else(|| {
            GeometryError::Degenerate(format!("no stencil cell behind ib cell {cell}"))
        })?;

        let boundary_point = *self
            .object
            .intersection_line(&LineSegment2::new(xc, xn))
            .pt_b();
        let eta_dir = link.r_cell_vec().unit_vec();
        let eta = [
            grid.centroid(stencil_cell).coords.dot(&eta_dir),
            xc.coords.dot(&eta_dir),
            xn.coords.dot(&eta_dir),
        ];
        let eta_b = boundary_point.coords.dot(&eta_dir);

        trace!(
            ib_cell = %cell,
            nb_cell = %link.cell(),
            stencil_cell = %stencil_cell,
            x = boundary_point.x,
            y = boundary_point.y,
            "interface stencil"
        );

        Ok(LinkStencil {
            stencil_cell,
            ib_cell: cell,
            nb_cell: link.cell(),
            eta,
            boundary_point,
            eta_b,
        })
    }

    /// Pressure and shear samples of the local interface links.
    fn sample_constant(
        &self,
        rho: f64,
        mu: f64,
        u: &dyn VectorField,
        p: &dyn ScalarField,
        g: &Vector2,
    ) -> Result<SampleSets> {
        let mut samples = SampleSets::default();

        for (cell, link) in self.interface_links() {
            let st = self.link_stencil(cell, &link)?;
            let xb = st.boundary_point;

            let p_fit = st.quadratic(st.scalar(p))?;
            samples.pressure.push(BoundarySample::new(
                xb,
                p_fit.value(st.eta_b) + rho * g.dot(&xb.coords),
            ));

            let velocity = [u.value(st.stencil_cell), u.value(st.ib_cell), u.value(st.nb_cell)];
            let r = link.r_cell_vec();
            if r.x.abs() > r.y.abs() {
                let fit = st.quadratic(velocity.map(|v| v.y))?;
                samples
                    .shear_y
                    .push(BoundarySample::new(xb, -mu * fit.derivative(st.eta_b)));
            } else {
                let fit = st.quadratic(velocity.map(|v| v.x))?;
                samples
                    .shear_x
                    .push(BoundarySample::new(xb, -mu * fit.derivative(st.eta_b)));
            }
        }

        Ok(samples)
    }

    /// Pressure samples with the hydrostatic head of a variable density.
    fn sample_variable(
        &self,
        rho: &dyn ScalarField,
        p: &dyn ScalarField,
        g: &Vector2,
    ) -> Result<SampleSets> {
        let mut samples = SampleSets::default();

        for (cell, link) in self.interface_links() {
            let st = self.link_stencil(cell, &link)?;
            let xb = st.boundary_point;

            let p_b = st.quadratic(st.scalar(p))?.value(st.eta_b);
            let rho_b = st
                .linear([rho.value(st.stencil_cell), rho.value(st.ib_cell)])?
                .value(st.eta_b);
            samples
                .pressure
                .push(BoundarySample::new(xb, p_b + rho_b * g.dot(&xb.coords)));
        }

        Ok(samples)
    }

    /// Agrees on success with every rank before reducing.
    ///
    /// All ranks reach the same collectives whatever their local outcome, and
    /// all of them fail if any one did. Force and torque are left unchanged
    /// on failure.
    fn finish<C: Communicator>(
        &mut self,
        local: Result<SampleSets>,
        g: &Vector2,
        comm: &C,
    ) -> Result<()> {
        let failed = comm.all_gather_v(vec![local.is_err()]);
        let samples = local?;
        if let Some(rank) = failed.iter().position(|&f| f) {
            warn!(object = %self.object.name(), rank, "boundary sampling failed on another rank");
            return Err(NumericError::RankFailed { rank }.into());
        }
        self.reduce(samples, g, comm);
        Ok(())
    }

    /// Gathers the samples of every rank, orders them around the body and
    /// integrates each set.
    fn reduce<C: Communicator>(&mut self, local: SampleSets, g: &Vector2, comm: &C) {
        let center = self.object.shape().centroid();
        let mut pressure = gather_samples(comm, local.pressure);
        let mut shear_x = gather_samples(comm, local.shear_x);
        let mut shear_y = gather_samples(comm, local.shear_y);
        debug!(
            object = %self.object.name(),
            pressure = pressure.len(),
            shear_x = shear_x.len(),
            shear_y = shear_y.len(),
            "integrating boundary samples"
        );

        sort_by_angle(&mut pressure, &center);
        sort_by_angle(&mut shear_x, &center);
        sort_by_angle(&mut shear_y, &center);

        let (pressure_force, pressure_torque) = integrate_ring(&pressure, &center, Traction::Pressure);
        let (shear_x_force, shear_x_torque) = integrate_ring(&shear_x, &center, Traction::ShearX);
        let (shear_y_force, shear_y_torque) = integrate_ring(&shear_y, &center, Traction::ShearY);

        let weight = self.object.rho() * self.object.shape().area() * *g;
        self.object.force = pressure_force + weight + shear_x_force + shear_y_force;
        self.object.torque = pressure_torque + shear_x_torque + shear_y_torque;
    }
}

impl<G: Grid> ImmersedBoundaryMethod for QuadraticImmersedBoundaryObject<'_, G> {
    fn update_cells(&mut self) {
        let grid = self.object.grid();
        let shape = self.object.shape();
        let outside = |cell: CellId| !shape.is_inside(&grid.centroid(cell));

        let cells: BTreeSet<CellId> = grid.cells_within(shape).into_iter().collect();
        let (ib_cells, solid_cells): (BTreeSet<CellId>, BTreeSet<CellId>) =
            cells.iter().partition(|&&cell| {
                grid.neighbours(cell)
                    .iter()
                    .chain(grid.diagonals(cell))
                    .any(|link| outside(link.cell()))
            });
        let forcing_cells: BTreeSet<CellId> = ib_cells
            .iter()
            .flat_map(|&cell| grid.neighbours(cell).iter().map(Link::cell))
            .filter(|&nb| outside(nb))
            .collect();

        debug!(
            object = %self.object.name(),
            cells = cells.len(),
            solid = solid_cells.len(),
            ib = ib_cells.len(),
            forcing = forcing_cells.len(),
            "classified cells"
        );

        self.object.cells = cells;
        self.object.solid_cells = solid_cells;
        self.object.ib_cells = ib_cells;
        self.object.forcing_cells = forcing_cells;
    }

    fn bcs(&self, field: &dyn ScalarField) -> Result<Equation<f64>> {
        let bc = self.object.boundary_condition(field.name())?;
        let mut eqn = Equation::new(field.name());
        bc.kind
            .synthesize("bcs", &mut eqn, self.object.fixed_cells(), |_| {
                bc.value.scalar(field.name())
            })?;
        Ok(eqn)
    }

    fn vector_bcs(&self, field: &dyn VectorField) -> Result<Equation<Vector2>> {
        let bc = self.object.boundary_condition(field.name())?;
        let mut eqn = Equation::new(field.name());
        bc.kind
            .synthesize("vector_bcs", &mut eqn, self.object.fixed_cells(), |_| {
                bc.value.vector(field.name())
            })?;
        Ok(eqn)
    }

    fn velocity_bcs(&self, field: &dyn VectorField) -> Result<Equation<Vector2>> {
        let bc = self.object.boundary_condition(field.name())?;
        let grid = self.object.grid();
        let mut eqn = Equation::new(field.name());
        bc.kind
            .synthesize("velocity_bcs", &mut eqn, self.object.fixed_cells(), |cell| {
                Ok(self.object.velocity(&grid.centroid(cell)))
            })?;
        Ok(eqn)
    }

    fn compute_force<C: Communicator>(
        &mut self,
        rho: f64,
        mu: f64,
        u: &dyn VectorField,
        p: &dyn ScalarField,
        g: &Vector2,
        comm: &C,
    ) -> Result<()> {
        let local = self.sample_constant(rho, mu, u, p, g);
        self.finish(local, g, comm)
    }

    fn compute_force_variable<C: Communicator>(
        &mut self,
        rho: &dyn ScalarField,
        _mu: &dyn ScalarField,
        _u: &dyn VectorField,
        p: &dyn ScalarField,
        g: &Vector2,
        comm: &C,
    ) -> Result<()> {
        let local = self.sample_variable(rho, p, g);
        self.finish(local, g, comm)
    }

    fn force(&self) -> Vector2 {
        self.object.force()
    }

    fn torque(&self) -> f64 {
        self.object.torque()
    }
}
