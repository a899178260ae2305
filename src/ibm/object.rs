use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BoundaryError, Result};
use crate::fvm::{CellId, Grid};
use crate::geometry::{LineSegment2, Polygon};
use crate::math::{Point2, Vector2};

use super::boundary::BoundaryCondition;

slotmap::new_key_type! {
    /// Key of an object inside an [`ImmersedBoundary`](super::ImmersedBoundary).
    pub struct IbObjectId;
}

/// Prescribed rigid-body velocity of an immersed body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    #[serde(default = "Vector2::zeros")]
    pub velocity: Vector2,
    #[serde(default)]
    pub angular_velocity: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            velocity: Vector2::zeros(),
            angular_velocity: 0.0,
        }
    }
}

impl Motion {
    #[must_use]
    pub fn new(velocity: Vector2, angular_velocity: f64) -> Self {
        Self {
            velocity,
            angular_velocity,
        }
    }

    /// Velocity at `point` of a body rotating about `center`.
    #[must_use]
    pub fn velocity_at(&self, point: &Point2, center: &Point2) -> Vector2 {
        let r = point - center;
        self.velocity + self.angular_velocity * Vector2::new(-r.y, r.x)
    }
}

/// A rigid body embedded in a grid it does not conform to.
///
/// Owns its contour and borrows the grid. The cell sets are only meaningful
/// after an `update_cells` call with the current shape; moving the shape
/// clears them.
#[derive(Debug, Clone)]
pub struct ImmersedBoundaryObject<'g, G> {
    name: String,
    pub(crate) id: IbObjectId,
    grid: &'g G,
    shape: Polygon,
    rho: f64,
    mu: f64,
    motion: Motion,
    boundaries: BTreeMap<String, BoundaryCondition>,

    pub(crate) cells: BTreeSet<CellId>,
    pub(crate) solid_cells: BTreeSet<CellId>,
    pub(crate) ib_cells: BTreeSet<CellId>,
    pub(crate) forcing_cells: BTreeSet<CellId>,

    pub(crate) force: Vector2,
    pub(crate) torque: f64,
}

impl<'g, G: Grid> ImmersedBoundaryObject<'g, G> {
    /// Creates a body at rest with no boundary conditions and empty cell sets.
    #[must_use]
    pub fn new(name: impl Into<String>, grid: &'g G, shape: Polygon, rho: f64, mu: f64) -> Self {
        Self {
            name: name.into(),
            id: IbObjectId::default(),
            grid,
            shape,
            rho,
            mu,
            motion: Motion::default(),
            boundaries: BTreeMap::new(),
            cells: BTreeSet::new(),
            solid_cells: BTreeSet::new(),
            ib_cells: BTreeSet::new(),
            forcing_cells: BTreeSet::new(),
            force: Vector2::zeros(),
            torque: 0.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry key, or the null key for a standalone object.
    #[must_use]
    pub fn id(&self) -> IbObjectId {
        self.id
    }

    #[must_use]
    pub fn grid(&self) -> &'g G {
        self.grid
    }

    #[must_use]
    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    /// Body density.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Body viscosity.
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    #[must_use]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    /// Body velocity at `point`, rotating about the shape centroid.
    #[must_use]
    pub fn velocity(&self, point: &Point2) -> Vector2 {
        self.motion.velocity_at(point, &self.shape.centroid())
    }

    /// Sets the boundary condition applied to the field called `field`.
    pub fn set_boundary(&mut self, field: impl Into<String>, bc: BoundaryCondition) {
        self.boundaries.insert(field.into(), bc);
    }

    /// # Errors
    ///
    /// [`BoundaryError::NotConfigured`] if `field` has no boundary condition.
    pub fn boundary_condition(&self, field: &str) -> Result<&BoundaryCondition> {
        self.boundaries
            .get(field)
            .ok_or_else(|| BoundaryError::NotConfigured(field.to_string()).into())
    }

    pub fn boundaries(&self) -> impl Iterator<Item = (&str, &BoundaryCondition)> + '_ {
        self.boundaries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Solid and ib cells together.
    #[must_use]
    pub fn cells(&self) -> &BTreeSet<CellId> {
        &self.cells
    }

    #[must_use]
    pub fn solid_cells(&self) -> &BTreeSet<CellId> {
        &self.solid_cells
    }

    #[must_use]
    pub fn ib_cells(&self) -> &BTreeSet<CellId> {
        &self.ib_cells
    }

    #[must_use]
    pub fn forcing_cells(&self) -> &BTreeSet<CellId> {
        &self.forcing_cells
    }

    /// Solid cells followed by ib cells, the rows pinned by a fixed
    /// boundary condition.
    pub fn fixed_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.solid_cells.iter().chain(&self.ib_cells).copied()
    }

    /// Returns `true` if the centroid of `cell` lies strictly inside the body.
    #[must_use]
    pub fn is_in_ib(&self, cell: CellId) -> bool {
        self.shape.is_inside(&self.grid.centroid(cell))
    }

    /// Net force from the last force computation.
    #[must_use]
    pub fn force(&self) -> Vector2 {
        self.force
    }

    /// Net torque about the shape centroid from the last force computation.
    #[must_use]
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Segment from the start of `ln` to where it crosses the contour.
    ///
    /// With several crossings the one closest to `ln.pt_a()` is used. A
    /// segment that misses the contour ends at the contour point nearest its
    /// midpoint instead.
    #[must_use]
    pub fn intersection_line(&self, ln: &LineSegment2) -> LineSegment2 {
        let start = *ln.pt_a();
        let crossing = self
            .shape
            .intersections_with_segment(ln)
            .into_iter()
            .min_by(|a, b| (*a - start).norm_squared().total_cmp(&(*b - start).norm_squared()));

        let end = crossing.unwrap_or_else(|| {
            let fallback = self.shape.nearest_intersect(&ln.midpoint());
            warn!(
                object = %self.name,
                x = fallback.x,
                y = fallback.y,
                "link does not cross the contour, using nearest contour point"
            );
            fallback
        });
        LineSegment2::new(start, end)
    }

    /// Moves the body. Cell sets are cleared until the next classification.
    pub fn translate_shape(&mut self, v: &Vector2) {
        self.shape.translate(v);
        self.clear_cells();
    }

    /// Rotates the body about its centroid. Cell sets are cleared until the
    /// next classification.
    pub fn rotate_shape(&mut self, theta: f64) {
        self.shape.rotate(theta);
        self.clear_cells();
    }

    fn clear_cells(&mut self) {
        self.cells.clear();
        self.solid_cells.clear();
        self.ib_cells.clear();
        self.forcing_cells.clear();
    }
}
