use std::fmt;

use crate::error::{GeometryError, Result};
use crate::geometry::Polygon;
use crate::math::{Point2, Vector2};

/// Index of a grid cell. Stable across partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub usize);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection from a cell to one of its neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    cell: CellId,
    r_cell_vec: Vector2,
}

impl Link {
    #[must_use]
    pub fn new(cell: CellId, r_cell_vec: Vector2) -> Self {
        Self { cell, r_cell_vec }
    }

    /// The neighbouring cell.
    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// Neighbour centroid minus owning cell centroid.
    #[must_use]
    pub fn r_cell_vec(&self) -> &Vector2 {
        &self.r_cell_vec
    }
}

/// Read-only view of a finite-volume grid partition.
pub trait Grid {
    /// Number of addressable cells, local and remote.
    fn num_cells(&self) -> usize;

    /// Cells owned by this partition.
    fn active_cells(&self) -> &[CellId];

    fn centroid(&self, cell: CellId) -> Point2;

    /// Face-sharing neighbours.
    fn neighbours(&self, cell: CellId) -> &[Link];

    /// Corner-sharing neighbours.
    fn diagonals(&self, cell: CellId) -> &[Link];

    /// Cell whose centroid is closest to `point`, searched over the whole grid.
    fn nearest_cell(&self, point: &Point2) -> Option<CellId>;

    /// Active cells whose centroid lies strictly inside `shape`.
    fn cells_within(&self, shape: &Polygon) -> Vec<CellId> {
        let bb = shape.bounding_box();
        self.active_cells()
            .iter()
            .copied()
            .filter(|&cell| {
                let xc = self.centroid(cell);
                bb.contains(&xc) && shape.is_inside(&xc)
            })
            .collect()
    }
}

/// Uniform structured grid of square cells.
///
/// Cell `(i, j)` has id `j * nx + i`. All cells exist on every partition;
/// a partition only restricts which rows are active.
#[derive(Debug, Clone)]
pub struct CartesianGrid {
    nx: usize,
    ny: usize,
    spacing: f64,
    origin: Point2,
    centroids: Vec<Point2>,
    neighbours: Vec<Vec<Link>>,
    diagonals: Vec<Vec<Link>>,
    active: Vec<CellId>,
}

impl CartesianGrid {
    /// Creates an `nx` by `ny` grid whose lower-left corner is `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or `spacing` is not
    /// positive.
    pub fn new(nx: usize, ny: usize, spacing: f64, origin: Point2) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(GeometryError::Degenerate(format!("grid dimensions {nx}x{ny}")).into());
        }
        if spacing.is_nan() || spacing <= 0.0 {
            return Err(GeometryError::Degenerate(format!("grid spacing {spacing}")).into());
        }

        let n = nx * ny;
        let mut centroids = Vec::with_capacity(n);
        for j in 0..ny {
            for i in 0..nx {
                #[allow(clippy::cast_precision_loss)]
                let (fi, fj) = (i as f64, j as f64);
                centroids.push(Point2::new(
                    origin.x + (fi + 0.5) * spacing,
                    origin.y + (fj + 0.5) * spacing,
                ));
            }
        }

        let face_offsets: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
        let corner_offsets: [(isize, isize); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];
        let mut neighbours = Vec::with_capacity(n);
        let mut diagonals = Vec::with_capacity(n);
        for j in 0..ny {
            for i in 0..nx {
                let here = centroids[j * nx + i];
                let links = |offsets: &[(isize, isize)]| -> Vec<Link> {
                    offsets
                        .iter()
                        .filter_map(|&(di, dj)| {
                            let ni = i.checked_add_signed(di).filter(|&v| v < nx)?;
                            let nj = j.checked_add_signed(dj).filter(|&v| v < ny)?;
                            let id = nj * nx + ni;
                            Some(Link::new(CellId(id), centroids[id] - here))
                        })
                        .collect()
                };
                neighbours.push(links(&face_offsets));
                diagonals.push(links(&corner_offsets));
            }
        }

        Ok(Self {
            nx,
            ny,
            spacing,
            origin,
            centroids,
            neighbours,
            diagonals,
            active: (0..n).map(CellId).collect(),
        })
    }

    /// Restricts the active cells to the band of rows owned by `rank` out of
    /// `size` partitions. Rows are dealt out in contiguous blocks.
    #[must_use]
    pub fn with_row_partition(mut self, rank: usize, size: usize) -> Self {
        let size = size.max(1);
        let rows_per = self.ny.div_ceil(size);
        let j0 = (rank * rows_per).min(self.ny);
        let j1 = ((rank + 1) * rows_per).min(self.ny);
        self.active = (j0 * self.nx..j1 * self.nx).map(CellId).collect();
        self
    }

    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Id of cell `(i, j)`.
    #[must_use]
    pub fn cell_at(&self, i: usize, j: usize) -> CellId {
        CellId(j * self.nx + i)
    }

    fn index_along(&self, coord: f64, origin: f64, count: usize) -> usize {
        let f = ((coord - origin) / self.spacing).floor();
        if f <= 0.0 || f.is_nan() {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = f as usize;
            idx.min(count - 1)
        }
    }
}

impl Grid for CartesianGrid {
    fn num_cells(&self) -> usize {
        self.centroids.len()
    }

    fn active_cells(&self) -> &[CellId] {
        &self.active
    }

    fn centroid(&self, cell: CellId) -> Point2 {
        self.centroids[cell.0]
    }

    fn neighbours(&self, cell: CellId) -> &[Link] {
        &self.neighbours[cell.0]
    }

    fn diagonals(&self, cell: CellId) -> &[Link] {
        &self.diagonals[cell.0]
    }

    fn nearest_cell(&self, point: &Point2) -> Option<CellId> {
        let i = self.index_along(point.x, self.origin.x, self.nx);
        let j = self.index_along(point.y, self.origin.y, self.ny);
        Some(self.cell_at(i, j))
    }
}
