use crate::math::{Point2, Vector2};

use super::grid::{CellId, Grid};

/// Named cell-centred scalar field.
pub trait ScalarField {
    fn name(&self) -> &str;
    fn value(&self, cell: CellId) -> f64;
}

/// Named cell-centred vector field.
pub trait VectorField {
    fn name(&self) -> &str;
    fn value(&self, cell: CellId) -> Vector2;
}

/// Dense field storing one value per grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellField<T> {
    name: String,
    values: Vec<T>,
}

impl<T: Copy> CellField<T> {
    /// Creates a field with every cell set to `init`.
    #[must_use]
    pub fn uniform(name: impl Into<String>, num_cells: usize, init: T) -> Self {
        Self {
            name: name.into(),
            values: vec![init; num_cells],
        }
    }

    /// Samples `f` at every cell centroid of `grid`.
    #[must_use]
    pub fn from_fn<G: Grid>(name: impl Into<String>, grid: &G, f: impl Fn(Point2) -> T) -> Self {
        Self {
            name: name.into(),
            values: (0..grid.num_cells())
                .map(|i| f(grid.centroid(CellId(i))))
                .collect(),
        }
    }

    pub fn set(&mut self, cell: CellId, value: T) {
        self.values[cell.0] = value;
    }

    #[must_use]
    pub fn get(&self, cell: CellId) -> T {
        self.values[cell.0]
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl ScalarField for CellField<f64> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, cell: CellId) -> f64 {
        self.get(cell)
    }
}

impl VectorField for CellField<Vector2> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, cell: CellId) -> Vector2 {
        self.get(cell)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fvm::CartesianGrid;

    #[test]
    fn sampled_field_follows_centroids() {
        let grid = CartesianGrid::new(2, 2, 1.0, Point2::origin()).unwrap();
        let p = CellField::from_fn("p", &grid, |x| x.y);
        assert_eq!(ScalarField::name(&p), "p");
        assert!((p.value(grid.cell_at(1, 1)) - 1.5).abs() < 1e-12);
        assert!((p.value(grid.cell_at(1, 0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn set_overrides_single_cell() {
        let mut u = CellField::uniform("u", 3, Vector2::new(1.0, 0.0));
        u.set(CellId(2), Vector2::new(0.0, -1.0));
        assert_eq!(VectorField::value(&u, CellId(0)), Vector2::new(1.0, 0.0));
        assert_eq!(u.get(CellId(2)), Vector2::new(0.0, -1.0));
        assert_eq!(u.values().len(), 3);
    }
}
