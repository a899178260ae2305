use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

use super::Polygon;

/// Common queries shared by every closed 2D region.
pub trait Shape2D {
    /// Area centroid of the region.
    fn centroid(&self) -> Point2;

    /// Enclosed area.
    fn area(&self) -> f64;

    /// Strict interior containment.
    fn is_inside(&self, point: &Point2) -> bool;

    /// Interior or boundary containment.
    fn is_covered(&self, point: &Point2) -> bool;

    /// Polygonal approximation of the region.
    fn polygonize(&self) -> Polygon;
}

/// Default number of sides used when a [`Circle`] is polygonized implicitly.
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;

/// A circle given by centre and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    #[must_use]
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Inscribed regular polygon with `segments` sides.
    ///
    /// The first vertex sits at angle zero.
    #[must_use]
    pub fn polygonize_with(&self, segments: usize) -> Polygon {
        let n = segments.max(3);
        #[allow(clippy::cast_precision_loss)]
        let step = 2.0 * PI / n as f64;
        let verts: Vec<Point2> = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let theta = step * i as f64;
                self.center + Vector2::new(theta.cos(), theta.sin()) * self.radius
            })
            .collect();
        Polygon::new(&verts)
    }
}

impl Shape2D for Circle {
    fn centroid(&self) -> Point2 {
        self.center
    }

    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn is_inside(&self, point: &Point2) -> bool {
        (point - self.center).norm() < self.radius
    }

    fn is_covered(&self, point: &Point2) -> bool {
        (point - self.center).norm() <= self.radius
    }

    fn polygonize(&self) -> Polygon {
        self.polygonize_with(DEFAULT_CIRCLE_SEGMENTS)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn polygonized_circle_converges_on_area() {
        let circle = Circle::new(Point2::new(1.0, -2.0), 0.5);
        let coarse = circle.polygonize_with(16);
        let fine = circle.polygonize_with(512);
        assert!(coarse.area() < fine.area());
        assert_relative_eq!(fine.area(), circle.area(), max_relative = 1e-4);
        assert_relative_eq!(fine.centroid().x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(fine.centroid().y, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn polygonize_clamps_segment_count() {
        let tri = Circle::new(Point2::origin(), 1.0).polygonize_with(1);
        // Triangle plus the repeated closing vertex.
        assert_eq!(tri.vertices().len(), 4);
    }
}
