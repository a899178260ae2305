use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::{is_unit_param, line_line_intersect_2d, project_onto_line};
use crate::math::{Point2, Vector2, Vector2Ext, TOLERANCE};

/// An infinite line defined by an origin point and a direction vector.
///
/// The parametric form is: `P(t) = origin + t * direction`. The direction is
/// stored as given; "below" means the right-hand side of the direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    origin: Point2,
    direction: Vector2,
}

impl Line2 {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        if direction.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { origin, direction })
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    /// Returns the direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Evaluates the line at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }

    /// Returns `true` if `point` is within tolerance of the line.
    #[must_use]
    pub fn is_approximately_on_line(&self, point: &Point2) -> bool {
        let dist = (point - self.origin).cross2(&self.direction).abs() / self.direction.norm();
        dist < TOLERANCE
    }

    /// Returns `true` if `point` lies strictly on the right-hand side.
    #[must_use]
    pub fn is_below_line(&self, point: &Point2) -> bool {
        self.direction.cross2(&(point - self.origin)) < 0.0
    }

    /// Intersection point of two lines, or `None` if they are parallel.
    #[must_use]
    pub fn intersection(a: &Line2, b: &Line2) -> Option<Point2> {
        line_line_intersect_2d(&a.origin, &a.direction, &b.origin, &b.direction)
            .map(|(t, _)| a.point_at(t))
    }
}

/// A bounded segment from `pt_a` to `pt_b` with parameter range `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment2 {
    pt_a: Point2,
    pt_b: Point2,
}

impl LineSegment2 {
    #[must_use]
    pub fn new(pt_a: Point2, pt_b: Point2) -> Self {
        Self { pt_a, pt_b }
    }

    #[must_use]
    pub fn pt_a(&self) -> &Point2 {
        &self.pt_a
    }

    #[must_use]
    pub fn pt_b(&self) -> &Point2 {
        &self.pt_b
    }

    /// Direction vector `pt_b - pt_a` (not normalized).
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.pt_b - self.pt_a
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.pt_a, &self.pt_b)
    }

    /// Returns `true` if the projection of `point` onto the segment's
    /// supporting line falls within `[0, 1]`.
    #[must_use]
    pub fn is_bounded(&self, point: &Point2) -> bool {
        project_onto_line(point, &self.pt_a, &self.pt_b).is_some_and(|(_, t)| is_unit_param(t))
    }

    /// The supporting infinite line, or `None` for a zero-length segment.
    #[must_use]
    pub fn to_line(&self) -> Option<Line2> {
        Line2::new(self.pt_a, self.direction()).ok()
    }
}
