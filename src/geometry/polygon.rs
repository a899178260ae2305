use std::ops::{Add, AddAssign, Sub, SubAssign};

use geo::Intersects;

use crate::math::intersect_2d::{is_unit_param, line_line_intersect_2d, project_onto_line};
use crate::math::polygon_2d::{
    classify_point_in_ring, ring_centroid, ring_self_intersects, signed_area_2d, RingPosition,
};
use crate::math::{Point2, Vector2, Vector2Ext, TOLERANCE};

use super::line::{Line2, LineSegment2};
use super::shape::Shape2D;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb2 {
    /// Returns `true` if `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// A simple closed polygon.
///
/// The ring repeats its first vertex as its last and is kept
/// counter-clockwise. Area and centroid are cached and refreshed whenever
/// the ring is rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2>,
    area: f64,
    centroid: Point2,
}

impl Polygon {
    /// Builds a polygon from an open or closed vertex sequence.
    ///
    /// The ring is closed if needed and reoriented counter-clockwise.
    #[must_use]
    pub fn new(vertices: &[Point2]) -> Self {
        let mut ring = vertices.to_vec();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if (last - first).norm() > TOLERANCE {
                ring.push(first);
            }
        }
        let mut pgn = Self {
            vertices: ring,
            area: 0.0,
            centroid: Point2::origin(),
        };
        pgn.init();
        pgn
    }

    /// The empty polygon: no vertices, zero area, centroid at the origin.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            area: 0.0,
            centroid: Point2::origin(),
        }
    }

    /// Closed vertex ring, first vertex repeated at the end.
    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[must_use]
    pub fn centroid(&self) -> Point2 {
        self.centroid
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` for a closed, non-degenerate, non-self-intersecting ring.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 4 && self.area > TOLERANCE && !ring_self_intersects(&self.vertices)
    }

    // --- Containment ---

    /// Strict interior containment.
    #[must_use]
    pub fn is_inside(&self, point: &Point2) -> bool {
        classify_point_in_ring(point, &self.vertices) == RingPosition::Inside
    }

    /// On the boundary but not in the interior.
    #[must_use]
    pub fn is_on_edge(&self, point: &Point2) -> bool {
        classify_point_in_ring(point, &self.vertices) == RingPosition::OnBoundary
    }

    /// Interior or boundary containment.
    #[must_use]
    pub fn is_covered(&self, point: &Point2) -> bool {
        classify_point_in_ring(point, &self.vertices) != RingPosition::Outside
    }

    /// Same as [`Polygon::is_covered`]; the boundary test already uses the
    /// global tolerance.
    #[must_use]
    pub fn is_bounded_by(&self, point: &Point2, _toler: f64) -> bool {
        self.is_covered(point)
    }

    // --- Intersections ---

    /// Crossings of an infinite line with the polygon's edges.
    ///
    /// Edges parallel to the line contribute nothing.
    #[must_use]
    pub fn intersections_with_line(&self, line: &Line2) -> Vec<Point2> {
        self.edges()
            .iter()
            .filter_map(|edge| {
                let (_, u) = line_line_intersect_2d(
                    line.origin(),
                    line.direction(),
                    edge.pt_a(),
                    &edge.direction(),
                )?;
                is_unit_param(u).then(|| edge.pt_a() + edge.direction() * u)
            })
            .collect()
    }

    /// Crossings of a bounded segment with the polygon's edges.
    #[must_use]
    pub fn intersections_with_segment(&self, segment: &LineSegment2) -> Vec<Point2> {
        let r1 = segment.direction();
        self.edges()
            .iter()
            .filter_map(|edge| {
                let (t, u) =
                    line_line_intersect_2d(segment.pt_a(), &r1, edge.pt_a(), &edge.direction())?;
                (is_unit_param(t) && is_unit_param(u)).then(|| segment.pt_a() + r1 * t)
            })
            .collect()
    }

    /// Closest point on the boundary to `point`.
    ///
    /// Edge interiors are checked by orthogonal projection and vertices
    /// directly, so corners are found too. Returns `point` itself for an
    /// empty polygon.
    #[must_use]
    pub fn nearest_intersect(&self, point: &Point2) -> Point2 {
        let mut nearest = *point;
        let mut min_dist_sqr = f64::INFINITY;

        for edge in self.edges() {
            let Some((foot, t)) = project_onto_line(point, edge.pt_a(), edge.pt_b()) else {
                continue;
            };
            if !is_unit_param(t) {
                continue;
            }
            let dist_sqr = (point - foot).norm_squared();
            if dist_sqr < min_dist_sqr {
                min_dist_sqr = dist_sqr;
                nearest = foot;
            }
        }

        for vertex in &self.vertices {
            let dist_sqr = (point - vertex).norm_squared();
            if dist_sqr < min_dist_sqr {
                min_dist_sqr = dist_sqr;
                nearest = *vertex;
            }
        }

        nearest
    }

    /// Edge whose interior is closest to `point` by orthogonal projection.
    ///
    /// Falls back to an edge incident to the nearest vertex when no
    /// projection lands inside an edge.
    #[must_use]
    pub fn nearest_edge(&self, point: &Point2) -> Option<LineSegment2> {
        let edges = self.edges();
        let mut nearest = None;
        let mut min_dist_sqr = f64::INFINITY;

        for edge in &edges {
            let Some((foot, t)) = project_onto_line(point, edge.pt_a(), edge.pt_b()) else {
                continue;
            };
            if !is_unit_param(t) {
                continue;
            }
            let dist_sqr = (point - foot).norm_squared();
            if dist_sqr < min_dist_sqr {
                min_dist_sqr = dist_sqr;
                nearest = Some(*edge);
            }
        }

        for edge in &edges {
            let dist_sqr = (point - edge.pt_a()).norm_squared();
            if dist_sqr < min_dist_sqr {
                min_dist_sqr = dist_sqr;
                nearest = Some(*edge);
            }
        }

        nearest
    }

    /// Returns `true` if the two regions share any point.
    #[must_use]
    pub fn intersects(&self, shape: &impl Shape2D) -> bool {
        if self.is_empty() {
            return false;
        }
        let other = shape.polygonize();
        if other.is_empty() {
            return false;
        }
        self.to_geo().intersects(&other.to_geo())
    }

    // --- Transformations ---

    /// Scales every vertex about the centroid and refreshes area and centroid.
    pub fn scale(&mut self, factor: f64) {
        let c = self.centroid;
        for vtx in &mut self.vertices {
            *vtx = c + (*vtx - c) * factor;
        }
        self.init();
    }

    /// Rotates every vertex about the centroid by `theta` radians.
    ///
    /// Area and the centroid are invariant under this rotation and are not
    /// recomputed.
    pub fn rotate(&mut self, theta: f64) {
        let c = self.centroid;
        for vtx in &mut self.vertices {
            *vtx = c + (*vtx - c).rotate(theta);
        }
    }

    /// Scaled copy; see [`Polygon::scale`].
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let c = self.centroid;
        let verts: Vec<Point2> = self.vertices.iter().map(|v| c + (v - c) * factor).collect();
        Self::new(&verts)
    }

    /// Rotated copy; see [`Polygon::rotate`].
    #[must_use]
    pub fn rotated(&self, theta: f64) -> Self {
        let c = self.centroid;
        let verts: Vec<Point2> = self.vertices.iter().map(|v| c + (v - c).rotate(theta)).collect();
        Self::new(&verts)
    }

    /// Shifts every vertex and the cached centroid by `v`.
    pub fn translate(&mut self, v: &Vector2) {
        for vtx in &mut self.vertices {
            *vtx += v;
        }
        self.centroid += v;
    }

    /// Axis-aligned envelope of the ring. Degenerate at the origin when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb2 {
        let Some(first) = self.vertices.first() else {
            return Aabb2 {
                min: Point2::origin(),
                max: Point2::origin(),
            };
        };
        self.vertices.iter().fold(
            Aabb2 {
                min: *first,
                max: *first,
            },
            |bb, v| Aabb2 {
                min: Point2::new(bb.min.x.min(v.x), bb.min.y.min(v.y)),
                max: Point2::new(bb.max.x.max(v.x), bb.max.y.max(v.y)),
            },
        )
    }

    /// Boundary segments between consecutive ring vertices.
    #[must_use]
    pub fn edges(&self) -> Vec<LineSegment2> {
        self.vertices
            .windows(2)
            .map(|w| LineSegment2::new(w[0], w[1]))
            .collect()
    }

    // --- geo interop ---

    pub(crate) fn to_geo(&self) -> geo::Polygon<f64> {
        let ring: Vec<geo::Coord<f64>> = self
            .vertices
            .iter()
            .map(|p| geo::Coord { x: p.x, y: p.y })
            .collect();
        geo::Polygon::new(geo::LineString::from(ring), vec![])
    }

    pub(crate) fn from_geo(pgn: &geo::Polygon<f64>) -> Self {
        let verts: Vec<Point2> = pgn
            .exterior()
            .coords()
            .map(|c| Point2::new(c.x, c.y))
            .collect();
        Self::new(&verts)
    }

    fn init(&mut self) {
        if self.vertices.is_empty() {
            self.area = 0.0;
            self.centroid = Point2::origin();
            return;
        }
        let signed = signed_area_2d(&self.vertices);
        if signed < 0.0 {
            self.vertices.reverse();
        }
        self.area = signed.abs();
        self.centroid = ring_centroid(&self.vertices);
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::empty()
    }
}

impl Shape2D for Polygon {
    fn centroid(&self) -> Point2 {
        self.centroid
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn is_inside(&self, point: &Point2) -> bool {
        Polygon::is_inside(self, point)
    }

    fn is_covered(&self, point: &Point2) -> bool {
        Polygon::is_covered(self, point)
    }

    fn polygonize(&self) -> Polygon {
        self.clone()
    }
}

impl AddAssign<Vector2> for Polygon {
    fn add_assign(&mut self, rhs: Vector2) {
        self.translate(&rhs);
    }
}

impl SubAssign<Vector2> for Polygon {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.translate(&-rhs);
    }
}

impl Add<Vector2> for Polygon {
    type Output = Polygon;

    fn add(mut self, rhs: Vector2) -> Polygon {
        self += rhs;
        self
    }
}

impl Sub<Vector2> for Polygon {
    type Output = Polygon;

    fn sub(mut self, rhs: Vector2) -> Polygon {
        self -= rhs;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::Circle;

    fn square(half: f64) -> Polygon {
        Polygon::new(&[
            Point2::new(-half, -half),
            Point2::new(half, -half),
            Point2::new(half, half),
            Point2::new(-half, half),
        ])
    }

    #[test]
    fn construction_closes_and_orients_ring() {
        let cw = Polygon::new(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        assert_eq!(cw.vertices().len(), 5);
        assert_eq!(cw.vertices().first(), cw.vertices().last());
        assert!(signed_area_2d(cw.vertices()) > 0.0);
        assert_abs_diff_eq!(cw.area(), 1.0);
        assert_abs_diff_eq!(cw.centroid().x, 0.5);
        assert!(cw.is_valid());
    }

    #[test]
    fn empty_polygon_defaults() {
        let pgn = Polygon::empty();
        assert!(pgn.is_empty());
        assert!(!pgn.is_valid());
        assert_abs_diff_eq!(pgn.area(), 0.0);
        assert_eq!(pgn.centroid(), Point2::origin());
        assert!(pgn.edges().is_empty());
        assert_eq!(pgn.nearest_intersect(&Point2::new(1.0, 2.0)), Point2::new(1.0, 2.0));
        assert!(pgn.nearest_edge(&Point2::new(1.0, 2.0)).is_none());
    }

    #[test]
    fn interior_point_and_edge_midpoint() {
        let hexagon = Circle::new(Point2::new(0.3, -0.2), 2.0).polygonize_with(6);
        let inside = Point2::new(0.5, 0.1);
        assert!(hexagon.is_inside(&inside));
        assert!(!hexagon.is_on_edge(&inside));
        assert!(hexagon.is_covered(&inside));

        for edge in hexagon.edges() {
            let mid = edge.midpoint();
            assert!(hexagon.is_on_edge(&mid));
            assert!(!hexagon.is_inside(&mid));
            assert!(hexagon.is_covered(&mid));
        }

        let outside = Point2::new(5.0, 5.0);
        assert!(!hexagon.is_covered(&outside));
    }

    #[test]
    fn line_crossings() {
        let sq = square(1.0);
        let line = Line2::new(Point2::new(0.0, 0.5), Vector2::new(1.0, 0.0)).unwrap();
        let mut hits = sq.intersections_with_line(&line);
        hits.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hits[1].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn segment_crossings_respect_both_ranges() {
        let sq = square(1.0);
        let seg = LineSegment2::new(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0));
        let hits = sq.intersections_with_segment(&seg);
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 1.0, epsilon = 1e-12);

        let short = LineSegment2::new(Point2::new(0.0, 0.0), Point2::new(0.5, 0.0));
        assert!(sq.intersections_with_segment(&short).is_empty());
    }

    #[test]
    fn parallel_edges_do_not_produce_crossings() {
        let sq = square(1.0);
        // Runs along the top edge.
        let line = Line2::new(Point2::new(-5.0, 1.0), Vector2::new(1.0, 0.0)).unwrap();
        let hits = sq.intersections_with_line(&line);
        assert!(hits.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!(hits.iter().all(|p| (p.y - 1.0).abs() < 1e-12));
    }

    #[test]
    fn nearest_point_on_edge_and_corner() {
        let sq = square(1.0);
        let on_edge = sq.nearest_intersect(&Point2::new(3.0, 0.2));
        assert_abs_diff_eq!(on_edge.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(on_edge.y, 0.2, epsilon = 1e-12);

        let corner = sq.nearest_intersect(&Point2::new(2.0, 3.0));
        assert_abs_diff_eq!(corner.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corner.y, 1.0, epsilon = 1e-12);

        let edge = sq.nearest_edge(&Point2::new(0.1, -4.0)).unwrap();
        assert_abs_diff_eq!(edge.midpoint().y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn overlap_predicate() {
        let a = square(1.0);
        let b = square(1.0) + Vector2::new(1.5, 0.0);
        let c = square(1.0) + Vector2::new(5.0, 0.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&Circle::new(Point2::new(1.8, 0.0), 1.0)));
    }

    #[test]
    fn scale_recomputes_area() {
        let mut sq = square(1.0);
        sq.scale(2.0);
        assert_abs_diff_eq!(sq.area(), 16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sq.centroid().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(square(1.0).scaled(0.5).area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_keeps_cached_attributes() {
        let mut sq = square(1.0) + Vector2::new(2.0, 1.0);
        let before = (sq.area(), sq.centroid());
        sq.rotate(FRAC_PI_2);
        assert_eq!((sq.area(), sq.centroid()), before);
        assert!(sq.is_on_edge(&Point2::new(3.0, 1.0)));

        let copy = square(1.0).rotated(0.25);
        assert_abs_diff_eq!(copy.area(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn translation_moves_centroid() {
        let mut sq = square(1.0);
        sq += Vector2::new(1.0, 2.0);
        assert_abs_diff_eq!(sq.centroid().x, 1.0);
        assert_abs_diff_eq!(sq.centroid().y, 2.0);
        sq -= Vector2::new(1.0, 2.0);
        assert_abs_diff_eq!(sq.centroid().x, 0.0);
        let bb = sq.bounding_box();
        assert_eq!(bb.min, Point2::new(-1.0, -1.0));
        assert_eq!(bb.max, Point2::new(1.0, 1.0));
        assert!(bb.contains(&Point2::new(1.0, 0.0)));
    }

    #[test]
    fn edges_follow_ring_without_extra_wrap() {
        let sq = square(1.0);
        let edges = sq.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].pt_b(), edges[0].pt_a());
    }
}
