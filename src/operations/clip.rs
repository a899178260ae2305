use crate::geometry::{Line2, Polygon};
use crate::math::TOLERANCE;

/// Clips `pgn` against a single line, keeping the part below it.
///
/// One Sutherland–Hodgman pass: each ring vertex on the line is kept as is,
/// otherwise it is kept only when below the line; a crossing strictly inside
/// an edge is inserted after the edge's first vertex. Fewer than three
/// distinct surviving vertices give the empty polygon. The input is left
/// untouched.
#[must_use]
pub fn clip_polygon(pgn: &Polygon, line: &Line2) -> Polygon {
    let mut verts = Vec::with_capacity(pgn.vertices().len() + 2);

    for edge in pgn.edges() {
        let (vtx, next_vtx) = (*edge.pt_a(), *edge.pt_b());

        if line.is_approximately_on_line(&vtx) {
            verts.push(vtx);
            continue;
        } else if line.is_below_line(&vtx) {
            verts.push(vtx);
        }

        let Some(edge_line) = edge.to_line() else {
            continue;
        };
        let Some(xc) = Line2::intersection(line, &edge_line) else {
            continue;
        };

        let d = next_vtx - vtx;
        let l = d.norm_squared();
        let x = d.dot(&(xc - vtx));
        let at_endpoint = (xc - vtx).norm() < TOLERANCE || (xc - next_vtx).norm() < TOLERANCE;
        if x > 0.0 && x < l && !at_endpoint {
            verts.push(xc);
        }
    }

    verts.dedup_by(|a, b| (*a - *b).norm() < TOLERANCE);
    let closed = match (verts.first(), verts.last()) {
        (Some(first), Some(last)) => verts.len() > 1 && (first - last).norm() < TOLERANCE,
        _ => false,
    };
    if closed {
        verts.pop();
    }
    if verts.len() < 3 {
        return Polygon::empty();
    }
    Polygon::new(&verts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Circle;
    use crate::math::{Point2, Vector2};

    fn square() -> Polygon {
        Polygon::new(&[
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ])
    }

    #[test]
    fn half_plane_halves_square() {
        let sq = square();
        // Downward direction: the right-hand side is x < 0.
        let line = Line2::new(Point2::origin(), Vector2::new(0.0, -1.0)).unwrap();
        let clipped = clip_polygon(&sq, &line);
        assert_relative_eq!(clipped.area(), 0.5 * sq.area(), max_relative = 1e-12);
        assert!(clipped.vertices().iter().all(|v| v.x <= 1e-12));
        assert_relative_eq!(sq.area(), 4.0);
    }

    #[test]
    fn line_outside_keeps_or_drops_everything() {
        let sq = square();
        let keep_all = Line2::new(Point2::new(5.0, 0.0), Vector2::new(0.0, -1.0)).unwrap();
        assert_relative_eq!(clip_polygon(&sq, &keep_all).area(), 4.0, max_relative = 1e-12);

        let drop_all = Line2::new(Point2::new(-5.0, 0.0), Vector2::new(0.0, -1.0)).unwrap();
        assert!(clip_polygon(&sq, &drop_all).is_empty());
    }

    #[test]
    fn line_through_vertices_is_not_duplicated() {
        let sq = square();
        // Diagonal through (-1, -1) and (1, 1), keeping the lower-right half.
        let diag = Line2::new(Point2::new(-1.0, -1.0), Vector2::new(1.0, 1.0)).unwrap();
        let clipped = clip_polygon(&sq, &diag);
        assert_eq!(clipped.vertices().len(), 4);
        assert_relative_eq!(clipped.area(), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn clipped_circle_segment() {
        let disc = Circle::new(Point2::origin(), 1.0).polygonize_with(256);
        let chord = Line2::new(Point2::new(0.0, 0.5), Vector2::new(1.0, 0.0)).unwrap();
        let cap = clip_polygon(&disc, &chord);
        // Area of the unit disc below y = 0.5.
        let expected = std::f64::consts::PI - (std::f64::consts::PI / 3.0 - 0.75f64.sqrt() / 2.0);
        assert_relative_eq!(cap.area(), expected, max_relative = 1e-3);
    }

    #[test]
    fn touching_a_single_vertex_leaves_nothing() {
        let sq = square();
        // Keeps x + y < -2, which only the corner (-1, -1) reaches.
        let corner = Line2::new(Point2::new(-1.0, -1.0), Vector2::new(1.0, -1.0)).unwrap();
        let clipped = clip_polygon(&sq, &corner);
        assert!(clipped.is_empty());
        assert_relative_eq!(clipped.area(), 0.0);

        // Along an edge: two vertices survive.
        let edge = Line2::new(Point2::new(-1.0, -1.0), Vector2::new(1.0, 0.0)).unwrap();
        assert!(clip_polygon(&sq, &edge).is_empty());
    }
}
