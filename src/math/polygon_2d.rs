use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2Ext, TOLERANCE};

/// Position of a point relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPosition {
    Inside,
    Outside,
    OnBoundary,
}

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. Works for rings
/// with or without a repeated closing vertex.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area centroid of a ring.
///
/// Falls back to the vertex average when the ring has (near) zero area.
#[must_use]
pub fn ring_centroid(points: &[Point2]) -> Point2 {
    let n = points.len();
    if n == 0 {
        return Point2::origin();
    }
    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        let sum = points.iter().fold(Point2::origin().coords, |acc, p| acc + p.coords);
        #[allow(clippy::cast_precision_loss)]
        return Point2::from(sum / n as f64);
    }
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let w = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    Point2::new(cx / (6.0 * area), cy / (6.0 * area))
}

/// Returns `true` if `p` lies on segment `a → b` within tolerance.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return (p - a).norm() < TOLERANCE;
    }
    if (p - a).cross2(&d).abs() > TOLERANCE * len.max(1.0) {
        return false;
    }
    let t = (p - a).dot(&d) / (len * len);
    (-TOLERANCE..=1.0 + TOLERANCE).contains(&t)
}

/// Classifies `p` against a closed ring (first == last) by crossing number.
///
/// The boundary is checked first so points on an edge or vertex are never
/// reported as inside or outside.
#[must_use]
pub fn classify_point_in_ring(p: &Point2, ring: &[Point2]) -> RingPosition {
    if ring.len() < 4 {
        return RingPosition::Outside;
    }
    for w in ring.windows(2) {
        if point_on_segment(p, &w[0], &w[1]) {
            return RingPosition::OnBoundary;
        }
    }

    let mut inside = false;
    for w in ring.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        RingPosition::Inside
    } else {
        RingPosition::Outside
    }
}

/// Returns `true` if any two non-adjacent edges of the closed ring cross.
#[must_use]
pub fn ring_self_intersects(ring: &[Point2]) -> bool {
    let m = ring.len().saturating_sub(1);
    for i in 0..m {
        for j in (i + 1)..m {
            let adjacent = j == i + 1 || (i == 0 && j == m - 1);
            if adjacent {
                continue;
            }
            if segment_segment_intersect_2d(&ring[i], &ring[i + 1], &ring[j], &ring[j + 1])
                .is_some()
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_abs_diff_eq!(signed_area_2d(&unit_square()), 1.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert_abs_diff_eq!(signed_area_2d(&pts), -1.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert_abs_diff_eq!(signed_area_2d(&[Point2::new(0.0, 0.0)]), 0.0);
        assert_abs_diff_eq!(signed_area_2d(&[]), 0.0);
    }

    #[test]
    fn centroid_of_offset_rectangle() {
        let pts = vec![
            Point2::new(1.0, 1.0),
            Point2::new(5.0, 1.0),
            Point2::new(5.0, 3.0),
            Point2::new(1.0, 3.0),
            Point2::new(1.0, 1.0),
        ];
        let c = ring_centroid(&pts);
        assert_abs_diff_eq!(c.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn classify_inside_outside_boundary() {
        let sq = unit_square();
        assert_eq!(classify_point_in_ring(&Point2::new(0.5, 0.5), &sq), RingPosition::Inside);
        assert_eq!(classify_point_in_ring(&Point2::new(1.5, 0.5), &sq), RingPosition::Outside);
        assert_eq!(classify_point_in_ring(&Point2::new(1.0, 0.5), &sq), RingPosition::OnBoundary);
        assert_eq!(classify_point_in_ring(&Point2::new(0.0, 0.0), &sq), RingPosition::OnBoundary);
    }

    #[test]
    fn bow_tie_self_intersects() {
        let bow = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        assert!(ring_self_intersects(&bow));
        assert!(!ring_self_intersects(&unit_square()));
    }
}
