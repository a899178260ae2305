use super::{Point2, Vector2, Vector2Ext, TOLERANCE};

/// Parameters `(t, u)` where `p1 + t * d1` meets `p2 + u * d2`.
///
/// `None` when the directions are parallel or either is zero. Parallelism is
/// judged relative to the direction lengths so short contour edges still
/// intersect.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.cross2(d2);
    if cross.abs() <= TOLERANCE * d1.norm() * d2.norm() || cross.abs() < f64::MIN_POSITIVE {
        return None;
    }
    let dr = p2 - p1;
    let t = dr.cross2(d2) / cross;
    let u = dr.cross2(d1) / cross;
    Some((t, u))
}

/// Returns `true` if `t` lies in `[0, 1]` within tolerance.
#[must_use]
pub fn is_unit_param(t: f64) -> bool {
    (-TOLERANCE..=1.0 + TOLERANCE).contains(&t)
}

/// Crossing of segments `a0 → a1` and `b0 → b1`.
///
/// Returns the point and both parameters, clamped into `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    if is_unit_param(t) && is_unit_param(u) {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Orthogonal projection of `point` onto the infinite line through `a` and `b`.
///
/// Returns the foot and its parameter along `a → b`, or `None` for a
/// zero-length segment.
#[must_use]
pub fn project_onto_line(point: &Point2, a: &Point2, b: &Point2) -> Option<(Point2, f64)> {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }
    let t = (point - a).dot(&d) / len_sq;
    Some((a + d * t, t))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn grid_link_meets_contour_edge() {
        // Horizontal link between two cell centroids and a slanted edge.
        let xc = Point2::new(0.125, 0.375);
        let link = Vector2::new(0.25, 0.0);
        let (t, u) = line_line_intersect_2d(
            &xc,
            &link,
            &Point2::new(0.2, 0.0),
            &Vector2::new(0.1, 1.0),
        )
        .unwrap();
        assert_abs_diff_eq!(t, 0.45, epsilon = 1e-12);
        assert_abs_diff_eq!(u, 0.375, epsilon = 1e-12);
    }

    #[test]
    fn short_edges_are_not_parallel() {
        let p = Point2::origin();
        let long = Vector2::new(1.0, 0.0);
        let short = Vector2::new(1e-7, 1e-7);
        assert!(line_line_intersect_2d(&p, &long, &p, &short).is_some());
        assert!(line_line_intersect_2d(&p, &long, &p, &(long * 3.0)).is_none());
        assert!(line_line_intersect_2d(&p, &Vector2::zeros(), &p, &long).is_none());
    }

    #[test]
    fn segments_touching_at_endpoint() {
        let (pt, t, u) = segment_segment_intersect_2d(
            &Point2::new(-1.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(1.0, 2.0),
        )
        .unwrap();
        assert_abs_diff_eq!(pt.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t, 1.0);
        assert_abs_diff_eq!(u, 0.0);
    }

    #[test]
    fn segments_missing_each_other() {
        assert!(segment_segment_intersect_2d(
            &Point2::origin(),
            &Point2::new(1.0, 1.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(1.5, 0.9),
        )
        .is_none());
    }

    #[test]
    fn foot_of_perpendicular() {
        let (foot, t) =
            project_onto_line(&Point2::new(-1.0, 2.0), &Point2::new(0.0, 0.0), &Point2::new(0.0, 4.0))
                .unwrap();
        assert_abs_diff_eq!(foot.x, 0.0);
        assert_abs_diff_eq!(foot.y, 2.0);
        assert_abs_diff_eq!(t, 0.5);
        assert!(project_onto_line(&foot, &foot, &foot).is_none());
    }
}
