pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Planar operations on [`Vector2`] that nalgebra does not provide directly.
pub trait Vector2Ext {
    /// Scalar (z-component) cross product `self.x * other.y - self.y * other.x`.
    fn cross2(&self, other: &Vector2) -> f64;

    /// Right-hand normal `(y, -x)` with the same magnitude.
    ///
    /// For a counter-clockwise ring this points out of the enclosed region.
    fn normal_vec(&self) -> Vector2;

    /// Counter-clockwise rotation by `theta` radians.
    fn rotate(&self, theta: f64) -> Vector2;

    /// Unit vector in the same direction, or zero for a zero-length vector.
    fn unit_vec(&self) -> Vector2;
}

impl Vector2Ext for Vector2 {
    fn cross2(&self, other: &Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn normal_vec(&self) -> Vector2 {
        Vector2::new(self.y, -self.x)
    }

    fn rotate(&self, theta: f64) -> Vector2 {
        let (sin, cos) = theta.sin_cos();
        Vector2::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }

    fn unit_vec(&self) -> Vector2 {
        let len = self.norm();
        if len < TOLERANCE {
            Vector2::zeros()
        } else {
            self / len
        }
    }
}

/// Polar angle of `v` normalized into `[0, 2π)`.
#[must_use]
pub fn polar_angle(v: &Vector2) -> f64 {
    let theta = v.y.atan2(v.x);
    if theta < 0.0 {
        theta + 2.0 * std::f64::consts::PI
    } else {
        theta
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn cross_of_axes() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert_abs_diff_eq!(x.cross2(&y), 1.0);
        assert_abs_diff_eq!(y.cross2(&x), -1.0);
    }

    #[test]
    fn normal_is_right_hand() {
        let n = Vector2::new(1.0, 0.0).normal_vec();
        assert_abs_diff_eq!(n.x, 0.0);
        assert_abs_diff_eq!(n.y, -1.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = Vector2::new(2.0, 0.0).rotate(FRAC_PI_2);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_vec_of_zero_is_zero() {
        assert_eq!(Vector2::zeros().unit_vec(), Vector2::zeros());
        assert_abs_diff_eq!(Vector2::new(3.0, 4.0).unit_vec().norm(), 1.0);
    }

    #[test]
    fn polar_angle_wraps_negative_half() {
        assert_abs_diff_eq!(polar_angle(&Vector2::new(1.0, 0.0)), 0.0);
        assert_abs_diff_eq!(polar_angle(&Vector2::new(-1.0, 0.0)), PI);
        assert_abs_diff_eq!(polar_angle(&Vector2::new(0.0, -1.0)), 1.5 * PI);
    }
}
