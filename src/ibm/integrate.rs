//! Surface traction samples and their integration around a body.

use crate::math::{polar_angle, Point2, Vector2, Vector2Ext};
use crate::parallel::Communicator;

/// A traction value extrapolated to a point on the contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySample {
    pub point: Point2,
    pub value: f64,
}

impl BoundarySample {
    #[must_use]
    pub fn new(point: Point2, value: f64) -> Self {
        Self { point, value }
    }
}

/// Which component of the surface traction a sample set carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traction {
    /// Normal pressure, acting against the outward normal.
    Pressure,
    /// Shear stress on the x component.
    ShearX,
    /// Shear stress on the y component.
    ShearY,
}

/// Collects the samples of every rank.
pub fn gather_samples<C: Communicator>(comm: &C, local: Vec<BoundarySample>) -> Vec<BoundarySample> {
    comm.all_gather_v(local)
}

/// Orders samples counter-clockwise by polar angle about `center`.
///
/// Equal angles fall back to x, y and finally the value, so the order never
/// depends on the order samples arrived in.
pub fn sort_by_angle(samples: &mut [BoundarySample], center: &Point2) {
    samples.sort_by(|a, b| {
        let ta = polar_angle(&(a.point - center));
        let tb = polar_angle(&(b.point - center));
        ta.total_cmp(&tb)
            .then(a.point.x.total_cmp(&b.point.x))
            .then(a.point.y.total_cmp(&b.point.y))
            .then(a.value.total_cmp(&b.value))
    });
}

/// Integrates sorted samples around the closed ring they form.
///
/// Each pair of consecutive samples, last to first included, spans one
/// panel with the trapezoidal average of its end values. Returns the force
/// and the torque about `center`. Fewer than two samples give zero.
#[must_use]
pub fn integrate_ring(samples: &[BoundarySample], center: &Point2, traction: Traction) -> (Vector2, f64) {
    let mut force = Vector2::zeros();
    let mut torque = 0.0;
    if samples.len() < 2 {
        return (force, torque);
    }

    for (i, a) in samples.iter().enumerate() {
        let b = &samples[(i + 1) % samples.len()];
        let sf = (b.point - a.point).normal_vec();
        let xc = nalgebra::center(&a.point, &b.point);
        let avg = 0.5 * (a.value + b.value);

        let df = match traction {
            Traction::Pressure => -avg * sf,
            Traction::ShearX => Vector2::new(-avg * sf.y, 0.0),
            Traction::ShearY => Vector2::new(0.0, -avg * sf.x),
        };
        force += df;
        torque += df.cross2(&(xc - center));
    }

    (force, torque)
}
