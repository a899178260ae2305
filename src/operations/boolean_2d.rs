use geo::BooleanOps;

use crate::error::{GeometryError, Result};
use crate::geometry::Polygon;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Intersect,
    Subtract,
}

impl BooleanOp {
    fn name(self) -> &'static str {
        match self {
            Self::Intersect => "intersection",
            Self::Subtract => "difference",
        }
    }
}

/// Region shared by `pgn_a` and `pgn_b`.
///
/// # Errors
///
/// Returns [`GeometryError::MultipleRegions`] if the overlap is made of more
/// than one disjoint piece, or [`GeometryError::MultiplyConnected`] if the
/// single piece has holes.
pub fn intersection_polygon(pgn_a: &Polygon, pgn_b: &Polygon) -> Result<Polygon> {
    boolean_2d(pgn_a, pgn_b, BooleanOp::Intersect)
}

/// Region of `pgn_a` not covered by `pgn_b`.
///
/// # Errors
///
/// Same topology restrictions as [`intersection_polygon`]. In particular a
/// `pgn_b` strictly inside `pgn_a` leaves a hole and is rejected.
pub fn difference(pgn_a: &Polygon, pgn_b: &Polygon) -> Result<Polygon> {
    boolean_2d(pgn_a, pgn_b, BooleanOp::Subtract)
}

/// Executes a boolean operation and reduces the output to one polygon.
///
/// # Errors
///
/// See [`intersection_polygon`].
pub fn boolean_2d(pgn_a: &Polygon, pgn_b: &Polygon, op: BooleanOp) -> Result<Polygon> {
    if pgn_a.is_empty() {
        return Ok(Polygon::empty());
    }
    if pgn_b.is_empty() {
        return Ok(match op {
            BooleanOp::Intersect => Polygon::empty(),
            BooleanOp::Subtract => pgn_a.clone(),
        });
    }

    let (a, b) = (pgn_a.to_geo(), pgn_b.to_geo());
    let result = match op {
        BooleanOp::Intersect => a.intersection(&b),
        BooleanOp::Subtract => a.difference(&b),
    };

    match result.0.as_slice() {
        [] => Ok(Polygon::empty()),
        [single] => {
            if !single.interiors().is_empty() {
                return Err(GeometryError::MultiplyConnected {
                    operation: op.name(),
                }
                .into());
            }
            Ok(Polygon::from_geo(single))
        }
        many => Err(GeometryError::MultipleRegions {
            operation: op.name(),
            count: many.len(),
        }
        .into()),
    }
}
