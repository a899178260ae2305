use thiserror::Error;

use crate::ibm::BoundaryKind;

/// Top-level error type for the immersed-boundary subsystem.
#[derive(Debug, Error)]
pub enum IbmError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{operation} produced {count} disjoint polygons, expected at most one")]
    MultipleRegions {
        operation: &'static str,
        count: usize,
    },

    #[error("{operation} produced a polygon with interior rings")]
    MultiplyConnected { operation: &'static str },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while synthesizing boundary-condition equations.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("{kind:?} boundaries are not supported by {operation}, only fixed boundaries are")]
    Unsupported {
        kind: BoundaryKind,
        operation: &'static str,
    },

    #[error("no boundary condition configured for field \"{0}\"")]
    NotConfigured(String),

    #[error("reference value for field \"{field}\" is not a {expected}")]
    RefValueMismatch {
        field: String,
        expected: &'static str,
    },
}

/// Errors from the interpolation and extrapolation stencils.
#[derive(Debug, Error)]
pub enum NumericError {
    #[error("singular extrapolation stencil at cell {cell}")]
    SingularStencil { cell: usize },

    #[error("boundary sampling failed on rank {rank}")]
    RankFailed { rank: usize },
}

/// Errors in immersed-boundary configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Convenience type alias for results using [`IbmError`].
pub type Result<T> = std::result::Result<T, IbmError>;
