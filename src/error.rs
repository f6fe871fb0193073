use thiserror::Error;

/// Top-level error type for level geometry derivation.
#[derive(Debug, Error)]
pub enum ChambersError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised by the primitive geometry routines.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max})")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while resolving or sequencing a room/corridor layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("room has no branches")]
    EmptyRoom,

    #[error("room has {branches} branches but {connections} connections")]
    BranchMismatch { branches: usize, connections: usize },

    #[error("corridor width must be positive and finite, got {0}")]
    InvalidWidth(f64),
}

/// Convenience type alias for results using [`ChambersError`].
pub type Result<T> = std::result::Result<T, ChambersError>;
