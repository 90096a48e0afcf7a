use thiserror::Error;

/// Top-level error type for the plangeo kernel.
///
/// Queries that merely have no geometric solution (parallel lines, a point
/// inside a circle asking for tangents, ...) never produce an error; they
/// return an empty `Vec` or `None`. Errors are reserved for invalid input,
/// broken invariants and iterative solvers that fail to converge.
#[derive(Debug, Error)]
pub enum PlangeoError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to primitive construction and invariants.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
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

    #[error("invalid nurbs curve: {0}")]
    InvalidNurbs(String),
}

/// Errors raised by the numeric toolbox.
#[derive(Debug, Error)]
pub enum NumericError {
    #[error("iteration did not converge after {iterations} steps")]
    NotConverged { iterations: usize },

    #[error("derivative vanished during iteration")]
    SingularDerivative,

    #[error("invalid numeric input: {0}")]
    InvalidInput(String),
}

/// Errors related to multi-step curve operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`PlangeoError`].
pub type Result<T> = std::result::Result<T, PlangeoError>;
