use crate::shape::Shape;

/// All errors raised by the grid types.
///
/// Grids are plain owned buffers, so the failure modes are limited to shape
/// bookkeeping: a buffer that does not fill its shape, an operation that
/// needs a particular rank, or an index / window that falls outside the grid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two grids that must agree in shape do not.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Operation requires a specific rank (number of dimensions).
    #[error("rank mismatch: expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// Element count mismatch when creating from a vec.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Element index or crop window outside the grid.
    #[error("index {index:?} out of bounds for shape {shape}")]
    OutOfBounds { index: Vec<usize>, shape: Shape },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout flowkit.
pub type Result<T> = std::result::Result<T, Error>;

