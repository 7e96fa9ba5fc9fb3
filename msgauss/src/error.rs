//! Error types for the msgauss library.
//!
//! Reconstruction itself never fails: degenerate parameters are normalized and
//! cancellation yields a partial curve. The variants below cover the checked
//! constructors and the parallel batch entry point.

use thiserror::Error;

/// Result type alias for msgauss operations.
pub type ReconstructionResult<T> = Result<T, ReconstructionError>;

/// Errors raised by the checked spectrum constructors and batch reconstruction.
#[derive(Debug, Error)]
pub enum ReconstructionError {
    /// The m/z and intensity arrays of a spectrum differ in length.
    #[error("mz and intensity arrays differ in length ({mz} vs {intensity})")]
    LengthMismatch { mz: usize, intensity: usize },

    /// A stick carries a NaN or infinite coordinate.
    #[error("non-finite value at index {index}: ({x}, {y})")]
    NonFinite { index: usize, x: f64, y: f64 },

    /// The worker pool for batch reconstruction could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ReconstructionError {
    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(mz: usize, intensity: usize) -> Self {
        Self::LengthMismatch { mz, intensity }
    }

    /// Create a non-finite value error.
    #[must_use]
    pub const fn non_finite(index: usize, x: f64, y: f64) -> Self {
        Self::NonFinite { index, x, y }
    }
}
