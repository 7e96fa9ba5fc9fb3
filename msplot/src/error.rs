//! Error types for the msplot command line tool.

use std::path::PathBuf;

use msgauss::error::ReconstructionError;
use thiserror::Error;

/// Result type alias for msplot operations.
pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}:{line}: cannot read a stick from {content:?}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("two inputs would both be written to {}", path.display())]
    OutputCollision { path: PathBuf },

    #[error("no input: pass stick files or --averagine-mass")]
    NoInput,

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),
}

impl PlotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, content: impl Into<String>) -> Self {
        Self::Parse { path: path.into(), line, content: content.into() }
    }
}
