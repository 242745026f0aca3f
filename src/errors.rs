//! Error types for simulation requests and driver grid loading.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification surfaced to callers across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidInput,
    EmptyInput,
}

/// Failures of a simulation or summary request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("unknown driver '{0}'")]
    UnknownDriver(String),

    #[error("number of simulations must be between 1 and {max}, got {got}")]
    InvalidSimulationCount { got: i64, max: u32 },

    #[error("initial position must be between 1 and {field_size}, got {got}")]
    InvalidPosition { got: i64, field_size: usize },

    #[error("invalid driver data: {0}")]
    InvalidDriverData(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("no finishing positions to summarize")]
    EmptyInput,
}

impl SimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::EmptyInput => ErrorKind::EmptyInput,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// Structured error body returned to external callers.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SimError> for ErrorBody {
    fn from(err: &SimError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Failures while loading a driver grid file.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to read driver grid {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse driver grid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid driver grid: {0}")]
    Invalid(String),
}
