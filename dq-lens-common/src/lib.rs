pub mod config;
pub use config::{Config, ExportConfig, ProfileConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DqLensError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("read failure: {0}")]
    Read(String),
    #[error("computation failure on column '{column}': {reason}")]
    Computation { column: String, reason: String },
    #[error("config error: {0}")]
    Config(String),
}

/// coarse error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    ReadFailure,
    ComputationFailure,
    Config,
}

impl DqLensError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DqLensError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            DqLensError::Io(_)
            | DqLensError::Parquet(_)
            | DqLensError::Arrow(_)
            | DqLensError::Read(_) => ErrorKind::ReadFailure,
            DqLensError::Computation { .. } | DqLensError::Serialize(_) => {
                ErrorKind::ComputationFailure
            }
            DqLensError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn computation(column: &str, reason: impl std::fmt::Display) -> Self {
        DqLensError::Computation {
            column: column.to_owned(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DqLensError>;
