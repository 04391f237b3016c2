//! Error types for fault configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered while loading or validating a fault specification.
#[derive(Error, Debug)]
pub enum FaultError {
    #[error("Failed to read fault config: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse fault config: {path}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid fault window: start {start_s} > end {end_s}")]
    InvalidWindow { start_s: f64, end_s: f64 },

    #[error("Non-finite fault parameter: {what}")]
    NonFinite { what: &'static str },
}

pub type FaultResult<T> = Result<T, FaultError>;
