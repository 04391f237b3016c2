//! Error types for the metrics pipeline.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors confined to the exporter side of the pipeline.
///
/// The producer side has no failure mode by design.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Failed to bind metrics endpoint {addr}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Metrics endpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
