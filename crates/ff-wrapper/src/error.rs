//! Error types for wrapper construction.
//!
//! Steady-state calls report through [`ff_core::Status`] like the standard
//! requires; `Result` is reserved for instantiation, where fail-fast with
//! full cleanup is the policy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapperError {
    #[error("Inner model load failed: {0}")]
    Load(#[from] ff_loader::LoaderError),

    #[error("Fault configuration rejected: {0}")]
    Fault(#[from] ff_fault::FaultError),
}

pub type WrapperResult<T> = Result<T, WrapperError>;
