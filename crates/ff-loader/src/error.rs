//! Error types for dynamic model loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, resolving, or instantiating the inner model.
///
/// Every variant implies the loaded image (if any) has already been
/// unloaded; no partial state survives a failure.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Could not load inner model binary: {path}")]
    LibraryLoad {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("Missing required entry point: {name}")]
    MissingSymbol {
        name: &'static str,
        source: libloading::Error,
    },

    #[error("Inner model rejected instantiation as '{name}'")]
    InnerInstantiate { name: String },

    #[error("Invalid instantiation argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type LoaderResult<T> = Result<T, LoaderError>;
