//! Deterministic fault injection for wrapped model inputs.
//!
//! Provides:
//! - `FaultSpec`: a pure description of when and how one input is perturbed
//! - `injected` / `apply_to`: the stateless injection engine
//! - `load_fault_config`: optional `fault.json` override shipped with the
//!   model bundle, falling back to the compiled-in default

pub mod config;
pub mod engine;
pub mod error;
pub mod spec;

pub use config::load_fault_config;
pub use engine::{apply_to, injected};
pub use error::{FaultError, FaultResult};
pub use spec::{FaultKind, FaultSpec, FaultWindow};
