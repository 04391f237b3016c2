//! ff-core: stable foundation for faultflow.
//!
//! Contains:
//! - status (FMI 2.0 status codes with raw round-trip)
//! - vars (value references for the wrapper's exposed variables)
//! - model (the capability trait every inner-model backend implements)

pub mod model;
pub mod status;
pub mod vars;

// Re-exports: nice ergonomics for downstream crates
pub use model::ModelApi;
pub use status::Status;
pub use vars::{ValueRef, VR_GAIN, VR_INPUT, VR_OUTPUT};
