//! The wrapper instance: aggregate root of faultflow.
//!
//! Composes the dynamic loader, the fault engine, and the metrics pipeline
//! behind the standardized co-simulation lifecycle:
//!
//! - every forwarded call goes through the typed [`ff_core::ModelApi`] seam,
//!   so the inner model can be the dlopen-backed amplifier or a pure-Rust
//!   stand-in in tests
//! - `do_step` perturbs the forwarded input per the instance's fault spec
//!   and emits one metrics sample per completed step
//! - `free_instance` tears down in a fixed order: close the sample channel,
//!   join the exporter, release the inner instance, unload the image

pub mod error;
pub mod instance;
pub mod lifecycle;

pub use error::{WrapperError, WrapperResult};
pub use instance::{WrapperConfig, WrapperInstance, DEFAULT_GAIN};
pub use lifecycle::LifecycleState;
