//! Capability trait for an instantiated inner model.
//!
//! One method per forwarded operation, replacing raw symbol-name lookup with
//! a typed contract. The dlopen-backed backend lives in `ff-loader`; tests
//! substitute pure-Rust stubs.

use crate::status::Status;
use crate::vars::ValueRef;

/// An instantiated co-simulation model instance.
///
/// Every method maps 1:1 onto an FMI 2.0 entry point and returns the
/// model's own status verbatim. Implementations own the instance for their
/// whole lifetime and release it on drop.
pub trait ModelApi {
    /// Forward experiment setup. `tolerance` and `stop_time` are optional in
    /// the standard (defined-flag + value pairs on the wire).
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Status;

    fn enter_initialization_mode(&mut self) -> Status;

    fn exit_initialization_mode(&mut self) -> Status;

    /// Read real variables by reference into `values`.
    ///
    /// `refs` and `values` must have equal length.
    fn get_real(&mut self, refs: &[ValueRef], values: &mut [f64]) -> Status;

    /// Write real variables by reference.
    ///
    /// `refs` and `values` must have equal length.
    fn set_real(&mut self, refs: &[ValueRef], values: &[f64]) -> Status;

    /// Advance one communication step.
    fn do_step(&mut self, current_time: f64, step_size: f64, no_set_prior: bool) -> Status;

    fn terminate(&mut self) -> Status;

    fn reset(&mut self) -> Status;
}
