//! The stateless injection engine.
//!
//! Pure functions of (nominal value, time, spec); the engine holds no
//! per-call state and never stores a side effect.

use ff_core::ValueRef;

use crate::spec::{FaultKind, FaultSpec};

/// Value forwarded to the inner model for the spec's target variable.
///
/// Outside the fault window the nominal value passes through unchanged.
pub fn injected(nominal: f64, time_s: f64, spec: &FaultSpec) -> f64 {
    if !spec.window.contains(time_s) {
        return nominal;
    }
    match spec.kind {
        FaultKind::Offset { value } => nominal + value,
        FaultKind::StuckAt { value } => value,
        FaultKind::Scale { factor } => nominal * factor,
    }
}

/// Apply the spec to one variable: only the designated target is perturbed,
/// every other reference passes through unmodified.
pub fn apply_to(vr: ValueRef, nominal: f64, time_s: f64, spec: &FaultSpec) -> f64 {
    if vr == spec.target {
        injected(nominal, time_s, spec)
    } else {
        nominal
    }
}
