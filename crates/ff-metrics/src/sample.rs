//! Step state snapshots.

use serde::Serialize;

/// Immutable snapshot of the wrapper's tracked variables after one
/// completed communication step.
///
/// Ownership transfers to the channel on push and to the exporter on pop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepSample {
    pub time_s: f64,
    pub input: f64,
    pub output: f64,
    pub gain: f64,
}
