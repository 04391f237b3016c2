//! Lifecycle state machine shared with the inner model.
//!
//! The inner model mirrors the wrapper's state 1:1 because every transition
//! is forwarded before it is recorded.

use core::fmt;

/// `Instantiated → InitializationMode → StepMode → Terminated`, with free
/// allowed from any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Instantiated,
    InitializationMode,
    StepMode,
    Terminated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Instantiated => "instantiated",
            LifecycleState::InitializationMode => "initialization-mode",
            LifecycleState::StepMode => "step-mode",
            LifecycleState::Terminated => "terminated",
        };
        write!(f, "{name}")
    }
}
