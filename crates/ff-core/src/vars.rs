//! Value references for the wrapper's exposed variables.
//!
//! The wrapper and the inner amplifier use the same three references, which
//! keeps the forwarding in the adapter a straight passthrough.

/// Small-integer identifier for one exposed model variable.
pub type ValueRef = u32;

/// Input signal `u`.
pub const VR_INPUT: ValueRef = 0;
/// Computed output `y` (read-only).
pub const VR_OUTPUT: ValueRef = 1;
/// Gain parameter `k`.
pub const VR_GAIN: ValueRef = 2;
