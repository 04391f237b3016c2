//! Fault specification data types.

use ff_core::{ValueRef, VR_INPUT};
use serde::{Deserialize, Serialize};

use crate::error::{FaultError, FaultResult};

/// Half-open time interval `[start_s, end_s)` during which a fault is active.
///
/// The end boundary is excluded: a step landing exactly on `end_s` receives
/// no perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultWindow {
    pub start_s: f64,
    pub end_s: f64,
}

impl FaultWindow {
    pub fn new(start_s: f64, end_s: f64) -> FaultResult<Self> {
        let window = Self { start_s, end_s };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> FaultResult<()> {
        if !self.start_s.is_finite() || !self.end_s.is_finite() {
            return Err(FaultError::NonFinite {
                what: "fault window bound",
            });
        }
        if self.start_s > self.end_s {
            return Err(FaultError::InvalidWindow {
                start_s: self.start_s,
                end_s: self.end_s,
            });
        }
        Ok(())
    }

    /// Membership test for the half-open interval.
    pub fn contains(&self, time_s: f64) -> bool {
        self.start_s <= time_s && time_s < self.end_s
    }
}

/// The perturbation applied inside the window.
///
/// Each variant is one branch of the same pure function; adding a kind never
/// touches the adapter or the loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultKind {
    /// Add a constant offset to the nominal value.
    Offset { value: f64 },
    /// Replace the nominal value entirely.
    StuckAt { value: f64 },
    /// Multiply the nominal value by a constant factor.
    Scale { factor: f64 },
}

impl FaultKind {
    fn validate(&self) -> FaultResult<()> {
        let finite = match self {
            FaultKind::Offset { value } | FaultKind::StuckAt { value } => value.is_finite(),
            FaultKind::Scale { factor } => factor.is_finite(),
        };
        if finite {
            Ok(())
        } else {
            Err(FaultError::NonFinite {
                what: "fault parameter",
            })
        }
    }
}

/// A complete fault description: which variable, when, and how.
///
/// Immutable for the lifetime of a wrapper instance. The compiled-in default
/// matches the demonstration fault the bundle ships with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultSpec {
    /// Value reference of the perturbed variable.
    pub target: ValueRef,
    pub window: FaultWindow,
    #[serde(flatten)]
    pub kind: FaultKind,
}

impl FaultSpec {
    pub fn validate(&self) -> FaultResult<()> {
        self.window.validate()?;
        self.kind.validate()
    }
}

impl Default for FaultSpec {
    /// Offset of +0.5 on the input between t=3s and t=7s.
    fn default() -> Self {
        Self {
            target: VR_INPUT,
            window: FaultWindow {
                start_s: 3.0,
                end_s: 7.0,
            },
            kind: FaultKind::Offset { value: 0.5 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_valid() {
        let spec = FaultSpec::default();
        assert!(spec.validate().is_ok());
        assert_eq!(spec.target, VR_INPUT);
        assert_eq!(spec.window.start_s, 3.0);
        assert_eq!(spec.window.end_s, 7.0);
    }

    #[test]
    fn window_rejects_inverted_bounds() {
        assert!(FaultWindow::new(7.0, 3.0).is_err());
        assert!(FaultWindow::new(3.0, 3.0).is_ok());
    }

    #[test]
    fn window_rejects_non_finite_bounds() {
        assert!(FaultWindow::new(f64::NAN, 1.0).is_err());
        assert!(FaultWindow::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn window_is_half_open() {
        let window = FaultWindow::new(3.0, 7.0).unwrap();
        assert!(window.contains(3.0));
        assert!(window.contains(5.0));
        assert!(!window.contains(7.0));
        assert!(!window.contains(2.999));
    }

    #[test]
    fn spec_round_trips_through_json() {
        let spec = FaultSpec::default();
        let json = serde_json::to_string(&spec).unwrap();
        let back: FaultSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
