//! End-to-end stepping scenarios against a pure-Rust inner amplifier.
//!
//! The stub mirrors the wrapped binary (`y = k * u`) and records what the
//! wrapper forwards onto a shared tape, so the fault window and
//! parameter-propagation contracts are observable from the inner model's
//! side even after the wrapper is freed.

use std::cell::RefCell;
use std::rc::Rc;

use ff_core::{ModelApi, Status, ValueRef, VR_GAIN, VR_INPUT, VR_OUTPUT};
use ff_fault::{FaultKind, FaultSpec, FaultWindow};
use ff_wrapper::{LifecycleState, WrapperInstance};

/// Everything the stub observed, shared with the test body.
#[derive(Default)]
struct Tape {
    /// Input values received via set_real, in call order.
    received_inputs: Vec<f64>,
    /// Gain held at the moment exit-initialization was called.
    gain_at_exit_init: Option<f64>,
    terminated: bool,
}

/// Inner amplifier stand-in that records forwarded values.
#[derive(Default)]
struct RecordingAmplifier {
    u: f64,
    y: f64,
    k: f64,
    tape: Rc<RefCell<Tape>>,
}

impl RecordingAmplifier {
    fn new() -> (Self, Rc<RefCell<Tape>>) {
        let stub = Self::default();
        let tape = Rc::clone(&stub.tape);
        (stub, tape)
    }
}

impl ModelApi for RecordingAmplifier {
    fn setup_experiment(
        &mut self,
        _tolerance: Option<f64>,
        _start_time: f64,
        _stop_time: Option<f64>,
    ) -> Status {
        Status::Ok
    }

    fn enter_initialization_mode(&mut self) -> Status {
        Status::Ok
    }

    fn exit_initialization_mode(&mut self) -> Status {
        self.tape.borrow_mut().gain_at_exit_init = Some(self.k);
        Status::Ok
    }

    fn get_real(&mut self, refs: &[ValueRef], values: &mut [f64]) -> Status {
        for (vr, value) in refs.iter().zip(values.iter_mut()) {
            match *vr {
                VR_INPUT => *value = self.u,
                VR_OUTPUT => *value = self.y,
                VR_GAIN => *value = self.k,
                _ => {}
            }
        }
        Status::Ok
    }

    fn set_real(&mut self, refs: &[ValueRef], values: &[f64]) -> Status {
        for (vr, value) in refs.iter().zip(values.iter().copied()) {
            match *vr {
                VR_INPUT => {
                    self.u = value;
                    self.tape.borrow_mut().received_inputs.push(value);
                }
                VR_GAIN => self.k = value,
                _ => {}
            }
        }
        Status::Ok
    }

    fn do_step(&mut self, _current_time: f64, _step_size: f64, _no_set_prior: bool) -> Status {
        self.y = self.k * self.u;
        Status::Ok
    }

    fn terminate(&mut self) -> Status {
        self.tape.borrow_mut().terminated = true;
        Status::Ok
    }

    fn reset(&mut self) -> Status {
        self.u = 0.0;
        self.y = 0.0;
        self.k = 0.0;
        Status::Ok
    }
}

fn demo_fault() -> FaultSpec {
    FaultSpec {
        target: VR_INPUT,
        window: FaultWindow {
            start_s: 3.0,
            end_s: 7.0,
        },
        kind: FaultKind::Offset { value: 0.5 },
    }
}

/// Wrapper through init, with u=1.0 and k=2.0 configured.
fn stepping_wrapper() -> (WrapperInstance<RecordingAmplifier>, Rc<RefCell<Tape>>) {
    let (stub, tape) = RecordingAmplifier::new();
    let mut w = WrapperInstance::with_inner("scenario", stub, demo_fault(), None);
    assert_eq!(w.setup_experiment(None, 0.0, Some(10.0)), Status::Ok);
    assert_eq!(w.enter_initialization_mode(), Status::Ok);
    assert_eq!(w.set_real(&[VR_INPUT, VR_GAIN], &[1.0, 2.0]), Status::Ok);
    assert_eq!(w.exit_initialization_mode(), Status::Ok);
    (w, tape)
}

#[test]
fn step_inside_fault_window_perturbs_the_forwarded_input() {
    // Window [3, 7), offset 0.5, u=1.0, k=2.0, step at t=5.0.
    let (mut w, tape) = stepping_wrapper();
    assert_eq!(w.do_step(5.0, 0.1, true), Status::Ok);

    let mut values = [0.0; 2];
    assert_eq!(w.get_real(&[VR_INPUT, VR_OUTPUT], &mut values), Status::Ok);
    // The wrapper's own input stays nominal; the inner model saw 1.5.
    assert_eq!(values[0], 1.0);
    assert_eq!(values[1], 3.0);
    assert_eq!(tape.borrow().received_inputs.last(), Some(&1.5));
}

#[test]
fn step_outside_fault_window_passes_through() {
    let (mut w, tape) = stepping_wrapper();
    assert_eq!(w.do_step(1.0, 0.1, true), Status::Ok);

    let mut output = [0.0];
    assert_eq!(w.get_real(&[VR_OUTPUT], &mut output), Status::Ok);
    assert_eq!(output[0], 2.0);
    assert_eq!(tape.borrow().received_inputs.last(), Some(&1.0));
}

#[test]
fn fault_window_start_is_included_and_end_excluded() {
    let (mut w, tape) = stepping_wrapper();
    assert_eq!(w.do_step(3.0, 0.1, true), Status::Ok);
    assert_eq!(w.do_step(7.0, 0.1, true), Status::Ok);
    w.free_instance();

    // t=3.0 (start included) forwarded 1.5, t=7.0 (end excluded) 1.0.
    assert_eq!(tape.borrow().received_inputs, vec![1.5, 1.0]);
}

#[test]
fn gain_set_before_exit_init_reaches_the_inner_model() {
    let (stub, tape) = RecordingAmplifier::new();
    let mut w = WrapperInstance::with_inner("gain", stub, demo_fault(), None);
    w.setup_experiment(None, 0.0, None);
    w.enter_initialization_mode();
    assert_eq!(w.set_real(&[VR_GAIN], &[3.0]), Status::Ok);
    assert_eq!(w.exit_initialization_mode(), Status::Ok);
    w.free_instance();

    assert_eq!(tape.borrow().gain_at_exit_init, Some(3.0));
}

#[test]
fn default_gain_applies_when_none_is_set() {
    let (stub, tape) = RecordingAmplifier::new();
    let mut w = WrapperInstance::with_inner("default-gain", stub, demo_fault(), None);
    w.setup_experiment(None, 0.0, None);
    w.enter_initialization_mode();
    w.exit_initialization_mode();
    assert_eq!(w.set_real(&[VR_INPUT], &[2.0]), Status::Ok);
    assert_eq!(w.do_step(1.0, 0.1, true), Status::Ok);

    let mut output = [0.0];
    assert_eq!(w.get_real(&[VR_OUTPUT], &mut output), Status::Ok);
    assert_eq!(output[0], 4.0);
    assert_eq!(tape.borrow().gain_at_exit_init, Some(2.0));
}

#[test]
fn inner_failure_status_propagates_verbatim() {
    struct DiscardingAmplifier;
    impl ModelApi for DiscardingAmplifier {
        fn setup_experiment(&mut self, _t: Option<f64>, _s: f64, _e: Option<f64>) -> Status {
            Status::Ok
        }
        fn enter_initialization_mode(&mut self) -> Status {
            Status::Ok
        }
        fn exit_initialization_mode(&mut self) -> Status {
            Status::Ok
        }
        fn get_real(&mut self, _refs: &[ValueRef], _values: &mut [f64]) -> Status {
            Status::Ok
        }
        fn set_real(&mut self, _refs: &[ValueRef], _values: &[f64]) -> Status {
            Status::Ok
        }
        fn do_step(&mut self, _t: f64, _h: f64, _n: bool) -> Status {
            Status::Discard
        }
        fn terminate(&mut self) -> Status {
            Status::Ok
        }
        fn reset(&mut self) -> Status {
            Status::Ok
        }
    }

    let mut w = WrapperInstance::with_inner("discard", DiscardingAmplifier, demo_fault(), None);
    w.setup_experiment(None, 0.0, None);
    w.enter_initialization_mode();
    w.exit_initialization_mode();

    assert_eq!(w.do_step(0.0, 0.1, true), Status::Discard);
    // Not fatal to the wrapper: still in step mode, next call goes through.
    assert_eq!(w.state(), LifecycleState::StepMode);
    assert_eq!(w.do_step(0.1, 0.1, true), Status::Discard);
}

#[test]
fn terminate_reaches_the_inner_model() {
    let (mut w, tape) = stepping_wrapper();
    assert_eq!(w.do_step(0.5, 0.1, true), Status::Ok);
    assert_eq!(w.terminate(), Status::Ok);
    assert_eq!(w.state(), LifecycleState::Terminated);
    assert!(tape.borrow().terminated);
}
