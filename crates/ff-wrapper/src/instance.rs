//! The wrapper instance and its forwarding logic.

use ff_core::{ModelApi, Status, ValueRef, VR_GAIN, VR_INPUT, VR_OUTPUT};
use ff_fault::{apply_to, load_fault_config, FaultSpec};
use ff_loader::{location_to_path, DlInstance, InnerModelConfig};
use ff_metrics::{sample_channel, ExporterConfig, MetricsExporter, SampleSender, StepSample};
use tracing::{debug, info, warn};

use crate::error::WrapperResult;
use crate::lifecycle::LifecycleState;

/// Gain parameter default, matching the inner amplifier's.
pub const DEFAULT_GAIN: f64 = 2.0;

/// Construction-time configuration of a wrapper instance.
#[derive(Debug, Clone)]
pub struct WrapperConfig {
    pub instance_name: String,
    pub inner: InnerModelConfig,
    /// `None` disables the metrics pipeline entirely.
    pub metrics: Option<ExporterConfig>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            instance_name: "faultWrapper".to_string(),
            inner: InnerModelConfig::default(),
            metrics: Some(ExporterConfig::default()),
        }
    }
}

/// One live wrapper instance.
///
/// Owns the inner model backend, the fault spec, and the metrics pipeline
/// for its entire lifetime; nothing is shared across instances. All
/// lifecycle and step calls happen on the caller's thread.
pub struct WrapperInstance<M: ModelApi> {
    name: String,
    state: LifecycleState,
    input: f64,
    output: f64,
    gain: f64,
    current_time: f64,
    fault: FaultSpec,
    samples: SampleSender,
    exporter: Option<MetricsExporter>,
    // Declared last: released only after the metrics teardown in drop.
    inner: M,
}

impl WrapperInstance<DlInstance> {
    /// Instantiate against an unpacked bundle.
    ///
    /// Loads the fault configuration from the bundle resources, then loads
    /// and instantiates the inner binary (atomic: any failure unloads the
    /// image and retains nothing), and only then starts the exporter. On
    /// error no background thread is running and no handle survives.
    pub fn instantiate(
        config: &WrapperConfig,
        resource_location: &str,
        visible: bool,
        logging_on: bool,
    ) -> WrapperResult<Self> {
        let resources = location_to_path(resource_location);
        let fault = load_fault_config(&resources)?;
        let inner = DlInstance::instantiate(&config.inner, resource_location, visible, logging_on)?;
        info!(instance = %config.instance_name, ?fault, "wrapper instantiated");
        Ok(Self::assemble(
            config.instance_name.clone(),
            inner,
            fault,
            config.metrics.clone(),
        ))
    }
}

impl<M: ModelApi> WrapperInstance<M> {
    /// Assemble a wrapper around an already instantiated backend.
    ///
    /// This is the seam tests and in-process backends use; `instantiate`
    /// goes through it too.
    pub fn with_inner(
        name: impl Into<String>,
        inner: M,
        fault: FaultSpec,
        metrics: Option<ExporterConfig>,
    ) -> Self {
        Self::assemble(name.into(), inner, fault, metrics)
    }

    fn assemble(
        name: String,
        inner: M,
        fault: FaultSpec,
        metrics: Option<ExporterConfig>,
    ) -> Self {
        let (mut samples, rx) = sample_channel();
        let exporter = match metrics {
            Some(config) => Some(MetricsExporter::spawn(&name, config, rx)),
            None => {
                // No consumer: close immediately so pushes become no-ops.
                samples.close();
                None
            }
        };
        Self {
            name,
            state: LifecycleState::Instantiated,
            input: 0.0,
            output: 0.0,
            gain: DEFAULT_GAIN,
            current_time: 0.0,
            fault,
            samples,
            exporter,
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn fault(&self) -> &FaultSpec {
        &self.fault
    }

    fn guard(&self, expected: LifecycleState, call: &'static str) -> bool {
        if self.state == expected {
            true
        } else {
            debug!(
                instance = %self.name,
                state = %self.state,
                %expected,
                "{call} rejected out of order"
            );
            false
        }
    }

    /// Record the experiment start time and forward verbatim.
    pub fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Status {
        if !self.guard(LifecycleState::Instantiated, "setup_experiment") {
            return Status::Error;
        }
        self.current_time = start_time;
        self.inner.setup_experiment(tolerance, start_time, stop_time)
    }

    pub fn enter_initialization_mode(&mut self) -> Status {
        if !self.guard(LifecycleState::Instantiated, "enter_initialization_mode") {
            return Status::Error;
        }
        let status = self.inner.enter_initialization_mode();
        if status.is_ok() {
            self.state = LifecycleState::InitializationMode;
        }
        status
    }

    /// Push the cached gain to the inner model, then close its
    /// initialization, so it observes the wrapper's latest parameter.
    pub fn exit_initialization_mode(&mut self) -> Status {
        if !self.guard(LifecycleState::InitializationMode, "exit_initialization_mode") {
            return Status::Error;
        }
        let pushed = self.inner.set_real(&[VR_GAIN], &[self.gain]);
        if !pushed.is_ok() {
            warn!(instance = %self.name, status = %pushed, "gain push rejected");
            return pushed;
        }
        let status = self.inner.exit_initialization_mode();
        if status.is_ok() {
            self.state = LifecycleState::StepMode;
        }
        status
    }

    /// Read cached variables by reference. Unknown references leave their
    /// slot untouched, mirroring the inner model's own accessor.
    pub fn get_real(&self, refs: &[ValueRef], values: &mut [f64]) -> Status {
        if refs.len() != values.len() {
            return Status::Error;
        }
        for (vr, value) in refs.iter().zip(values.iter_mut()) {
            match *vr {
                VR_INPUT => *value = self.input,
                VR_OUTPUT => *value = self.output,
                VR_GAIN => *value = self.gain,
                _ => {}
            }
        }
        Status::Ok
    }

    /// Write cached variables by reference.
    ///
    /// The output is computed and read-only: writes to it are silently
    /// ignored rather than rejected. Unknown references are ignored too.
    pub fn set_real(&mut self, refs: &[ValueRef], values: &[f64]) -> Status {
        if refs.len() != values.len() {
            return Status::Error;
        }
        for (vr, value) in refs.iter().zip(values.iter().copied()) {
            match *vr {
                VR_INPUT => self.input = value,
                VR_GAIN => self.gain = value,
                _ => {}
            }
        }
        Status::Ok
    }

    /// Advance one communication step.
    ///
    /// Forwards the fault-adjusted input, steps the inner model, caches its
    /// output, and emits one metrics sample. The first non-OK status from
    /// the inner model is returned verbatim; nothing is retried.
    pub fn do_step(&mut self, current_time: f64, step_size: f64, no_set_prior: bool) -> Status {
        if !self.guard(LifecycleState::StepMode, "do_step") {
            return Status::Error;
        }
        self.current_time = current_time;

        let forwarded = apply_to(VR_INPUT, self.input, current_time, &self.fault);
        let status = self.inner.set_real(&[VR_INPUT], &[forwarded]);
        if !status.is_ok() {
            return status;
        }
        let status = self.inner.do_step(current_time, step_size, no_set_prior);
        if !status.is_ok() {
            return status;
        }
        let mut output = [0.0];
        let status = self.inner.get_real(&[VR_OUTPUT], &mut output);
        if status.is_ok() {
            self.output = output[0];
            self.samples.push(StepSample {
                time_s: self.current_time,
                input: self.input,
                output: self.output,
                gain: self.gain,
            });
        }
        status
    }

    pub fn terminate(&mut self) -> Status {
        if !self.guard(LifecycleState::StepMode, "terminate") {
            return Status::Error;
        }
        let status = self.inner.terminate();
        if status.is_ok() {
            self.state = LifecycleState::Terminated;
        }
        status
    }

    /// Forwarded verbatim; a successful reset restores the freshly
    /// instantiated defaults.
    pub fn reset(&mut self) -> Status {
        let status = self.inner.reset();
        if status.is_ok() {
            self.input = 0.0;
            self.output = 0.0;
            self.gain = DEFAULT_GAIN;
            self.current_time = 0.0;
            self.state = LifecycleState::Instantiated;
        }
        status
    }

    /// Orderly teardown: close the sample channel, join the exporter
    /// (draining everything already enqueued), then release the inner
    /// instance and unload its image, strictly in that order.
    pub fn free_instance(self) {
        // Drop runs the teardown; consuming self makes the call final.
    }

    fn shutdown_metrics(&mut self) {
        self.samples.close();
        if let Some(mut exporter) = self.exporter.take() {
            exporter.join();
        }
    }
}

impl<M: ModelApi> Drop for WrapperInstance<M> {
    fn drop(&mut self) {
        self.shutdown_metrics();
        // `inner` drops after this body: instance released, image unloaded.
    }
}

/// The standardized calls outside the forwarded subset.
///
/// They uniformly report "not supported"; the two the standard requires to
/// be tolerated (`set_debug_logging`, `cancel_step`) report OK.
impl<M: ModelApi> WrapperInstance<M> {
    fn unsupported(&self, call: &'static str) -> Status {
        debug!(instance = %self.name, "{call} not supported");
        Status::Error
    }

    pub fn set_debug_logging(&mut self, _logging_on: bool, _categories: &[&str]) -> Status {
        Status::Ok
    }

    pub fn cancel_step(&mut self) -> Status {
        Status::Ok
    }

    pub fn get_integer(&self, _refs: &[ValueRef], _values: &mut [i32]) -> Status {
        self.unsupported("get_integer")
    }

    pub fn set_integer(&mut self, _refs: &[ValueRef], _values: &[i32]) -> Status {
        self.unsupported("set_integer")
    }

    pub fn get_boolean(&self, _refs: &[ValueRef], _values: &mut [bool]) -> Status {
        self.unsupported("get_boolean")
    }

    pub fn set_boolean(&mut self, _refs: &[ValueRef], _values: &[bool]) -> Status {
        self.unsupported("set_boolean")
    }

    pub fn get_string(&self, _refs: &[ValueRef], _values: &mut [String]) -> Status {
        self.unsupported("get_string")
    }

    pub fn set_string(&mut self, _refs: &[ValueRef], _values: &[&str]) -> Status {
        self.unsupported("set_string")
    }

    pub fn get_fmu_state(&self) -> Status {
        self.unsupported("get_fmu_state")
    }

    pub fn set_fmu_state(&mut self) -> Status {
        self.unsupported("set_fmu_state")
    }

    pub fn serialize_fmu_state(&self) -> Status {
        self.unsupported("serialize_fmu_state")
    }

    pub fn get_directional_derivative(&self) -> Status {
        self.unsupported("get_directional_derivative")
    }

    pub fn set_real_input_derivatives(&mut self) -> Status {
        self.unsupported("set_real_input_derivatives")
    }

    pub fn get_real_output_derivatives(&self) -> Status {
        self.unsupported("get_real_output_derivatives")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pure-Rust amplifier: y = k * u, mirroring the wrapped binary.
    #[derive(Default)]
    struct AmplifierStub {
        u: f64,
        y: f64,
        k: f64,
    }

    impl ModelApi for AmplifierStub {
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
                    VR_INPUT => self.u = value,
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
            Status::Ok
        }

        fn reset(&mut self) -> Status {
            *self = Self::default();
            Status::Ok
        }
    }

    fn wrapper() -> WrapperInstance<AmplifierStub> {
        WrapperInstance::with_inner("t", AmplifierStub::default(), FaultSpec::default(), None)
    }

    #[test]
    fn lifecycle_guard_rejects_out_of_order_calls() {
        let mut w = wrapper();
        assert_eq!(w.do_step(0.0, 0.1, true), Status::Error);
        assert_eq!(w.exit_initialization_mode(), Status::Error);
        assert_eq!(w.state(), LifecycleState::Instantiated);

        assert_eq!(w.setup_experiment(None, 0.0, Some(10.0)), Status::Ok);
        assert_eq!(w.enter_initialization_mode(), Status::Ok);
        assert_eq!(w.enter_initialization_mode(), Status::Error);
        assert_eq!(w.exit_initialization_mode(), Status::Ok);
        assert_eq!(w.state(), LifecycleState::StepMode);
    }

    #[test]
    fn output_writes_are_silently_ignored() {
        let mut w = wrapper();
        assert_eq!(w.set_real(&[VR_OUTPUT], &[99.0]), Status::Ok);
        let mut out = [123.0];
        assert_eq!(w.get_real(&[VR_OUTPUT], &mut out), Status::Ok);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn unknown_references_are_ignored() {
        let mut w = wrapper();
        assert_eq!(w.set_real(&[7], &[1.0]), Status::Ok);
        let mut out = [42.0];
        assert_eq!(w.get_real(&[7], &mut out), Status::Ok);
        // Slot untouched for an unknown reference.
        assert_eq!(out[0], 42.0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let mut w = wrapper();
        assert_eq!(w.set_real(&[VR_INPUT, VR_GAIN], &[1.0]), Status::Error);
        let mut out = [0.0];
        assert_eq!(w.get_real(&[VR_INPUT, VR_GAIN], &mut out), Status::Error);
    }

    #[test]
    fn setup_experiment_records_start_time() {
        let mut w = wrapper();
        assert_eq!(w.setup_experiment(Some(1e-6), 2.5, None), Status::Ok);
        assert_eq!(w.current_time(), 2.5);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut w = wrapper();
        w.setup_experiment(None, 0.0, None);
        w.enter_initialization_mode();
        w.exit_initialization_mode();
        w.set_real(&[VR_INPUT, VR_GAIN], &[1.0, 3.0]);
        w.do_step(0.0, 0.1, true);

        assert_eq!(w.reset(), Status::Ok);
        assert_eq!(w.state(), LifecycleState::Instantiated);
        let mut values = [0.0; 3];
        w.get_real(&[VR_INPUT, VR_OUTPUT, VR_GAIN], &mut values);
        assert_eq!(values, [0.0, 0.0, DEFAULT_GAIN]);
    }

    #[test]
    fn unsupported_catalogue_reports_uniformly() {
        let mut w = wrapper();
        assert_eq!(w.get_integer(&[VR_INPUT], &mut [0]), Status::Error);
        assert_eq!(w.set_boolean(&[VR_INPUT], &[true]), Status::Error);
        assert_eq!(w.get_fmu_state(), Status::Error);
        assert_eq!(w.get_directional_derivative(), Status::Error);
        // Tolerated no-ops.
        assert_eq!(w.set_debug_logging(true, &[]), Status::Ok);
        assert_eq!(w.cancel_step(), Status::Ok);
    }
}
