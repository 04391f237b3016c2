//! The dlopen-backed inner model instance.

use std::ffi::CString;
use std::ptr;

use ff_core::{ModelApi, Status, ValueRef};
use tracing::{debug, error};

use crate::callbacks::host_callbacks;
use crate::dispatch::LoadedModel;
use crate::error::{LoaderError, LoaderResult};
use crate::ffi::{to_fmi2_boolean, Fmi2CallbackFunctions, Fmi2Component, FMI2_CO_SIMULATION};
use crate::platform::{inner_binary_path, location_to_path};

/// Identity and layout of the wrapped inner model.
///
/// The defaults name the amplifier the demonstration bundle ships; the token
/// comes from the inner model's own description file.
#[derive(Debug, Clone)]
pub struct InnerModelConfig {
    /// Directory name of the inner model inside the bundle resources.
    pub model_name: String,
    /// Instance name the inner model is instantiated under.
    pub instance_name: String,
    /// Instantiation token (GUID) the inner model validates.
    pub guid: String,
    /// File stem of the shared library inside `binaries/<platform>/`.
    pub binary_stem: String,
}

impl Default for InnerModelConfig {
    fn default() -> Self {
        Self {
            model_name: "Amplifier".to_string(),
            instance_name: "innerAmplifier".to_string(),
            guid: "{8c4e810f-3df3-4a00-8276-176fa3c9f000}".to_string(),
            binary_stem: "model".to_string(),
        }
    }
}

/// One loaded binary image plus one opaque inner instance.
///
/// Sole owner of both; release order on drop is instance first, image last,
/// so the free call never runs against an unloaded image.
pub struct DlInstance {
    handle: Fmi2Component,
    // Boxed: the inner model may hold the callback pointer for its lifetime.
    _callbacks: Box<Fmi2CallbackFunctions>,
    model: LoadedModel,
}

impl DlInstance {
    /// Load the inner binary and instantiate it, atomically.
    ///
    /// `resource_location` is the wrapper's own resource URI or path; the
    /// inner model receives `<resource_location>/<model>/resources` as its
    /// own location, per the bundle convention. On any failure the image is
    /// unloaded and no handle is retained.
    pub fn instantiate(
        config: &InnerModelConfig,
        resource_location: &str,
        visible: bool,
        logging_on: bool,
    ) -> LoaderResult<Self> {
        let resources = location_to_path(resource_location);
        let binary = inner_binary_path(&resources, &config.model_name, &config.binary_stem);
        let model = LoadedModel::load(&binary)?;

        let instance_name = c_string(&config.instance_name, "instance name")?;
        let guid = c_string(&config.guid, "guid")?;
        let inner_location = format!(
            "{}/{}/resources",
            resource_location.trim_end_matches('/'),
            config.model_name
        );
        let inner_location = c_string(&inner_location, "resource location")?;

        let callbacks = Box::new(host_callbacks());
        let handle = unsafe {
            (model.table().instantiate)(
                instance_name.as_ptr(),
                FMI2_CO_SIMULATION,
                guid.as_ptr(),
                inner_location.as_ptr(),
                &*callbacks,
                to_fmi2_boolean(visible),
                to_fmi2_boolean(logging_on),
            )
        };
        if handle.is_null() {
            // `model` is dropped here, unloading the image.
            error!(instance = %config.instance_name, "inner model rejected instantiation");
            return Err(LoaderError::InnerInstantiate {
                name: config.instance_name.clone(),
            });
        }

        debug!(instance = %config.instance_name, "inner model instantiated");
        Ok(Self {
            handle,
            _callbacks: callbacks,
            model,
        })
    }
}

fn c_string(value: &str, what: &'static str) -> LoaderResult<CString> {
    CString::new(value).map_err(|_| LoaderError::InvalidArg { what })
}

impl ModelApi for DlInstance {
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Status {
        let raw = unsafe {
            (self.model.table().setup_experiment)(
                self.handle,
                to_fmi2_boolean(tolerance.is_some()),
                tolerance.unwrap_or(0.0),
                start_time,
                to_fmi2_boolean(stop_time.is_some()),
                stop_time.unwrap_or(0.0),
            )
        };
        Status::from_raw(raw)
    }

    fn enter_initialization_mode(&mut self) -> Status {
        Status::from_raw(unsafe { (self.model.table().enter_initialization_mode)(self.handle) })
    }

    fn exit_initialization_mode(&mut self) -> Status {
        Status::from_raw(unsafe { (self.model.table().exit_initialization_mode)(self.handle) })
    }

    fn get_real(&mut self, refs: &[ValueRef], values: &mut [f64]) -> Status {
        if refs.len() != values.len() {
            return Status::Error;
        }
        let raw = unsafe {
            (self.model.table().get_real)(
                self.handle,
                refs.as_ptr(),
                refs.len(),
                values.as_mut_ptr(),
            )
        };
        Status::from_raw(raw)
    }

    fn set_real(&mut self, refs: &[ValueRef], values: &[f64]) -> Status {
        if refs.len() != values.len() {
            return Status::Error;
        }
        let raw = unsafe {
            (self.model.table().set_real)(self.handle, refs.as_ptr(), refs.len(), values.as_ptr())
        };
        Status::from_raw(raw)
    }

    fn do_step(&mut self, current_time: f64, step_size: f64, no_set_prior: bool) -> Status {
        let raw = unsafe {
            (self.model.table().do_step)(
                self.handle,
                current_time,
                step_size,
                to_fmi2_boolean(no_set_prior),
            )
        };
        Status::from_raw(raw)
    }

    fn terminate(&mut self) -> Status {
        Status::from_raw(unsafe { (self.model.table().terminate)(self.handle) })
    }

    fn reset(&mut self) -> Status {
        Status::from_raw(unsafe { (self.model.table().reset)(self.handle) })
    }
}

impl Drop for DlInstance {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { (self.model.table().free_instance)(self.handle) };
            self.handle = ptr::null_mut();
        }
        // Fields drop afterwards: callbacks, then the loaded image.
    }
}
