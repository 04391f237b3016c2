//! Raw FMI 2.0 co-simulation types and entry-point signatures.
//!
//! Mirrors the C headers the inner binary was compiled against. Only the
//! subset of the standard the wrapper forwards is declared here.

use std::os::raw::{c_char, c_int, c_void};

pub type Fmi2Component = *mut c_void;
pub type Fmi2ComponentEnvironment = *mut c_void;
pub type Fmi2String = *const c_char;
pub type Fmi2Boolean = c_int;

pub const FMI2_TRUE: Fmi2Boolean = 1;
pub const FMI2_FALSE: Fmi2Boolean = 0;

/// `fmi2Type` discriminant for co-simulation.
pub const FMI2_CO_SIMULATION: c_int = 1;

pub fn to_fmi2_boolean(value: bool) -> Fmi2Boolean {
    if value { FMI2_TRUE } else { FMI2_FALSE }
}

/// Logger callback. The C declaration is variadic; the named arguments are
/// all the wrapper ever formats, so the trailing varargs are not declared.
pub type LoggerFn = unsafe extern "C" fn(
    Fmi2ComponentEnvironment,
    Fmi2String, // instance name
    c_int,      // status
    Fmi2String, // category
    Fmi2String, // message
);

pub type AllocateMemoryFn = unsafe extern "C" fn(usize, usize) -> *mut c_void;
pub type FreeMemoryFn = unsafe extern "C" fn(*mut c_void);
pub type StepFinishedFn = unsafe extern "C" fn(Fmi2ComponentEnvironment, c_int);

/// Callback set handed to the inner model at instantiation.
#[repr(C)]
pub struct Fmi2CallbackFunctions {
    pub logger: Option<LoggerFn>,
    pub allocate_memory: Option<AllocateMemoryFn>,
    pub free_memory: Option<FreeMemoryFn>,
    pub step_finished: Option<StepFinishedFn>,
    pub component_environment: Fmi2ComponentEnvironment,
}

pub type InstantiateFn = unsafe extern "C" fn(
    Fmi2String, // instance name
    c_int,      // fmu type
    Fmi2String, // guid
    Fmi2String, // resource location URI
    *const Fmi2CallbackFunctions,
    Fmi2Boolean, // visible
    Fmi2Boolean, // logging on
) -> Fmi2Component;

pub type FreeInstanceFn = unsafe extern "C" fn(Fmi2Component);

pub type SetupExperimentFn = unsafe extern "C" fn(
    Fmi2Component,
    Fmi2Boolean, // tolerance defined
    f64,         // tolerance
    f64,         // start time
    Fmi2Boolean, // stop time defined
    f64,         // stop time
) -> c_int;

pub type EnterInitializationModeFn = unsafe extern "C" fn(Fmi2Component) -> c_int;
pub type ExitInitializationModeFn = unsafe extern "C" fn(Fmi2Component) -> c_int;
pub type TerminateFn = unsafe extern "C" fn(Fmi2Component) -> c_int;
pub type ResetFn = unsafe extern "C" fn(Fmi2Component) -> c_int;

pub type GetRealFn = unsafe extern "C" fn(Fmi2Component, *const u32, usize, *mut f64) -> c_int;
pub type SetRealFn = unsafe extern "C" fn(Fmi2Component, *const u32, usize, *const f64) -> c_int;

pub type DoStepFn = unsafe extern "C" fn(
    Fmi2Component,
    f64,         // current communication point
    f64,         // communication step size
    Fmi2Boolean, // no set state prior to current point
) -> c_int;
