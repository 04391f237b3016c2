//! Host callbacks handed to the inner model.
//!
//! The inner binary logs through the callback set it received at
//! instantiation; the bridge here forwards those messages onto `tracing`.
//! Memory callbacks use the C allocator because the inner model frees
//! through the same set.

use std::ffi::CStr;
use std::os::raw::{c_int, c_void};
use std::ptr;

use ff_core::Status;
use tracing::{debug, error, warn};

use crate::ffi::{Fmi2CallbackFunctions, Fmi2ComponentEnvironment, Fmi2String};

/// Fresh callback set for one inner instance.
///
/// The caller must keep the returned value at a stable address (boxed) for
/// as long as the inner instance lives; the standard allows the model to
/// hold on to the pointer.
pub fn host_callbacks() -> Fmi2CallbackFunctions {
    Fmi2CallbackFunctions {
        logger: Some(log_message),
        allocate_memory: Some(allocate_memory),
        free_memory: Some(free_memory),
        step_finished: None,
        component_environment: ptr::null_mut(),
    }
}

/// Lossy view of a possibly null C string.
unsafe fn text<'a>(ptr: Fmi2String) -> std::borrow::Cow<'a, str> {
    if ptr.is_null() {
        std::borrow::Cow::Borrowed("")
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}

unsafe extern "C" fn log_message(
    _env: Fmi2ComponentEnvironment,
    instance_name: Fmi2String,
    status: c_int,
    category: Fmi2String,
    message: Fmi2String,
) {
    let instance = unsafe { text(instance_name) };
    let category = unsafe { text(category) };
    let message = unsafe { text(message) };
    match Status::from_raw(status) {
        Status::Ok | Status::Pending => {
            debug!(%instance, %category, "{message}");
        }
        Status::Warning | Status::Discard => {
            warn!(%instance, %category, "{message}");
        }
        Status::Error | Status::Fatal => {
            error!(%instance, %category, "{message}");
        }
    }
}

unsafe extern "C" fn allocate_memory(nobj: usize, size: usize) -> *mut c_void {
    unsafe { libc::calloc(nobj, size) }
}

unsafe extern "C" fn free_memory(obj: *mut c_void) {
    if !obj.is_null() {
        unsafe { libc::free(obj) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_set_is_complete() {
        let callbacks = host_callbacks();
        assert!(callbacks.logger.is_some());
        assert!(callbacks.allocate_memory.is_some());
        assert!(callbacks.free_memory.is_some());
        assert!(callbacks.component_environment.is_null());
    }

    #[test]
    fn allocate_and_free_round_trip() {
        unsafe {
            let ptr = allocate_memory(4, 8);
            assert!(!ptr.is_null());
            free_memory(ptr);
            // Null free is a no-op, as the standard requires.
            free_memory(ptr::null_mut());
        }
    }
}
