//! Typed dispatch table resolved from a loaded binary image.

use std::path::Path;

use libloading::Library;
use tracing::{debug, error};

use crate::error::{LoaderError, LoaderResult};
use crate::ffi::{
    DoStepFn, EnterInitializationModeFn, ExitInitializationModeFn, FreeInstanceFn, GetRealFn,
    InstantiateFn, ResetFn, SetRealFn, SetupExperimentFn, TerminateFn,
};

/// The fixed set of entry points the wrapper forwards through.
///
/// Population is all-or-nothing: a value of this type only exists once every
/// slot resolved against a live image. The owning [`LoadedModel`] keeps that
/// image mapped for as long as the table is reachable.
pub struct DispatchTable {
    pub instantiate: InstantiateFn,
    pub free_instance: FreeInstanceFn,
    pub setup_experiment: SetupExperimentFn,
    pub enter_initialization_mode: EnterInitializationModeFn,
    pub exit_initialization_mode: ExitInitializationModeFn,
    pub terminate: TerminateFn,
    pub reset: ResetFn,
    pub get_real: GetRealFn,
    pub set_real: SetRealFn,
    pub do_step: DoStepFn,
}

impl DispatchTable {
    /// Resolve every required entry point or fail as a unit.
    ///
    /// On failure the caller still owns the library and must drop it; no
    /// table referencing it escapes.
    fn resolve(library: &Library) -> LoaderResult<Self> {
        unsafe {
            Ok(Self {
                instantiate: symbol(library, "fmi2Instantiate")?,
                free_instance: symbol(library, "fmi2FreeInstance")?,
                setup_experiment: symbol(library, "fmi2SetupExperiment")?,
                enter_initialization_mode: symbol(library, "fmi2EnterInitializationMode")?,
                exit_initialization_mode: symbol(library, "fmi2ExitInitializationMode")?,
                terminate: symbol(library, "fmi2Terminate")?,
                reset: symbol(library, "fmi2Reset")?,
                get_real: symbol(library, "fmi2GetReal")?,
                set_real: symbol(library, "fmi2SetReal")?,
                do_step: symbol(library, "fmi2DoStep")?,
            })
        }
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> LoaderResult<T> {
    match unsafe { library.get::<T>(name.as_bytes()) } {
        Ok(entry) => Ok(*entry),
        Err(source) => {
            error!(symbol = name, "required entry point missing from inner binary");
            Err(LoaderError::MissingSymbol { name, source })
        }
    }
}

/// A loaded inner binary plus its resolved dispatch table.
pub struct LoadedModel {
    table: DispatchTable,
    // Declared after `table` so the image stays mapped until the entry
    // points are gone.
    _library: Library,
}

impl LoadedModel {
    /// Load the image at `binary_path` and resolve the full table.
    ///
    /// Any failure unloads the image before returning; partial bindings are
    /// never exposed.
    pub fn load(binary_path: &Path) -> LoaderResult<Self> {
        let library = unsafe { Library::new(binary_path) }.map_err(|source| {
            error!(path = %binary_path.display(), "could not load inner model binary");
            LoaderError::LibraryLoad {
                path: binary_path.to_path_buf(),
                source,
            }
        })?;
        // `library` is dropped (image unloaded) if any symbol is missing.
        let table = DispatchTable::resolve(&library)?;
        debug!(path = %binary_path.display(), "inner model binary loaded");
        Ok(Self {
            table,
            _library: library,
        })
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }
}
