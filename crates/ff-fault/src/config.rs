//! Optional fault configuration shipped with the model bundle.
//!
//! A `fault.json` next to the bundle's resources overrides the compiled-in
//! default, so the same wrapper binary can carry different perturbations
//! without a rebuild.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{FaultError, FaultResult};
use crate::spec::FaultSpec;

/// File name looked up inside the resources directory.
pub const FAULT_CONFIG_FILE: &str = "fault.json";

/// Load the fault spec for a bundle.
///
/// Missing file means the default spec; a present-but-invalid file is a
/// construction error (fail fast, never guess a perturbation).
pub fn load_fault_config(resources_dir: &Path) -> FaultResult<FaultSpec> {
    let path = resources_dir.join(FAULT_CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no fault config, using default spec");
        return Ok(FaultSpec::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| FaultError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let spec: FaultSpec =
        serde_json::from_str(&content).map_err(|source| FaultError::ConfigParse {
            path: path.clone(),
            source,
        })?;
    spec.validate()?;
    debug!(path = %path.display(), ?spec, "loaded fault config");
    Ok(spec)
}
