//! Platform binary resolution.
//!
//! The bundle layout is fixed by convention:
//! `<resources>/<model>/binaries/<platform tag>/<stem><extension>`.

use std::path::{Path, PathBuf};

/// Platform directory tag used inside the bundle's `binaries/` tree.
pub fn platform_tag() -> &'static str {
    if cfg!(target_os = "windows") {
        "win64"
    } else if cfg!(target_os = "macos") {
        "darwin64"
    } else {
        "linux64"
    }
}

/// Shared-library extension matching [`platform_tag`].
pub fn library_extension() -> &'static str {
    if cfg!(target_os = "windows") {
        ".dll"
    } else if cfg!(target_os = "macos") {
        ".dylib"
    } else {
        ".so"
    }
}

/// Full path to the inner model binary inside an unpacked bundle.
pub fn inner_binary_path(resources: &Path, model_name: &str, binary_stem: &str) -> PathBuf {
    resources
        .join(model_name)
        .join("binaries")
        .join(platform_tag())
        .join(format!("{binary_stem}{}", library_extension()))
}

/// Convert a resource location to a filesystem path.
///
/// The orchestrator passes a `file://` URI; the dynamic loader needs a
/// plain path. Anything without the scheme is taken as a path already.
pub fn location_to_path(location: &str) -> PathBuf {
    let Some(mut rest) = location.strip_prefix("file://") else {
        return PathBuf::from(location);
    };
    // Windows URIs look like file:///C:/..., so the leading slash before
    // the drive letter has to go.
    if cfg!(target_os = "windows") {
        let bytes = rest.as_bytes();
        if bytes.len() > 2 && bytes[0] == b'/' && bytes[2] == b':' {
            rest = &rest[1..];
        }
    }
    PathBuf::from(rest)
}
