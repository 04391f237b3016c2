//! Dynamic loading of the inner model binary.
//!
//! This crate owns everything that crosses the FFI boundary:
//!
//! - raw FMI 2.0 types and function signatures (`ffi`)
//! - platform binary resolution and `file://` URI handling (`platform`)
//! - the typed dispatch table, resolved all-or-nothing (`dispatch`)
//! - host callbacks handed to the inner model (`callbacks`)
//! - `DlInstance`: one loaded image + one opaque inner instance, released
//!   in a fixed order on drop (`instance`)
//!
//! The loader's key invariant: either every required entry point resolves
//! and a complete table is returned, or the partially loaded image is
//! unloaded before the error surfaces. A dangling entry point is never
//! exposed.

pub mod callbacks;
pub mod dispatch;
pub mod error;
pub mod ffi;
pub mod instance;
pub mod platform;

pub use dispatch::{DispatchTable, LoadedModel};
pub use error::{LoaderError, LoaderResult};
pub use instance::{DlInstance, InnerModelConfig};
pub use platform::{inner_binary_path, library_extension, location_to_path, platform_tag};
