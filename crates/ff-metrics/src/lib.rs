//! Live state publication for wrapper instances.
//!
//! The stepping thread pushes one [`StepSample`] per completed step into a
//! closeable FIFO channel; a background exporter drains it and republishes
//! the latest values as labeled gauges on a pull-based HTTP endpoint.
//!
//! Metrics are strictly best-effort relative to simulation correctness: a
//! push never blocks or fails the step, and any exporter failure is logged
//! and ends only the exporter.

pub mod channel;
pub mod error;
pub mod exporter;
pub mod exposition;
pub mod registry;
pub mod sample;

pub use channel::{sample_channel, SampleReceiver, SampleSender};
pub use error::{MetricsError, MetricsResult};
pub use exporter::{ExporterConfig, MetricsExporter};
pub use exposition::ExpositionServer;
pub use registry::MetricsRegistry;
pub use sample::StepSample;
