//! Background exporter: drains the sample channel into the gauge registry.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::channel::SampleReceiver;
use crate::error::MetricsResult;
use crate::exposition::ExpositionServer;
use crate::registry::MetricsRegistry;

/// Gauge names published for every wrapper instance.
pub const GAUGE_TIME: &str = "wrapper_time_seconds";
pub const GAUGE_INPUT: &str = "wrapper_input";
pub const GAUGE_OUTPUT: &str = "wrapper_output";
pub const GAUGE_GAIN: &str = "wrapper_gain";

/// Exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Local address the scrape endpoint binds.
    pub addr: SocketAddr,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            // Conventional Prometheus exporter port, loopback only.
            addr: ([127, 0, 0, 1], 9464).into(),
        }
    }
}

/// Handle to the background exporter thread of one wrapper instance.
///
/// Spawned at construction, joined at teardown. Every failure inside the
/// thread is caught and logged; nothing propagates to the stepping path.
pub struct MetricsExporter {
    handle: Option<JoinHandle<()>>,
}

impl MetricsExporter {
    /// Start the exporter for `instance_name`, consuming the receiver half
    /// of the sample channel.
    pub fn spawn(instance_name: &str, config: ExporterConfig, rx: SampleReceiver) -> Self {
        let instance = instance_name.to_string();
        let handle = thread::Builder::new()
            .name(format!("ff-metrics-{instance_name}"))
            .spawn(move || {
                if let Err(e) = run(&instance, &config, &rx) {
                    warn!(%instance, error = %e, "metrics exporter stopped");
                }
            });
        match handle {
            Ok(handle) => Self {
                handle: Some(handle),
            },
            Err(e) => {
                warn!(error = %e, "could not spawn metrics exporter thread");
                Self { handle: None }
            }
        }
    }

    /// Wait for the exporter to finish. Call only after closing the sample
    /// channel, otherwise the drain loop never ends. Idempotent.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for MetricsExporter {
    fn drop(&mut self) {
        self.join();
    }
}

fn run(instance: &str, config: &ExporterConfig, rx: &SampleReceiver) -> MetricsResult<()> {
    let registry = Arc::new(Mutex::new(instance_registry(instance)));
    let mut server = ExpositionServer::bind(config.addr, Arc::clone(&registry))?;
    debug!(%instance, addr = %server.local_addr(), "metrics exporter started");

    drain(rx, &registry);

    server.shutdown();
    debug!(%instance, "metrics exporter drained and stopped");
    Ok(())
}

/// Registry with the four per-instance gauges registered.
pub(crate) fn instance_registry(instance: &str) -> MetricsRegistry {
    let labels = [("instance", instance)];
    let mut registry = MetricsRegistry::new();
    registry.register_gauge(GAUGE_TIME, "Simulation time in seconds", &labels);
    registry.register_gauge(GAUGE_INPUT, "Cached input signal u", &labels);
    registry.register_gauge(GAUGE_OUTPUT, "Cached output signal y", &labels);
    registry.register_gauge(GAUGE_GAIN, "Gain parameter k", &labels);
    registry
}

/// Drain the channel to end-of-stream, updating all four gauges per sample.
pub(crate) fn drain(rx: &SampleReceiver, registry: &Arc<Mutex<MetricsRegistry>>) {
    while let Some(sample) = rx.recv() {
        let Ok(mut registry) = registry.lock() else {
            // A poisoned lock means the listener thread panicked; samples
            // can only be discarded from here on.
            continue;
        };
        registry.set(GAUGE_TIME, sample.time_s);
        registry.set(GAUGE_INPUT, sample.input);
        registry.set(GAUGE_OUTPUT, sample.output);
        registry.set(GAUGE_GAIN, sample.gain);
    }
}
