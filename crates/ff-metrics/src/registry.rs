//! Labeled gauge registry with Prometheus text exposition.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// One labeled gauge.
#[derive(Debug, Clone)]
struct Gauge {
    help: String,
    labels: Vec<(String, String)>,
    value: f64,
}

/// Registry of named gauges, rendered in Prometheus exposition format.
///
/// Keyed by metric name in a `BTreeMap` so scrapes are stable across
/// renders. Only gauges: the pipeline republishes point-in-time state, not
/// event counts.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    gauges: BTreeMap<String, Gauge>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gauge with fixed labels. Re-registering a name replaces
    /// the previous gauge.
    pub fn register_gauge(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[(&str, &str)],
    ) {
        self.gauges.insert(
            name.into(),
            Gauge {
                help: help.into(),
                labels: labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                value: 0.0,
            },
        );
    }

    /// Update a gauge's value. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: f64) {
        if let Some(gauge) = self.gauges.get_mut(name) {
            gauge.value = value;
        }
    }

    pub fn gauge_count(&self) -> usize {
        self.gauges.len()
    }

    /// Render every gauge in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, gauge) in &self.gauges {
            let labels = if gauge.labels.is_empty() {
                String::new()
            } else {
                let pairs: Vec<String> = gauge
                    .labels
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{v}\""))
                    .collect();
                format!("{{{}}}", pairs.join(","))
            };
            let _ = writeln!(out, "# HELP {name} {}", gauge.help);
            let _ = writeln!(out, "# TYPE {name} gauge");
            let _ = writeln!(out, "{name}{labels} {}", gauge.value);
        }
        out
    }
}
