//! Closeable FIFO channel between the stepping thread and the exporter.
//!
//! Thin wrapper over `std::sync::mpsc` giving the producer an explicit
//! one-way `close` instead of relying on scope-driven drops. The unbounded
//! sender never blocks; the receiver blocks only while the channel is both
//! open and empty, and keeps draining in FIFO order after a close until the
//! buffered samples run out.

use std::sync::mpsc;

use tracing::trace;

use crate::sample::StepSample;

/// Producer half. Owned by the wrapper instance; single producer.
pub struct SampleSender {
    tx: Option<mpsc::Sender<StepSample>>,
}

impl SampleSender {
    /// Enqueue a sample. Never blocks; a push after close (or after the
    /// consumer is gone) is silently dropped so the simulation step can
    /// never fail on metrics.
    pub fn push(&self, sample: StepSample) {
        if let Some(tx) = &self.tx {
            if tx.send(sample).is_err() {
                trace!("sample dropped: exporter already gone");
            }
        }
    }

    /// Close the channel. One-way: wakes a blocked consumer once the
    /// buffered samples are drained. Idempotent.
    pub fn close(&mut self) {
        self.tx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

/// Consumer half. Owned by the exporter thread; single consumer.
pub struct SampleReceiver {
    rx: mpsc::Receiver<StepSample>,
}

impl SampleReceiver {
    /// Block until a sample is available or the channel is closed and
    /// empty. Returns `None` only at end-of-stream.
    pub fn recv(&self) -> Option<StepSample> {
        self.rx.recv().ok()
    }
}

/// Create the producer/consumer pair for one wrapper instance.
pub fn sample_channel() -> (SampleSender, SampleReceiver) {
    let (tx, rx) = mpsc::channel();
    (SampleSender { tx: Some(tx) }, SampleReceiver { rx })
}
