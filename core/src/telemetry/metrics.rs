use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters shared between the ingestion side and the tick side.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub chunks: u64,
    pub bytes: u64,
    pub records_parsed: u64,
    pub records_skipped: u64,
    pub samples_applied: u64,
    pub samples_dropped: u64,
    pub ticks: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_chunk(&self, bytes: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.chunks += 1;
            metrics.bytes += bytes as u64;
        }
    }

    pub fn record_records(&self, parsed: usize, skipped: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.records_parsed += parsed as u64;
            metrics.records_skipped += skipped as u64;
        }
    }

    pub fn record_samples(&self, applied: usize, dropped: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples_applied += applied as u64;
            metrics.samples_dropped += dropped as u64;
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
