use crate::telemetry::MetricsSnapshot;
use serde::Serialize;

/// A `(frequency, power)` marker for the loudest bin of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub bin: usize,
    pub frequency: f64,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxHoldView {
    pub values: Vec<Option<f64>>,
    pub peak: Option<Peak>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallView {
    /// Rows in storage order; row `cursor - 1` is the newest.
    pub rows: Vec<Vec<f64>>,
    pub cursor: usize,
    pub filled: usize,
    pub floor_db: Option<f64>,
    pub ceiling_db: Option<f64>,
}

/// Everything a display needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumSnapshot {
    pub tick: u64,
    pub start_freq: f64,
    pub end_freq: f64,
    pub powers: Vec<f64>,
    pub peak: Option<Peak>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hold: Option<MaxHoldView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waterfall: Option<WaterfallView>,
    pub metrics: MetricsSnapshot,
}

impl SpectrumSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
