use serde::{Deserialize, Serialize};

pub const DEFAULT_START_FREQ_HZ: f64 = 1e9;
pub const DEFAULT_END_FREQ_HZ: f64 = 6e9;
pub const DEFAULT_BIN_COUNT: usize = 1000;
pub const DEFAULT_WATERFALL_DEPTH: usize = 100;
pub const DEFAULT_UPDATE_PERIOD_MS: u32 = 200;
pub const DEFAULT_WATERFALL_SENSITIVITY_DB: f64 = 60.0;

/// Display grid and update cadence shared by every processing component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Lower edge of the displayed span, in Hz.
    pub start_freq: f64,
    /// Upper edge of the displayed span, in Hz.
    pub end_freq: f64,
    /// Number of bins in the spectrum, max-hold and waterfall rows.
    pub bin_count: usize,
    /// Number of rows kept by the waterfall ring.
    pub waterfall_depth: usize,
    /// Period of the tick that feeds max hold and the waterfall.
    pub update_period_ms: u32,
    /// Dynamic range below the waterfall ceiling that is still drawn.
    pub waterfall_sensitivity_db: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            start_freq: DEFAULT_START_FREQ_HZ,
            end_freq: DEFAULT_END_FREQ_HZ,
            bin_count: DEFAULT_BIN_COUNT,
            waterfall_depth: DEFAULT_WATERFALL_DEPTH,
            update_period_ms: DEFAULT_UPDATE_PERIOD_MS,
            waterfall_sensitivity_db: DEFAULT_WATERFALL_SENSITIVITY_DB,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> SpectrumResult<()> {
        if !self.start_freq.is_finite() || !self.end_freq.is_finite() {
            return Err(SpectrumError::InvalidConfig(
                "frequency range must be finite".into(),
            ));
        }
        if self.start_freq >= self.end_freq {
            return Err(SpectrumError::InvalidConfig(format!(
                "start frequency {} must be below end frequency {}",
                self.start_freq, self.end_freq
            )));
        }
        if self.bin_count == 0 {
            return Err(SpectrumError::InvalidConfig(
                "bin count must be non-zero".into(),
            ));
        }
        if self.waterfall_depth == 0 {
            return Err(SpectrumError::InvalidConfig(
                "waterfall depth must be non-zero".into(),
            ));
        }
        if self.update_period_ms == 0 {
            return Err(SpectrumError::InvalidConfig(
                "update period must be non-zero".into(),
            ));
        }
        if !(self.waterfall_sensitivity_db.is_finite() && self.waterfall_sensitivity_db > 0.0) {
            return Err(SpectrumError::InvalidConfig(
                "waterfall sensitivity must be a positive number of dB".into(),
            ));
        }
        Ok(())
    }

    pub fn range(&self) -> (f64, f64) {
        (self.start_freq, self.end_freq)
    }
}

/// Common error type for the processing core.
#[derive(thiserror::Error, Debug)]
pub enum SpectrumError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("length mismatch: expected {expected} bins, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("stream i/o: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpectrumResult<T> = Result<T, SpectrumError>;

/// A view derived from the live spectrum on every tick.
///
/// Stages start disabled; each disabled-to-enabled transition discards
/// whatever history the stage held before.
pub trait SpectrumStage {
    fn enable(&mut self, current: &[f64]) -> SpectrumResult<()>;
    fn disable(&mut self);
    fn update(&mut self, spectrum: &[f64]) -> SpectrumResult<()>;
    fn is_enabled(&self) -> bool;
}

pub(crate) fn ensure_len(expected: usize, actual: usize) -> SpectrumResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SpectrumError::LengthMismatch { expected, actual })
    }
}
