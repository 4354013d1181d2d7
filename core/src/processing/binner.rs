use crate::ingest::SweepRecord;
use crate::prelude::AnalyzerConfig;
use crate::processing::spectrum::SpectrumBuffer;
use std::ops::AddAssign;

/// Samples written and samples discarded while binning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinningOutcome {
    pub applied: usize,
    pub dropped: usize,
}

impl AddAssign for BinningOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.applied += rhs.applied;
        self.dropped += rhs.dropped;
    }
}

/// Maps absolute sample frequencies onto a fixed grid of `bins` slots over
/// the closed range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBinner {
    start: f64,
    end: f64,
    bins: usize,
}

impl FrequencyBinner {
    pub fn new(range: (f64, f64), bins: usize) -> Self {
        Self {
            start: range.0,
            end: range.1,
            bins,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.range(), config.bin_count)
    }

    pub fn bin_index(&self, frequency: f64) -> Option<usize> {
        bin_index(frequency, (self.start, self.end), self.bins)
    }

    /// Overwrites the bins hit by `record`; the last sample mapped to a bin wins.
    pub fn apply(&self, record: &SweepRecord, buffer: &mut SpectrumBuffer) -> BinningOutcome {
        bin_record(
            record,
            buffer.as_mut_slice(),
            (self.start, self.end),
            self.bins,
        )
    }

    pub fn apply_all(&self, records: &[SweepRecord], buffer: &mut SpectrumBuffer) -> BinningOutcome {
        let mut outcome = BinningOutcome::default();
        for record in records {
            outcome += self.apply(record, buffer);
        }
        outcome
    }
}

pub fn bin_index(frequency: f64, range: (f64, f64), bins: usize) -> Option<usize> {
    let (start, end) = range;
    if !(start <= frequency && frequency <= end) {
        return None;
    }
    let position = ((frequency - start) / (end - start) * bins as f64).floor();
    if position >= 0.0 && position < bins as f64 {
        Some(position as usize)
    } else {
        None
    }
}

pub fn bin_record(
    record: &SweepRecord,
    buffer: &mut [f64],
    range: (f64, f64),
    bins: usize,
) -> BinningOutcome {
    let mut outcome = BinningOutcome::default();
    for (frequency, power) in record.samples() {
        let slot = match bin_index(frequency, range, bins) {
            Some(idx) => buffer.get_mut(idx),
            None => None,
        };
        match slot {
            Some(slot) => {
                *slot = power;
                outcome.applied += 1;
            }
            None => outcome.dropped += 1,
        }
    }
    outcome
}
