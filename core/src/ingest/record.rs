use serde::{Deserialize, Serialize};

const START_FREQ_FIELD: usize = 2;
const BIN_WIDTH_FIELD: usize = 4;
const FIRST_POWER_FIELD: usize = 6;

/// One parsed sweep line: a start frequency, a bin width and the power
/// readings that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub start_freq: f64,
    pub bin_width: f64,
    pub powers: Vec<f64>,
}

impl SweepRecord {
    pub fn new(start_freq: f64, bin_width: f64, powers: Vec<f64>) -> Self {
        Self {
            start_freq,
            bin_width,
            powers,
        }
    }

    /// Absolute frequency of sample `index`.
    pub fn frequency_of(&self, index: usize) -> f64 {
        self.start_freq + index as f64 * self.bin_width
    }

    /// `(frequency, power)` pairs in sample order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.powers
            .iter()
            .enumerate()
            .map(|(idx, &power)| (self.frequency_of(idx), power))
    }
}

/// Why a record was skipped.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordRejection {
    #[error("empty line")]
    Empty,
    #[error("comment line")]
    Comment,
    #[error("record is not valid UTF-8 text")]
    NotText,
    #[error("expected at least {min} fields, got {0}", min = FIRST_POWER_FIELD + 1)]
    TooFewFields(usize),
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: usize, value: String },
}

/// Stateless parser for comma-separated sweep lines.
///
/// Only fields 2 (start frequency), 4 (bin width) and 6.. (power samples)
/// are read; the rest pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, record: &[u8]) -> Option<SweepRecord> {
        self.classify(record).ok()
    }

    pub fn classify(&self, record: &[u8]) -> Result<SweepRecord, RecordRejection> {
        let text = std::str::from_utf8(record).map_err(|_| RecordRejection::NotText)?;
        let line = text.trim();
        if line.is_empty() {
            return Err(RecordRejection::Empty);
        }
        if line.starts_with('#') {
            return Err(RecordRejection::Comment);
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= FIRST_POWER_FIELD {
            return Err(RecordRejection::TooFewFields(fields.len()));
        }

        let start_freq = parse_field(&fields, START_FREQ_FIELD)?;
        let bin_width = parse_field(&fields, BIN_WIDTH_FIELD)?;
        let powers = (FIRST_POWER_FIELD..fields.len())
            .map(|idx| parse_field(&fields, idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SweepRecord::new(start_freq, bin_width, powers))
    }
}

fn parse_field(fields: &[&str], field: usize) -> Result<f64, RecordRejection> {
    let raw = fields[field].trim();
    raw.parse::<f64>()
        .map_err(|_| RecordRejection::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
