//! Core sweep-processing library for the spectrum receiver.
//!
//! Bytes from a sweep source are split into records, parsed, binned onto a
//! fixed frequency grid and folded into max-hold and waterfall views. The
//! [`processing::SpectrumEngine`] owns all mutable state; transports and
//! displays only talk to it through commands and snapshots.

pub mod ingest;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{AnalyzerConfig, SpectrumError, SpectrumResult, SpectrumStage};
