pub mod binner;
pub mod engine;
pub mod max_hold;
pub mod snapshot;
pub mod spectrum;
pub mod waterfall;

pub use binner::{BinningOutcome, FrequencyBinner};
pub use engine::{EngineCommand, SpectrumEngine};
pub use max_hold::{MaxHoldState, MaxHoldTracker};
pub use snapshot::{MaxHoldView, Peak, SpectrumSnapshot, WaterfallView};
pub use spectrum::SpectrumBuffer;
pub use waterfall::WaterfallBuffer;
