pub mod axis;
pub mod stats;

pub use axis::FrequencyAxis;
pub use stats::StatsHelper;
