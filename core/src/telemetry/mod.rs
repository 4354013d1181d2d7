pub mod log;
pub mod metrics;
pub mod publish;

pub use log::LogManager;
pub use metrics::{MetricsRecorder, MetricsSnapshot};
pub use publish::{SnapshotPublisher, SnapshotReceiver};
