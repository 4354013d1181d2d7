use crate::processing::SpectrumSnapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// Latest-value channel between the tick task and display consumers.
///
/// Readers never block the tick: they only ever see the most recent
/// snapshot, and a slow reader simply skips intermediate ones.
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<SpectrumSnapshot>>,
}

pub type SnapshotReceiver = watch::Receiver<Arc<SpectrumSnapshot>>;

impl SnapshotPublisher {
    pub fn channel(initial: SpectrumSnapshot) -> (Self, SnapshotReceiver) {
        let (tx, rx) = watch::channel(Arc::new(initial));
        (Self { tx }, rx)
    }

    pub fn publish(&self, snapshot: SpectrumSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }
}
