use crate::ingest::demux::StreamDemuxer;
use crate::ingest::record::{RecordParser, RecordRejection, SweepRecord};
use crate::telemetry::{LogManager, MetricsRecorder};
use std::sync::Arc;

/// Records completed by one chunk of input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBatch {
    pub records: Vec<SweepRecord>,
    pub skipped: usize,
}

impl DecodedBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Byte stream to parsed sweep records, one chunk at a time.
pub struct SweepDecoder {
    demuxer: StreamDemuxer,
    parser: RecordParser,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl SweepDecoder {
    pub fn new(metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            demuxer: StreamDemuxer::new(),
            parser: RecordParser::new(),
            metrics,
            logger: LogManager::new("sweepcore::ingest"),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> DecodedBatch {
        self.metrics.record_chunk(chunk.len());
        self.logger
            .detail(&format!("received data chunk: {} bytes", chunk.len()));

        let mut batch = DecodedBatch::default();
        for raw in self.demuxer.feed(chunk) {
            match self.parser.classify(&raw) {
                Ok(record) => batch.records.push(record),
                Err(RecordRejection::Comment) | Err(RecordRejection::Empty) => {
                    batch.skipped += 1;
                }
                Err(reason) => {
                    batch.skipped += 1;
                    self.logger.detail(&format!(
                        "skipping record {:?}: {}",
                        String::from_utf8_lossy(&raw),
                        reason
                    ));
                }
            }
        }

        self.metrics
            .record_records(batch.records.len(), batch.skipped);
        if batch.is_empty() {
            self.logger.detail(&format!(
                "no complete records yet, {} bytes pending",
                self.demuxer.pending().len()
            ));
        }
        batch
    }

    pub fn pending_bytes(&self) -> usize {
        self.demuxer.pending().len()
    }
}
