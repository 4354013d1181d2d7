pub mod decoder;
pub mod demux;
pub mod record;
pub mod source;

pub use decoder::{DecodedBatch, SweepDecoder};
pub use demux::StreamDemuxer;
pub use record::{RecordParser, RecordRejection, SweepRecord};
pub use source::{ChunkSource, ManualSource, ReaderSource};
