use crate::prelude::SpectrumResult;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Anything that yields raw chunks of a sweep stream.
///
/// An empty chunk means the stream has ended.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> SpectrumResult<Vec<u8>>;
}

/// Adapts a blocking reader (file, socket, pipe) into a chunk source.
pub struct ReaderSource<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buffer: vec![0; chunk_size.max(1)],
        }
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> SpectrumResult<Vec<u8>> {
        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(read) => return Ok(self.buffer[..read].to_vec()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Vec<u8>>,
}

impl ManualSource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            queue: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChunkSource for ManualSource {
    fn next_chunk(&mut self) -> SpectrumResult<Vec<u8>> {
        Ok(self.queue.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reader_source_chunks_and_ends_with_empty() {
        let mut source = ReaderSource::with_chunk_size(Cursor::new(b"abcdef".to_vec()), 4);
        assert_eq!(source.next_chunk().unwrap(), b"abcd");
        assert_eq!(source.next_chunk().unwrap(), b"ef");
        assert!(source.next_chunk().unwrap().is_empty());
    }

    #[test]
    fn manual_source_drains_in_order() {
        let mut source = ManualSource::new(vec!["one", "two"]);
        assert_eq!(source.next_chunk().unwrap(), b"one");
        assert_eq!(source.next_chunk().unwrap(), b"two");
        assert!(source.next_chunk().unwrap().is_empty());
    }
}
