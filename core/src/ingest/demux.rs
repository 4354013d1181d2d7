const TERMINATOR: u8 = b'\n';

/// Splits an arbitrary byte stream into newline-terminated records.
///
/// The trailing unterminated fragment of every chunk is carried over to the
/// next call; bytes are never dropped.
#[derive(Debug, Default)]
pub struct StreamDemuxer {
    pending: Vec<u8>,
}

impl StreamDemuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every record it completed, in order,
    /// without their terminators.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(chunk);

        let Some(last) = self.pending.iter().rposition(|&b| b == TERMINATOR) else {
            return Vec::new();
        };

        let remainder = self.pending.split_off(last + 1);
        let complete = std::mem::replace(&mut self.pending, remainder);
        complete[..last]
            .split(|&b| b == TERMINATOR)
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Bytes received since the last terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}
