use anyhow::Context;
use sweepcore::ingest::SweepDecoder;
use sweepcore::processing::EngineCommand;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub chunks: usize,
    pub bytes: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Reads `stream` until it reports end of stream, forwarding every batch of
/// parsed records to the engine task.
///
/// The stream is owned by this future, so it is closed whenever the future
/// completes, fails or is dropped.
pub async fn ingest_stream<S>(
    mut stream: S,
    decoder: &mut SweepDecoder,
    commands: &mpsc::Sender<EngineCommand>,
    chunk_size: usize,
) -> anyhow::Result<IngestReport>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut report = IngestReport::default();

    loop {
        let read = stream
            .read(&mut buffer)
            .await
            .context("reading sweep stream")?;
        if read == 0 {
            break;
        }
        report.chunks += 1;
        report.bytes += read;

        let batch = decoder.feed(&buffer[..read]);
        report.records += batch.records.len();
        report.skipped += batch.skipped;
        if batch.records.is_empty() {
            continue;
        }
        commands
            .send(EngineCommand::Records(batch.records))
            .await
            .context("engine task stopped accepting records")?;
    }

    Ok(report)
}
