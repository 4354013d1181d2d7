use anyhow::Context;
use sweepcore::ingest::{ChunkSource, SweepDecoder};
use sweepcore::processing::{SpectrumEngine, SpectrumSnapshot};

pub struct ReplayReport {
    pub chunks: usize,
    pub records: usize,
    pub skipped: usize,
    /// Trailing bytes never closed by a terminator; they are not parsed.
    pub unterminated: usize,
    pub snapshot: SpectrumSnapshot,
}

/// Drives a captured stream through the engine on the calling thread,
/// ticking once after every chunk.
pub fn replay<S>(
    source: &mut S,
    decoder: &mut SweepDecoder,
    engine: &mut SpectrumEngine,
) -> anyhow::Result<ReplayReport>
where
    S: ChunkSource + ?Sized,
{
    let mut chunks = 0;
    let mut records = 0;
    let mut skipped = 0;

    loop {
        let chunk = source.next_chunk().context("reading replay chunk")?;
        if chunk.is_empty() {
            break;
        }
        chunks += 1;
        let batch = decoder.feed(&chunk);
        records += batch.records.len();
        skipped += batch.skipped;
        engine
            .apply_records(&batch.records)
            .context("binning replay records")?;
        engine.tick().context("ticking spectrum engine")?;
    }

    Ok(ReplayReport {
        chunks,
        records,
        skipped,
        unterminated: decoder.pending_bytes(),
        snapshot: engine.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use sweepcore::ingest::{ManualSource, ReaderSource};
    use sweepcore::telemetry::MetricsRecorder;
    use sweepcore::AnalyzerConfig;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            start_freq: 0.0,
            end_freq: 1000.0,
            bin_count: 10,
            waterfall_depth: 2,
            ..Default::default()
        }
    }

    #[test]
    fn replay_ticks_once_per_chunk() {
        let metrics = Arc::new(MetricsRecorder::new());
        let mut decoder = SweepDecoder::new(metrics.clone());
        let mut engine = SpectrumEngine::with_metrics(config(), metrics).unwrap();
        engine.set_waterfall(true).unwrap();

        let mut source = ManualSource::new(vec![
            "d,t,0,1000,100,2,-10,-20\nd,t,".to_string(),
            "200,1000,100,1,-30\n# done\n".to_string(),
        ]);
        let report = replay(&mut source, &mut decoder, &mut engine).unwrap();

        assert_eq!(report.chunks, 2);
        assert_eq!(report.records, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.unterminated, 0);
        assert_eq!(report.snapshot.tick, 2);
        assert_eq!(&report.snapshot.powers[..3], &[-10.0, -20.0, -30.0]);
        let waterfall = report.snapshot.waterfall.unwrap();
        assert_eq!(waterfall.cursor, 0);
        assert_eq!(waterfall.filled, 2);
    }

    #[test]
    fn max_hold_requested_before_replay_holds_received_levels() {
        let mut decoder = SweepDecoder::new(Arc::new(MetricsRecorder::new()));
        let mut engine = SpectrumEngine::new(config()).unwrap();
        engine.set_max_hold(true).unwrap();

        let mut source = ManualSource::new(vec![
            "# preamble\n".to_string(),
            "d,t,0,1000,100,2,-70,-75\n".to_string(),
        ]);
        let report = replay(&mut source, &mut decoder, &mut engine).unwrap();

        let held = report.snapshot.max_hold.unwrap();
        assert_eq!(held.values[0], Some(-70.0));
        assert_eq!(held.values[1], Some(-75.0));
    }

    #[test]
    fn unterminated_tail_is_reported_not_parsed() {
        let mut decoder = SweepDecoder::new(Arc::new(MetricsRecorder::new()));
        let mut engine = SpectrumEngine::new(config()).unwrap();
        let mut source = ManualSource::new(vec!["d,t,0,1000,100,1,-5\nd,t,300".to_string()]);

        let report = replay(&mut source, &mut decoder, &mut engine).unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(report.unterminated, 7);
        assert_eq!(report.snapshot.powers[3], 0.0);
    }

    #[test]
    fn replay_reads_from_any_reader() {
        let mut decoder = SweepDecoder::new(Arc::new(MetricsRecorder::new()));
        let mut engine = SpectrumEngine::new(config()).unwrap();
        let capture = Cursor::new(b"d,t,500,1000,100,1,-5\n".to_vec());
        let mut source = ReaderSource::with_chunk_size(capture, 7);

        let report = replay(&mut source, &mut decoder, &mut engine).unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(report.unterminated, 0);
        assert_eq!(report.snapshot.powers[5], -5.0);
    }
}
