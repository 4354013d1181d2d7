use anyhow::Context;
use clap::Parser;
use generator::sweep::{build_sweep_lines, SweepProfile};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use sweepcore::ingest::{ManualSource, ReaderSource, SweepDecoder};
use sweepcore::prelude::{
    AnalyzerConfig, DEFAULT_BIN_COUNT, DEFAULT_END_FREQ_HZ, DEFAULT_START_FREQ_HZ,
    DEFAULT_UPDATE_PERIOD_MS, DEFAULT_WATERFALL_DEPTH, DEFAULT_WATERFALL_SENSITIVITY_DB,
};
use sweepcore::processing::SpectrumEngine;
use sweepcore::telemetry::MetricsRecorder;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::{ReceiverConfig, DEFAULT_BRIDGE_PORT, DEFAULT_LISTEN, DEFAULT_PORT};
use workflow::live::{interrupted, run_live};
use workflow::replay::replay;
use workflow::report::{summarize, write_report};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Receives sweep records over TCP and keeps live, max-hold and waterfall spectra"
)]
struct Args {
    /// Load receiver settings from YAML; the listener, span and timing flags
    /// cannot be combined with it, while --max-hold and --waterfall still apply
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_LISTEN, conflicts_with = "config")]
    listen: String,
    #[arg(long, default_value_t = DEFAULT_PORT, conflicts_with = "config")]
    port: u16,
    /// Lower edge of the display span in Hz
    #[arg(long, default_value_t = DEFAULT_START_FREQ_HZ, conflicts_with = "config")]
    start_freq: f64,
    /// Upper edge of the display span in Hz
    #[arg(long, default_value_t = DEFAULT_END_FREQ_HZ, conflicts_with = "config")]
    end_freq: f64,
    #[arg(long, default_value_t = DEFAULT_BIN_COUNT, conflicts_with = "config")]
    bins: usize,
    #[arg(long, default_value_t = DEFAULT_WATERFALL_DEPTH, conflicts_with = "config")]
    waterfall_depth: usize,
    #[arg(long, default_value_t = DEFAULT_UPDATE_PERIOD_MS, conflicts_with = "config")]
    update_period_ms: u32,
    /// Dynamic range of the waterfall below its loudest value, in dB
    #[arg(long, default_value_t = DEFAULT_WATERFALL_SENSITIVITY_DB, conflicts_with = "config")]
    sensitivity_db: f64,
    /// Start with max hold enabled
    #[arg(long, default_value_t = false)]
    max_hold: bool,
    /// Start with the waterfall enabled
    #[arg(long, default_value_t = false)]
    waterfall: bool,
    /// Publish snapshots over HTTP for display clients
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = DEFAULT_BRIDGE_PORT, conflicts_with = "config")]
    bridge_port: u16,
    /// Process a captured sweep file offline instead of listening
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Process this many generated sweeps offline instead of listening
    #[arg(long)]
    synthetic: Option<usize>,
    /// Write the final snapshot as JSON after an offline run
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn receiver_config(&self) -> anyhow::Result<ReceiverConfig> {
        let mut config = if let Some(path) = &self.config {
            ReceiverConfig::load(path)?
        } else {
            let analyzer = AnalyzerConfig {
                start_freq: self.start_freq,
                end_freq: self.end_freq,
                bin_count: self.bins,
                waterfall_depth: self.waterfall_depth,
                update_period_ms: self.update_period_ms,
                waterfall_sensitivity_db: self.sensitivity_db,
            };
            let mut config = ReceiverConfig::from_args(self.listen.clone(), self.port, analyzer);
            config.bridge_port = self.bridge_port;
            config
        };
        config.max_hold |= self.max_hold;
        config.waterfall |= self.waterfall;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.receiver_config()?;

    let metrics = Arc::new(MetricsRecorder::new());
    let mut engine = SpectrumEngine::with_metrics(config.to_analyzer_config(), metrics.clone())
        .context("building spectrum engine")?;
    engine.set_max_hold(config.max_hold)?;
    engine.set_waterfall(config.waterfall)?;
    let mut decoder = SweepDecoder::new(metrics);

    if args.replay.is_some() || args.synthetic.is_some() {
        let report = if let Some(path) = &args.replay {
            let file = File::open(path)
                .with_context(|| format!("opening capture {}", path.display()))?;
            let mut source = ReaderSource::with_chunk_size(file, config.chunk_size);
            replay(&mut source, &mut decoder, &mut engine)?
        } else {
            let sweeps = args.synthetic.unwrap_or_default();
            let profile = SweepProfile::spanning(&config.analyzer);
            let text = build_sweep_lines(&profile, sweeps)?;
            let chunks = text
                .as_bytes()
                .chunks(config.chunk_size.max(1))
                .map(<[u8]>::to_vec)
                .collect::<Vec<_>>();
            replay(&mut ManualSource::new(chunks), &mut decoder, &mut engine)?
        };

        println!(
            "Offline run -> chunks {}, records {}, skipped {}",
            report.chunks, report.records, report.skipped
        );
        if report.unterminated > 0 {
            println!(
                "Ignored {} trailing bytes without a line terminator",
                report.unterminated
            );
        }
        println!("{}", summarize(&report.snapshot));
        if let Some(path) = &args.report {
            write_report(path, &report.snapshot)?;
        }
        return Ok(());
    }

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the receiver")?;
    let engine = runtime.block_on(run_live(
        &config,
        engine,
        decoder,
        args.serve,
        interrupted(),
    ))?;
    println!("{}", summarize(&engine.snapshot()));

    Ok(())
}
