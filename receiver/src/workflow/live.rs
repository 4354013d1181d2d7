use crate::bridge::DisplayBridge;
use crate::workflow::config::ReceiverConfig;
use crate::workflow::ingest::ingest_stream;
use crate::workflow::runner::EngineRunner;
use anyhow::Context;
use log::{info, warn};
use std::future::{self, Future};
use sweepcore::ingest::SweepDecoder;
use sweepcore::processing::{EngineCommand, SpectrumEngine};
use sweepcore::telemetry::SnapshotPublisher;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::mpsc;

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Resolves on Ctrl+C. Without a handler the session only ends when the
/// source hangs up.
pub async fn interrupted() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("Ctrl+C handler unavailable: {}", err);
        future::pending::<()>().await;
    }
}

/// Accepts one sweep source and processes it until the source hangs up or
/// `shutdown` resolves. Returns the engine with its final state.
pub async fn run_live<F>(
    config: &ReceiverConfig,
    engine: SpectrumEngine,
    mut decoder: SweepDecoder,
    serve: bool,
    shutdown: F,
) -> anyhow::Result<SpectrumEngine>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding sweep listener on {}", addr))?;
    info!("waiting for a sweep source on {}...", addr);

    let (stream, peer) = tokio::select! {
        accepted = listener.accept() => accepted.context("accepting sweep source")?,
        _ = &mut shutdown => {
            info!("interrupted before a sweep source connected");
            return Ok(engine);
        }
    };
    drop(listener);
    info!("sweep source connected: {}", peer);

    let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let (publisher, snapshots) = SnapshotPublisher::channel(engine.snapshot());
    let bridge = if serve {
        let bridge = DisplayBridge::spawn(config.bridge_addr(), snapshots, commands.clone())?;
        info!("display bridge serving http://{}/spectrum", bridge.addr());
        Some(bridge)
    } else {
        None
    };
    let runner = tokio::spawn(EngineRunner::new(engine, command_rx, publisher).run());

    let outcome = tokio::select! {
        result = ingest_stream(stream, &mut decoder, &commands, config.chunk_size) => result.map(Some),
        _ = &mut shutdown => Ok(None),
    };
    match &outcome {
        Ok(Some(report)) => info!(
            "sweep source closed the stream after {} bytes in {} chunks ({} records, {} skipped)",
            report.bytes, report.chunks, report.records, report.skipped
        ),
        Ok(None) => info!("stopped by user"),
        Err(err) => warn!("ingestion failed: {:#}", err),
    }
    info!("connection to {} closed", peer);

    if commands.send(EngineCommand::Shutdown).await.is_err() {
        warn!("engine task exited before shutdown");
    }
    let engine = runner.await.context("joining engine task")??;
    if let Some(bridge) = bridge {
        bridge.shutdown();
    }
    outcome?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sweepcore::telemetry::MetricsRecorder;
    use sweepcore::AnalyzerConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;
    use tokio::time::{sleep, timeout, Duration};

    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    fn session_parts(port: u16) -> (ReceiverConfig, SpectrumEngine, SweepDecoder) {
        let analyzer = AnalyzerConfig {
            start_freq: 100.0,
            end_freq: 200.0,
            bin_count: 10,
            update_period_ms: 10,
            ..Default::default()
        };
        let config = ReceiverConfig::from_args("127.0.0.1".into(), port, analyzer.clone());
        let metrics = Arc::new(MetricsRecorder::new());
        let engine = SpectrumEngine::with_metrics(analyzer, metrics.clone()).unwrap();
        (config, engine, SweepDecoder::new(metrics))
    }

    async fn connect(port: u16) -> TcpStream {
        loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => break stream,
                Err(_) => sleep(Duration::from_millis(10)).await,
            }
        }
    }

    #[tokio::test]
    async fn live_session_processes_until_source_hangs_up() {
        let port = free_port();
        let (config, engine, decoder) = session_parts(port);
        let session = tokio::spawn(async move {
            run_live(&config, engine, decoder, false, future::pending()).await
        });

        let mut client = connect(port).await;
        client
            .write_all(b"# from test\nd,t,150,200,10,2,-33,-44\n")
            .await
            .unwrap();
        client.shutdown().await.unwrap();
        drop(client);

        let engine = session.await.unwrap().unwrap();
        assert_eq!(engine.spectrum().get(5), Some(-33.0));
        assert_eq!(engine.spectrum().get(6), Some(-44.0));
        assert_eq!(engine.metrics().snapshot().records_skipped, 1);
    }

    #[tokio::test]
    async fn interrupt_mid_stream_keeps_state_and_closes_connection() {
        let port = free_port();
        let (config, engine, decoder) = session_parts(port);
        let (stop, stopped) = oneshot::channel::<()>();
        let session = tokio::spawn(async move {
            let shutdown = async move {
                let _ = stopped.await;
            };
            run_live(&config, engine, decoder, false, shutdown).await
        });

        let mut client = connect(port).await;
        client.write_all(b"d,t,120,200,10,1,-21\n").await.unwrap();
        sleep(Duration::from_millis(100)).await;
        stop.send(()).unwrap();

        let engine = session.await.unwrap().unwrap();
        assert_eq!(engine.spectrum().get(2), Some(-21.0));
        assert_eq!(engine.metrics().snapshot().records_parsed, 1);

        let mut buf = [0u8; 16];
        let read = timeout(Duration::from_secs(2), client.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read, 0);
    }

    #[tokio::test]
    async fn interrupt_before_any_source_returns_untouched_engine() {
        let port = free_port();
        let (config, engine, decoder) = session_parts(port);
        let before = engine.spectrum().clone();

        let engine = run_live(&config, engine, decoder, false, future::ready(()))
            .await
            .unwrap();
        assert_eq!(engine.spectrum(), &before);
        assert_eq!(engine.ticks(), 0);
    }
}
