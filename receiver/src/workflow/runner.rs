use anyhow::Context;
use std::time::Duration;
use sweepcore::processing::{EngineCommand, SpectrumEngine};
use sweepcore::telemetry::SnapshotPublisher;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

/// Owns the engine: applies commands as they arrive and ticks max hold and
/// the waterfall on a fixed period, publishing a snapshot after each tick.
pub struct EngineRunner {
    engine: SpectrumEngine,
    commands: mpsc::Receiver<EngineCommand>,
    publisher: SnapshotPublisher,
    period: Duration,
}

impl EngineRunner {
    pub fn new(
        engine: SpectrumEngine,
        commands: mpsc::Receiver<EngineCommand>,
        publisher: SnapshotPublisher,
    ) -> Self {
        let period = Duration::from_millis(u64::from(engine.config().update_period_ms));
        Self {
            engine,
            commands,
            publisher,
            period,
        }
    }

    /// Runs until `Shutdown` arrives or every sender is gone, then hands the
    /// engine back with its last state intact.
    pub async fn run(mut self) -> anyhow::Result<SpectrumEngine> {
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    let keep_running = self
                        .engine
                        .handle(command)
                        .context("applying engine command")?;
                    if !keep_running {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let snapshot = self.engine.tick().context("ticking spectrum engine")?;
                    self.publisher.publish(snapshot);
                }
            }
        }

        self.publisher.publish(self.engine.snapshot());
        Ok(self.engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepcore::ingest::SweepRecord;
    use sweepcore::AnalyzerConfig;

    fn engine() -> SpectrumEngine {
        SpectrumEngine::new(AnalyzerConfig {
            start_freq: 0.0,
            end_freq: 100.0,
            bin_count: 10,
            waterfall_depth: 4,
            update_period_ms: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn runner_applies_commands_and_returns_engine() {
        let engine = engine();
        let (publisher, snapshots) = SnapshotPublisher::channel(engine.snapshot());
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(EngineRunner::new(engine, rx, publisher).run());

        tx.send(EngineCommand::Records(vec![SweepRecord::new(
            50.0,
            10.0,
            vec![-12.0, -34.0],
        )]))
        .await
        .unwrap();
        tx.send(EngineCommand::SetMaxHold(true)).await.unwrap();
        time::sleep(Duration::from_millis(30)).await;
        tx.send(EngineCommand::Shutdown).await.unwrap();

        let engine = handle.await.unwrap().unwrap();
        assert_eq!(engine.spectrum().get(5), Some(-12.0));
        assert_eq!(engine.spectrum().get(6), Some(-34.0));
        assert!(engine.ticks() > 0);
        assert_eq!(engine.max_hold().values()[5], Some(-12.0));

        let latest = snapshots.borrow().clone();
        assert_eq!(latest.powers[5], -12.0);
        assert!(latest.max_hold.is_some());
    }

    #[tokio::test]
    async fn runner_stops_when_senders_drop() {
        let engine = engine();
        let (publisher, _snapshots) = SnapshotPublisher::channel(engine.snapshot());
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let engine = EngineRunner::new(engine, rx, publisher).run().await.unwrap();
        assert_eq!(engine.spectrum().get(0), Some(0.0));
    }
}
