use crate::ingest::SweepRecord;
use crate::math::{FrequencyAxis, StatsHelper};
use crate::prelude::{AnalyzerConfig, SpectrumResult, SpectrumStage};
use crate::processing::binner::{BinningOutcome, FrequencyBinner};
use crate::processing::max_hold::MaxHoldTracker;
use crate::processing::snapshot::{MaxHoldView, Peak, SpectrumSnapshot, WaterfallView};
use crate::processing::spectrum::SpectrumBuffer;
use crate::processing::waterfall::WaterfallBuffer;
use crate::telemetry::{LogManager, MetricsRecorder};
use std::sync::Arc;

/// Messages accepted by the task that owns the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Records completed by one ingestion cycle, in stream order.
    Records(Vec<SweepRecord>),
    SetMaxHold(bool),
    SetWaterfall(bool),
    Shutdown,
}

/// Single owner of the live spectrum and every view derived from it.
pub struct SpectrumEngine {
    config: AnalyzerConfig,
    axis: FrequencyAxis,
    spectrum: SpectrumBuffer,
    binner: FrequencyBinner,
    max_hold: MaxHoldTracker,
    waterfall: WaterfallBuffer,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
    ticks: u64,
    max_hold_requested: bool,
    spectrum_written: bool,
}

impl SpectrumEngine {
    pub fn new(config: AnalyzerConfig) -> SpectrumResult<Self> {
        Self::with_metrics(config, Arc::new(MetricsRecorder::new()))
    }

    pub fn with_metrics(
        config: AnalyzerConfig,
        metrics: Arc<MetricsRecorder>,
    ) -> SpectrumResult<Self> {
        config.validate()?;
        let bins = config.bin_count;
        Ok(Self {
            axis: FrequencyAxis::linspace(config.start_freq, config.end_freq, bins),
            spectrum: SpectrumBuffer::new(bins),
            binner: FrequencyBinner::from_config(&config),
            max_hold: MaxHoldTracker::new(bins),
            waterfall: WaterfallBuffer::new(
                config.waterfall_depth,
                bins,
                config.waterfall_sensitivity_db,
            ),
            metrics,
            logger: LogManager::new("sweepcore::engine"),
            ticks: 0,
            max_hold_requested: false,
            spectrum_written: false,
            config,
        })
    }

    /// Bins one ingestion cycle's worth of records into the live spectrum.
    ///
    /// The first batch that writes any bin also starts a max hold that was
    /// requested before data arrived.
    pub fn apply_records(&mut self, records: &[SweepRecord]) -> SpectrumResult<BinningOutcome> {
        let outcome = self.binner.apply_all(records, &mut self.spectrum);
        self.metrics.record_samples(outcome.applied, outcome.dropped);
        if outcome.applied == 0 {
            if !records.is_empty() {
                self.logger.detail(&format!(
                    "{} records produced no in-range samples",
                    records.len()
                ));
            }
            return Ok(outcome);
        }

        if !self.spectrum_written {
            self.spectrum_written = true;
            if self.max_hold_requested {
                self.max_hold.enable(self.spectrum.as_slice())?;
                self.logger.record("max hold enabled on first sweep");
            }
        }
        Ok(outcome)
    }

    /// Enabling before any sweep has been binned only arms max hold; the
    /// zero-filled startup spectrum is never held.
    pub fn set_max_hold(&mut self, enabled: bool) -> SpectrumResult<()> {
        if enabled == self.max_hold_requested {
            return Ok(());
        }
        self.max_hold_requested = enabled;
        if enabled {
            if self.spectrum_written {
                self.max_hold.enable(self.spectrum.as_slice())?;
                self.logger.record("max hold enabled");
            } else {
                self.logger.record("max hold armed, waiting for the first sweep");
            }
        } else {
            self.max_hold.disable();
            self.logger.record("max hold disabled, held values cleared");
        }
        Ok(())
    }

    pub fn set_waterfall(&mut self, enabled: bool) -> SpectrumResult<()> {
        if enabled == self.waterfall.is_enabled() {
            return Ok(());
        }
        if enabled {
            self.waterfall.enable(self.spectrum.as_slice())?;
            self.logger.record("waterfall enabled, history cleared");
        } else {
            self.waterfall.disable();
            self.logger.record("waterfall disabled");
        }
        Ok(())
    }

    /// Applies one command; returns `false` once the engine should stop.
    pub fn handle(&mut self, command: EngineCommand) -> SpectrumResult<bool> {
        match command {
            EngineCommand::Records(records) => {
                self.apply_records(&records)?;
            }
            EngineCommand::SetMaxHold(enabled) => self.set_max_hold(enabled)?,
            EngineCommand::SetWaterfall(enabled) => self.set_waterfall(enabled)?,
            EngineCommand::Shutdown => return Ok(false),
        }
        Ok(true)
    }

    /// Folds the current spectrum into max hold and the waterfall, then
    /// returns what a display should show.
    pub fn tick(&mut self) -> SpectrumResult<SpectrumSnapshot> {
        let spectrum = self.spectrum.as_slice();
        self.max_hold.update(spectrum)?;
        self.waterfall.update(spectrum)?;
        self.ticks += 1;
        self.metrics.record_tick();
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> SpectrumSnapshot {
        let max_hold = self.max_hold.is_active().then(|| MaxHoldView {
            values: self.max_hold.values().to_vec(),
            peak: self.max_hold_peak(),
        });
        let waterfall = self.waterfall.is_enabled().then(|| {
            let levels = self.waterfall.display_levels();
            WaterfallView {
                rows: (0..self.waterfall.depth())
                    .filter_map(|idx| self.waterfall.row(idx))
                    .map(|row| row.to_vec())
                    .collect(),
                cursor: self.waterfall.cursor(),
                filled: self.waterfall.filled(),
                floor_db: levels.map(|(floor, _)| floor),
                ceiling_db: levels.map(|(_, ceiling)| ceiling),
            }
        });

        SpectrumSnapshot {
            tick: self.ticks,
            start_freq: self.config.start_freq,
            end_freq: self.config.end_freq,
            powers: self.spectrum.as_slice().to_vec(),
            peak: self.peak(),
            max_hold,
            waterfall,
            metrics: self.metrics.snapshot(),
        }
    }

    /// Loudest bin of the live spectrum.
    pub fn peak(&self) -> Option<Peak> {
        let values = self.spectrum.as_slice();
        let bin = StatsHelper::argmax(values)?;
        self.peak_at(bin, values[bin])
    }

    /// Loudest held bin; `None` while max hold is inactive.
    pub fn max_hold_peak(&self) -> Option<Peak> {
        if !self.max_hold.is_active() {
            return None;
        }
        let (bin, power) = self.max_hold.peak()?;
        self.peak_at(bin, power)
    }

    fn peak_at(&self, bin: usize, power: f64) -> Option<Peak> {
        self.axis.frequency(bin).map(|frequency| Peak {
            bin,
            frequency,
            power,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn axis(&self) -> &FrequencyAxis {
        &self.axis
    }

    pub fn spectrum(&self) -> &SpectrumBuffer {
        &self.spectrum
    }

    pub fn max_hold(&self) -> &MaxHoldTracker {
        &self.max_hold
    }

    pub fn waterfall(&self) -> &WaterfallBuffer {
        &self.waterfall
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
