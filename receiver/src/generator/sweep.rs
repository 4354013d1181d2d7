use anyhow::{bail, Context};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use sweepcore::AnalyzerConfig;

/// Shape of the synthetic `hackrf_sweep`-style output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepProfile {
    pub start_freq: f64,
    pub end_freq: f64,
    pub bin_width: f64,
    pub samples_per_line: usize,
    pub noise_floor_db: f64,
    pub noise_db: f64,
    pub tone_freq: f64,
    pub tone_db: f64,
    pub seed: u64,
}

impl Default for SweepProfile {
    fn default() -> Self {
        Self {
            start_freq: 1e9,
            end_freq: 6e9,
            bin_width: 1e6,
            samples_per_line: 5,
            noise_floor_db: -90.0,
            noise_db: 3.0,
            tone_freq: 2.45e9,
            tone_db: -30.0,
            seed: 0,
        }
    }
}

impl SweepProfile {
    /// Covers the analyzer's span with a tone in its middle.
    pub fn spanning(config: &AnalyzerConfig) -> Self {
        let span = config.end_freq - config.start_freq;
        Self {
            start_freq: config.start_freq,
            end_freq: config.end_freq,
            bin_width: span / config.bin_count.max(1) as f64,
            tone_freq: config.start_freq + span / 2.0,
            ..Default::default()
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(self.bin_width > 0.0) {
            bail!("bin width must be positive, got {}", self.bin_width);
        }
        if self.samples_per_line == 0 {
            bail!("samples per line must be non-zero");
        }
        if !(self.start_freq < self.end_freq) {
            bail!(
                "start frequency {} must be below end frequency {}",
                self.start_freq,
                self.end_freq
            );
        }
        Ok(())
    }
}

const HEADER: &str = "# date, time, hz_low, hz_high, hz_bin_width, num_samples, dB, dB, ...\n";
// Rough width of the fixed fields and of one ", -xx.xx" sample.
const LINE_PREFIX_BYTES: usize = 64;
const SAMPLE_BYTES: usize = 8;

/// Renders `sweeps` full passes over the profile's span, one header comment
/// first, then one line per `samples_per_line` bins.
pub fn build_sweep_lines(profile: &SweepProfile, sweeps: usize) -> anyhow::Result<String> {
    profile.validate()?;
    let bins_per_sweep = ((profile.end_freq - profile.start_freq) / profile.bin_width).ceil() as usize;
    let line_span = profile.bin_width * profile.samples_per_line as f64;
    let lines_per_sweep = bins_per_sweep.div_ceil(profile.samples_per_line);
    let line_count = lines_per_sweep
        .checked_mul(sweeps)
        .context("overflow computing line count for generator")?;
    let capacity = line_count
        .checked_mul(LINE_PREFIX_BYTES + SAMPLE_BYTES * profile.samples_per_line)
        .context("overflow sizing generator output")?;

    let mut rng = StdRng::seed_from_u64(profile.seed);
    let mut output = String::with_capacity(HEADER.len() + capacity);
    output.push_str(HEADER);

    for sweep in 0..sweeps {
        let time = format!(
            "{:02}:{:02}:{:02}",
            sweep / 3600 % 24,
            sweep / 60 % 60,
            sweep % 60
        );
        for line in 0..lines_per_sweep {
            let hz_low = profile.start_freq + line as f64 * line_span;
            let hz_high = hz_low + line_span;
            write!(
                output,
                "2024-01-01, {}, {:.0}, {:.0}, {:.2}, {}",
                time, hz_low, hz_high, profile.bin_width, profile.samples_per_line
            )?;
            for sample in 0..profile.samples_per_line {
                let frequency = hz_low + sample as f64 * profile.bin_width;
                let power = if (frequency - profile.tone_freq).abs() < profile.bin_width / 2.0 {
                    profile.tone_db
                } else if profile.noise_db > 0.0 {
                    profile.noise_floor_db + rng.gen_range(-profile.noise_db..profile.noise_db)
                } else {
                    profile.noise_floor_db
                };
                write!(output, ", {:.2}", power)?;
            }
            output.push('\n');
        }
    }

    Ok(output)
}
