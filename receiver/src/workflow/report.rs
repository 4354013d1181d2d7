use anyhow::Context;
use std::fs;
use std::path::Path;
use sweepcore::processing::{Peak, SpectrumSnapshot};

fn describe_peak(label: &str, peak: &Peak) -> String {
    format!(
        "{}: {:.2} MHz {:.2} dB",
        label,
        peak.frequency / 1e6,
        peak.power
    )
}

pub fn summarize(snapshot: &SpectrumSnapshot) -> String {
    let mut parts = vec![format!(
        "ticks={} records={} skipped={} samples={} dropped={}",
        snapshot.tick,
        snapshot.metrics.records_parsed,
        snapshot.metrics.records_skipped,
        snapshot.metrics.samples_applied,
        snapshot.metrics.samples_dropped
    )];
    if let Some(peak) = &snapshot.peak {
        parts.push(describe_peak("current max", peak));
    }
    if let Some(peak) = snapshot.max_hold.as_ref().and_then(|held| held.peak.as_ref()) {
        parts.push(describe_peak("max hold", peak));
    }
    if let Some(waterfall) = &snapshot.waterfall {
        parts.push(format!("waterfall rows={}", waterfall.filled));
    }
    parts.join(" | ")
}

pub fn write_report(path: &Path, snapshot: &SpectrumSnapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
    }
    let json = snapshot
        .to_json_pretty()
        .context("serializing spectrum snapshot")?;
    fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
