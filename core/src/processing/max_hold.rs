use crate::math::StatsHelper;
use crate::prelude::{ensure_len, SpectrumResult, SpectrumStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxHoldState {
    Inactive,
    Active,
}

/// Per-bin running maximum of the spectrum.
///
/// A bin is `None` until its first value arrives; once set it only grows
/// until the tracker is disabled.
#[derive(Debug, Clone)]
pub struct MaxHoldTracker {
    state: MaxHoldState,
    hold: Vec<Option<f64>>,
}

impl MaxHoldTracker {
    pub fn new(bins: usize) -> Self {
        Self {
            state: MaxHoldState::Inactive,
            hold: vec![None; bins],
        }
    }

    pub fn state(&self) -> MaxHoldState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == MaxHoldState::Active
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.hold
    }

    pub fn is_unset(&self) -> bool {
        self.hold.iter().all(Option::is_none)
    }

    /// Bin and value of the highest held value.
    pub fn peak(&self) -> Option<(usize, f64)> {
        let flattened: Vec<f64> = self
            .hold
            .iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect();
        StatsHelper::argmax(&flattened).map(|idx| (idx, flattened[idx]))
    }
}

impl SpectrumStage for MaxHoldTracker {
    fn enable(&mut self, current: &[f64]) -> SpectrumResult<()> {
        ensure_len(self.hold.len(), current.len())?;
        if self.is_active() {
            return Ok(());
        }
        self.state = MaxHoldState::Active;
        if self.is_unset() {
            for (slot, &value) in self.hold.iter_mut().zip(current) {
                *slot = Some(value);
            }
        }
        Ok(())
    }

    fn disable(&mut self) {
        self.state = MaxHoldState::Inactive;
        self.hold.iter_mut().for_each(|slot| *slot = None);
    }

    fn update(&mut self, spectrum: &[f64]) -> SpectrumResult<()> {
        if !self.is_active() {
            return Ok(());
        }
        ensure_len(self.hold.len(), spectrum.len())?;
        for (slot, &value) in self.hold.iter_mut().zip(spectrum) {
            *slot = Some(match *slot {
                Some(held) => held.max(value),
                None => value,
            });
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.is_active()
    }
}
