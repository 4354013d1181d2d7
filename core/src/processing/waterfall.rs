use crate::prelude::{ensure_len, SpectrumResult, SpectrumStage};
use ndarray::{Array2, ArrayView1};

const NEUTRAL_LEVEL: f64 = 0.0;

/// Fixed-depth ring of spectra, one row per tick.
///
/// Row `(cursor - 1) mod depth` always holds the most recent push; the
/// oldest row is overwritten once the ring is full.
#[derive(Debug, Clone)]
pub struct WaterfallBuffer {
    rows: Array2<f64>,
    cursor: usize,
    filled: usize,
    enabled: bool,
    sensitivity_db: f64,
}

impl WaterfallBuffer {
    pub fn new(depth: usize, bins: usize, sensitivity_db: f64) -> Self {
        Self {
            rows: Array2::from_elem((depth, bins), NEUTRAL_LEVEL),
            cursor: 0,
            filled: 0,
            enabled: false,
            sensitivity_db,
        }
    }

    /// Writes `spectrum` into the cursor row and advances the cursor.
    ///
    /// Returns `false` without touching the ring while disabled.
    pub fn push(&mut self, spectrum: &[f64]) -> SpectrumResult<bool> {
        if !self.enabled {
            return Ok(false);
        }
        ensure_len(self.bins(), spectrum.len())?;
        self.rows
            .row_mut(self.cursor)
            .assign(&ArrayView1::from(spectrum));
        self.cursor = (self.cursor + 1) % self.depth();
        self.filled = (self.filled + 1).min(self.depth());
        Ok(true)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn depth(&self) -> usize {
        self.rows.nrows()
    }

    pub fn bins(&self) -> usize {
        self.rows.ncols()
    }

    /// Number of rows written since the last enable, capped at the depth.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.depth()).then(|| self.rows.row(index))
    }

    pub fn latest(&self) -> Option<ArrayView1<'_, f64>> {
        if self.filled == 0 {
            return None;
        }
        let depth = self.depth();
        self.row((self.cursor + depth - 1) % depth)
    }

    /// Filled rows from oldest to newest.
    pub fn rows_chronological(&self) -> Vec<Vec<f64>> {
        let depth = self.depth();
        let oldest = if self.filled < depth { 0 } else { self.cursor };
        (0..self.filled)
            .map(|offset| self.rows.row((oldest + offset) % depth).to_vec())
            .collect()
    }

    /// `(floor, ceiling)` for colour scaling: the ceiling is the loudest
    /// value written so far, the floor sits `sensitivity_db` below it.
    pub fn display_levels(&self) -> Option<(f64, f64)> {
        let depth = self.depth();
        let oldest = if self.filled < depth { 0 } else { self.cursor };
        let ceiling = (0..self.filled)
            .flat_map(|offset| self.rows.row((oldest + offset) % depth).to_vec())
            .filter(|value| !value.is_nan())
            .reduce(f64::max)?;
        Some((ceiling - self.sensitivity_db, ceiling))
    }

    pub fn sensitivity_db(&self) -> f64 {
        self.sensitivity_db
    }
}

impl SpectrumStage for WaterfallBuffer {
    fn enable(&mut self, _current: &[f64]) -> SpectrumResult<()> {
        if self.enabled {
            return Ok(());
        }
        self.rows.fill(NEUTRAL_LEVEL);
        self.cursor = 0;
        self.filled = 0;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn update(&mut self, spectrum: &[f64]) -> SpectrumResult<()> {
        self.push(spectrum).map(|_| ())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(depth: usize, bins: usize) -> WaterfallBuffer {
        let mut waterfall = WaterfallBuffer::new(depth, bins, 60.0);
        waterfall.enable(&[]).unwrap();
        waterfall
    }

    #[test]
    fn disabled_buffer_rejects_pushes() {
        let mut waterfall = WaterfallBuffer::new(3, 2, 60.0);
        assert!(!waterfall.push(&[1.0, 1.0]).unwrap());
        assert_eq!(waterfall.cursor(), 0);
        assert!(waterfall.latest().is_none());
    }

    #[test]
    fn depth_plus_one_pushes_wrap_to_row_zero() {
        let depth = 4;
        let mut waterfall = enabled(depth, 2);
        for step in 1..=depth + 1 {
            let value = step as f64;
            assert!(waterfall.push(&[value, -value]).unwrap());
        }

        assert_eq!(waterfall.cursor(), 1);
        assert_eq!(waterfall.row(0).unwrap().to_vec(), vec![5.0, -5.0]);
        assert_eq!(waterfall.latest().unwrap().to_vec(), vec![5.0, -5.0]);
        assert_eq!(waterfall.filled(), depth);
    }

    #[test]
    fn chronological_rows_start_at_oldest() {
        let mut waterfall = enabled(3, 1);
        for value in [1.0, 2.0] {
            waterfall.push(&[value]).unwrap();
        }
        assert_eq!(waterfall.rows_chronological(), vec![vec![1.0], vec![2.0]]);

        for value in [3.0, 4.0] {
            waterfall.push(&[value]).unwrap();
        }
        assert_eq!(
            waterfall.rows_chronological(),
            vec![vec![2.0], vec![3.0], vec![4.0]]
        );
    }

    #[test]
    fn re_enable_clears_history() {
        let mut waterfall = enabled(2, 2);
        waterfall.push(&[-10.0, -20.0]).unwrap();
        waterfall.disable();
        waterfall.enable(&[]).unwrap();

        assert_eq!(waterfall.cursor(), 0);
        assert_eq!(waterfall.filled(), 0);
        for idx in 0..2 {
            assert!(waterfall.row(idx).unwrap().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn display_levels_follow_loudest_row() {
        let mut waterfall = enabled(3, 2);
        assert_eq!(waterfall.display_levels(), None);
        waterfall.push(&[-80.0, -30.0]).unwrap();
        waterfall.push(&[-90.0, -50.0]).unwrap();
        assert_eq!(waterfall.display_levels(), Some((-90.0, -30.0)));
    }

    #[test]
    fn wrong_length_push_is_rejected() {
        let mut waterfall = enabled(2, 3);
        assert!(waterfall.push(&[1.0]).is_err());
        assert_eq!(waterfall.cursor(), 0);
    }
}
