/// Display frequencies for each bin, evenly spaced over the closed span.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyAxis {
    frequencies: Vec<f64>,
}

impl FrequencyAxis {
    pub fn linspace(start: f64, end: f64, count: usize) -> Self {
        let frequencies = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                (0..count).map(|i| start + i as f64 * step).collect()
            }
        };
        Self { frequencies }
    }

    pub fn frequency(&self, index: usize) -> Option<f64> {
        self.frequencies.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}
