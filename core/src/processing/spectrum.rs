/// Live power values, one per display bin, zero-filled at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumBuffer {
    values: Vec<f64>,
}

impl SpectrumBuffer {
    pub fn new(bins: usize) -> Self {
        Self {
            values: vec![0.0; bins],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
