use crate::drivers::{DriverError, SamplingDriver};

/// Pulls one block of raw samples per cycle and centers it around zero.
pub struct Sampler<D> {
    driver: D,
    block: Vec<f32>,
}

impl<D: SamplingDriver> Sampler<D> {
    pub fn new(driver: D, sample_count: usize) -> Self {
        Self {
            driver,
            block: vec![0.0; sample_count],
        }
    }

    /// Acquire `sample_count` raw samples and subtract their arithmetic mean,
    /// removing the DC bias before the transform sees the block.
    pub fn acquire(&mut self) -> Result<&[f32], DriverError> {
        for slot in self.block.iter_mut() {
            *slot = self.driver.read_raw_sample()? as f32;
        }

        let mean = self.block.iter().sum::<f32>() / self.block.len() as f32;
        for sample in self.block.iter_mut() {
            *sample -= mean;
        }

        Ok(&self.block)
    }
}
