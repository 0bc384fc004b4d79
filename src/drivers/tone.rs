use std::f32::consts::PI;

use crate::drivers::{DriverError, SamplingDriver};

/// 12-bit quantization mirroring a typical ADC front end.
const MIDPOINT: f32 = 2048.0;
const AMPLITUDE: f32 = 1000.0;

/// Deterministic sine source quantized to raw ADC-style integers. Stands in
/// for the analog front end in the demo and in tests.
pub struct ToneDriver {
    phase: f32,
    step: f32,
}

impl ToneDriver {
    /// A tone advancing `step` radians per sample.
    pub fn new(step: f32) -> Self {
        Self { phase: 0.0, step }
    }

    /// A tone that completes exactly `bin` cycles per `sample_count`-sample
    /// block, landing all its energy in FFT bin `bin`.
    pub fn aligned_to_bin(bin: usize, sample_count: usize) -> Self {
        Self::new(2.0 * PI * bin as f32 / sample_count as f32)
    }
}

impl SamplingDriver for ToneDriver {
    fn read_raw_sample(&mut self) -> Result<i32, DriverError> {
        let raw = MIDPOINT + AMPLITUDE * self.phase.sin();
        self.phase += self.step;
        if self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
        Ok(raw as i32)
    }
}
