/// Exponential moving average over the bin array, for optional cross-frame
/// smoothing of the rendered magnitudes.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f32,
    state: Vec<f32>,
}

impl Ema {
    pub fn new(alpha: f32, len: usize) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: vec![0.0; len],
        }
    }

    /// Blend `bins` into the running state in place.
    pub fn apply(&mut self, bins: &mut [f32]) {
        debug_assert_eq!(bins.len(), self.state.len());
        for (state, bin) in self.state.iter_mut().zip(bins.iter_mut()) {
            *state = self.alpha * *bin + (1.0 - self.alpha) * *state;
            *bin = *state;
        }
    }
}
