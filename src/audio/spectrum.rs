use num_complex::Complex;

use crate::config::Config;

/// Aggregates the meaningful half of a spectrum into bar magnitudes and
/// scales them into pixel heights. Pure per-frame transformation.
pub struct SpectrumBinner {
    num_bins: usize,
    bin_size: usize,
    max_height: u32,
}

impl SpectrumBinner {
    pub fn new(config: &Config) -> Self {
        Self {
            num_bins: config.num_bins,
            bin_size: config.bin_size(),
            max_height: config.max_bar_height(),
        }
    }

    /// Sum magnitudes of the first N/2 entries into NUM_BINS contiguous
    /// groups. The grouping conserves total magnitude.
    pub fn bin_magnitudes(&self, spectrum: &[Complex<f32>]) -> Vec<f32> {
        let half = self.num_bins * self.bin_size;
        debug_assert!(spectrum.len() >= half);

        let mut bins = vec![0.0f32; self.num_bins];
        for (i, entry) in spectrum[..half].iter().enumerate() {
            bins[i / self.bin_size] += entry.norm();
        }
        bins
    }

    /// Normalize by the per-frame maximum (floored at 1.0 so silence divides
    /// cleanly) and scale into the renderable range. Every bar is at least
    /// one pixel tall.
    pub fn scale_heights(&self, bins: &[f32]) -> Vec<u32> {
        let mut max = 1.0f32;
        for &bin in bins {
            if bin > max {
                max = bin;
            }
        }

        bins.iter()
            .map(|&bin| (((bin / max) * self.max_height as f32) as u32).max(1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fft::{fft_recursive, FftAlgorithm};

    fn binner(num_bins: usize) -> SpectrumBinner {
        let config = Config {
            num_bins,
            ..Config::default()
        };
        config.validate().unwrap();
        SpectrumBinner::new(&config)
    }

    fn spectrum_of(block: &[f32]) -> Vec<Complex<f32>> {
        let mut out = vec![Complex::new(0.0, 0.0); block.len()];
        fft_recursive(block, &mut out);
        out
    }

    #[test]
    fn binning_conserves_total_magnitude() {
        let block: Vec<f32> = (0..128)
            .map(|i| ((i * 37 % 64) as f32 - 31.5) / 10.0)
            .collect();
        let spectrum = spectrum_of(&block);

        let binner = binner(16);
        let bins = binner.bin_magnitudes(&spectrum);

        let bin_total: f32 = bins.iter().sum();
        let mag_total: f32 = spectrum[..64].iter().map(|c| c.norm()).sum();
        assert!(
            (bin_total - mag_total).abs() <= 1e-3 * mag_total.max(1.0),
            "{bin_total} vs {mag_total}"
        );
    }

    #[test]
    fn max_bin_scales_to_exactly_max_height() {
        let binner = binner(16);
        let mut bins = vec![3.0f32; 16];
        bins[5] = 12.0;

        let heights = binner.scale_heights(&bins);
        assert_eq!(heights[5], binner.max_height);
        for (i, &h) in heights.iter().enumerate() {
            if i != 5 {
                assert!(h < binner.max_height);
                assert_eq!(h, ((3.0 / 12.0) * binner.max_height as f32) as u32);
            }
        }
    }

    #[test]
    fn silence_renders_minimum_floor() {
        let binner = binner(16);
        let spectrum = vec![Complex::new(0.0, 0.0); 128];
        let bins = binner.bin_magnitudes(&spectrum);
        assert!(bins.iter().all(|&b| b == 0.0));

        let heights = binner.scale_heights(&bins);
        assert!(heights.iter().all(|&h| h == 1));
    }

    #[test]
    fn sub_unit_bins_are_not_inflated_by_normalization() {
        // Max floor of 1.0 keeps faint spectra faint instead of stretching
        // them to full scale.
        let binner = binner(16);
        let bins = vec![0.01f32; 16];
        let heights = binner.scale_heights(&bins);
        assert!(heights.iter().all(|&h| h == 1));
    }

    #[test]
    fn engine_variants_feed_identical_bins() {
        use crate::audio::fft::FftEngine;

        let block: Vec<f32> = (0..128).map(|i| (i as f32 * 0.37).sin()).collect();
        let binner = binner(16);

        let mut rec = Vec::new();
        FftEngine::new(128, FftAlgorithm::Recursive).transform(&block, &mut rec);
        let mut it = Vec::new();
        FftEngine::new(128, FftAlgorithm::Iterative).transform(&block, &mut it);

        let a = binner.bin_magnitudes(&rec);
        let b = binner.bin_magnitudes(&it);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-2);
        }
    }
}
