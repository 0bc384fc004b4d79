use std::time::Duration;

use crate::audio::fft::FftAlgorithm;

pub const SAMPLE_COUNT: usize = 128;
pub const NUM_BINS: usize = 16;
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const VERTICAL_MARGIN: u32 = 37;
pub const BASELINE_Y: u32 = 32;
pub const BAR_X_ORIGIN: u32 = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample count {0} is not a power of two")]
    SampleCountNotPowerOfTwo(usize),
    #[error("bin count {num_bins} does not divide half-spectrum size {half}")]
    BinCountMismatch { num_bins: usize, half: usize },
    #[error("vertical margin {margin} leaves no room on a {height}px screen")]
    MarginTooLarge { margin: u32, height: u32 },
    #[error("{num_bins} bars do not fit a {width}px screen")]
    TooManyBars { num_bins: usize, width: u32 },
    #[error("baseline row {baseline} plus {range}px bar range exceeds screen height {height}")]
    BaselineOutOfRange { baseline: u32, range: u32, height: u32 },
}

/// Pipeline configuration. All values are fixed at startup; `validate` is the
/// single place the structural invariants are checked, so the signal path can
/// assume they hold.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Samples per block (FFT size). Must be a power of two.
    pub sample_count: usize,
    /// Rendered bars. Must divide `sample_count / 2` exactly.
    pub num_bins: usize,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Rows reserved for labels and the baseline; bars scale into the rest.
    pub vertical_margin: u32,
    /// Row the bars grow from.
    pub baseline_y: u32,
    /// Left edge of the first bar.
    pub bar_x_origin: u32,
    pub producer_period: Duration,
    pub consumer_period: Duration,
    /// How long the consumer waits for a fresh spectrum before reporting it
    /// stale instead of blocking forever.
    pub stale_timeout: Duration,
    /// EMA alpha for cross-frame bin smoothing; `None` renders each frame
    /// from its own spectrum only.
    pub smoothing: Option<f32>,
    pub fft: FftAlgorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_count: SAMPLE_COUNT,
            num_bins: NUM_BINS,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            vertical_margin: VERTICAL_MARGIN,
            baseline_y: BASELINE_Y,
            bar_x_origin: BAR_X_ORIGIN,
            producer_period: Duration::from_millis(10),
            consumer_period: Duration::from_millis(100),
            stale_timeout: Duration::from_millis(250),
            smoothing: None,
            fft: FftAlgorithm::Recursive,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count < 2 || !self.sample_count.is_power_of_two() {
            return Err(ConfigError::SampleCountNotPowerOfTwo(self.sample_count));
        }
        let half = self.sample_count / 2;
        if self.num_bins == 0 || half % self.num_bins != 0 {
            return Err(ConfigError::BinCountMismatch {
                num_bins: self.num_bins,
                half,
            });
        }
        if self.vertical_margin >= self.screen_height {
            return Err(ConfigError::MarginTooLarge {
                margin: self.vertical_margin,
                height: self.screen_height,
            });
        }
        if self.num_bins as u32 > self.screen_width {
            return Err(ConfigError::TooManyBars {
                num_bins: self.num_bins,
                width: self.screen_width,
            });
        }
        let range = self.max_bar_height();
        if self.baseline_y + range >= self.screen_height {
            return Err(ConfigError::BaselineOutOfRange {
                baseline: self.baseline_y,
                range,
                height: self.screen_height,
            });
        }
        Ok(())
    }

    /// Spectrum entries summed into each bar.
    pub fn bin_size(&self) -> usize {
        (self.sample_count / 2) / self.num_bins
    }

    /// Tallest renderable bar in pixels.
    pub fn max_bar_height(&self) -> u32 {
        self.screen_height - self.vertical_margin
    }

    /// Horizontal distance between bar left edges.
    pub fn bar_spacing(&self) -> u32 {
        self.screen_width / self.num_bins as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bin_size(), 4);
        assert_eq!(cfg.bar_spacing(), 8);
        assert_eq!(cfg.max_bar_height(), 27);
    }

    #[test]
    fn rejects_non_power_of_two_sample_count() {
        let cfg = Config {
            sample_count: 100,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SampleCountNotPowerOfTwo(100))
        );
    }

    #[test]
    fn rejects_bin_count_that_does_not_divide_half_spectrum() {
        let cfg = Config {
            num_bins: 24,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::BinCountMismatch { num_bins: 24, half: 64 })
        );
    }

    #[test]
    fn rejects_margin_swallowing_the_screen() {
        let cfg = Config {
            vertical_margin: 64,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MarginTooLarge { .. })
        ));
    }
}
