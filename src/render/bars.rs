use crate::config::Config;
use crate::drivers::{DisplayDriver, DriverError};
use crate::render::frame::Frame;

/// Draws the bin heights as vertical bars: fixed spacing, fixed baseline,
/// one clear-draw-flush pass per frame. No state survives between frames.
pub struct BarRenderer {
    x_origin: u32,
    spacing: u32,
    baseline: u32,
}

impl BarRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            x_origin: config.bar_x_origin,
            spacing: config.bar_spacing(),
            baseline: config.baseline_y,
        }
    }

    pub fn render<D: DisplayDriver>(
        &self,
        display: &mut D,
        frame: &mut Frame,
        heights: &[u32],
    ) -> Result<(), DriverError> {
        display.clear(frame);

        let mut x = self.x_origin;
        for &height in heights {
            display.draw_line(
                frame,
                x as i32,
                self.baseline as i32,
                x as i32,
                (self.baseline + height) as i32,
            );
            x += self.spacing;
        }

        display.flush(frame)
    }
}
