pub mod mic;
pub mod term;
pub mod tone;

use crate::render::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("sampling driver produced no data")]
    Starved,
    #[error("display io: {0}")]
    Io(#[from] std::io::Error),
}

/// The analog front end: hands out one raw integer sample per call.
/// Calibration of the underlying converter is the implementation's concern.
pub trait SamplingDriver {
    fn read_raw_sample(&mut self) -> Result<i32, DriverError>;
}

/// A monochrome display. Clearing and line drawing operate on the caller's
/// frame buffer; `flush` pushes that buffer to the device.
pub trait DisplayDriver {
    fn clear(&mut self, frame: &mut Frame) {
        frame.clear();
    }

    fn draw_line(&mut self, frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32) {
        frame.draw_line(x0, y0, x1, y1);
    }

    fn flush(&mut self, frame: &Frame) -> Result<(), DriverError>;
}
