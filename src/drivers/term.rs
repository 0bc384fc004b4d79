use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};

use crate::drivers::{DisplayDriver, DriverError};
use crate::render::frame::Frame;

/// Terminal-backed display: two pixel rows per character cell, drawn with
/// half-block glyphs. Enters the alternate screen on creation and restores
/// the terminal on drop.
pub struct TermDisplay {
    out: Stdout,
}

impl TermDisplay {
    pub fn new() -> Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        enable_raw_mode()?;
        Ok(Self { out })
    }
}

impl DisplayDriver for TermDisplay {
    fn flush(&mut self, frame: &Frame) -> Result<(), DriverError> {
        let width = frame.width();
        let height = frame.height();

        for (row, y) in (0..height).step_by(2).enumerate() {
            let mut line = String::with_capacity(width as usize);
            for x in 0..width {
                let top = frame.get(x, y);
                let bottom = y + 1 < height && frame.get(x, y + 1);
                line.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            queue!(self.out, MoveTo(0, row as u16), Print(line))?;
        }

        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
    }
}
