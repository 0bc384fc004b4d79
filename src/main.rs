use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;

use spectrum_bars::config::Config;
use spectrum_bars::drivers::mic::MicCapture;
use spectrum_bars::drivers::term::TermDisplay;
use spectrum_bars::drivers::tone::ToneDriver;
use spectrum_bars::pipeline::tasks::{spawn_pipeline, PipelineContext};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::default();
    let ctx = PipelineContext::new(config)?;
    let display = TermDisplay::new()?;

    // `mic` captures from the default input device; anything else runs the
    // built-in test tone. The capture owns the input stream, so it must
    // outlive the producer task.
    let mut _capture = None;
    let source = std::env::args().nth(1);
    let handles = match source.as_deref() {
        Some("mic") => {
            let capture = MicCapture::start()?;
            let sampler = capture.sampler();
            _capture = Some(capture);
            spawn_pipeline(Arc::clone(&ctx), sampler, display)?
        }
        _ => {
            let tone = ToneDriver::aligned_to_bin(33, config.sample_count);
            spawn_pipeline(Arc::clone(&ctx), tone, display)?
        }
    };

    wait_for_quit(&ctx)?;
    ctx.stop();
    handles.join();
    Ok(())
}

fn wait_for_quit(ctx: &PipelineContext) -> Result<()> {
    while ctx.is_running() {
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                break;
            }
        }
    }
    Ok(())
}
