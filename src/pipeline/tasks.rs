use num_complex::Complex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::audio::fft::FftEngine;
use crate::audio::sampler::Sampler;
use crate::audio::smoother::Ema;
use crate::audio::spectrum::SpectrumBinner;
use crate::config::{Config, ConfigError};
use crate::drivers::{DisplayDriver, SamplingDriver};
use crate::pipeline::publish::SpectrumCell;
use crate::pipeline::PipelineError;
use crate::render::bars::BarRenderer;
use crate::render::frame::Frame;

/// Everything the two tasks share, constructed once at startup and passed by
/// reference. No ambient globals.
pub struct PipelineContext {
    pub config: Config,
    pub cell: SpectrumCell,
    running: AtomicBool,
}

impl PipelineContext {
    pub fn new(config: Config) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        Ok(Arc::new(Self {
            cell: SpectrumCell::new(config.sample_count),
            config,
            running: AtomicBool::new(true),
        }))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

pub struct PipelineHandles {
    producer: thread::JoinHandle<()>,
    consumer: thread::JoinHandle<()>,
}

impl PipelineHandles {
    pub fn join(self) {
        let _ = self.producer.join();
        let _ = self.consumer.join();
    }
}

/// Bring-up: one named thread per task. Spawn failure is logged and returned;
/// there is no retry.
pub fn spawn_pipeline<S, D>(
    ctx: Arc<PipelineContext>,
    sampling: S,
    display: D,
) -> Result<PipelineHandles, PipelineError>
where
    S: SamplingDriver + Send + 'static,
    D: DisplayDriver + Send + 'static,
{
    let producer = thread::Builder::new()
        .name("sampler".into())
        .spawn({
            let ctx = Arc::clone(&ctx);
            move || producer_loop(&ctx, sampling)
        })
        .map_err(|e| {
            log::error!("failed to create sampler task: {e}");
            PipelineError::Spawn(e)
        })?;

    let consumer = thread::Builder::new()
        .name("display".into())
        .spawn({
            let ctx = Arc::clone(&ctx);
            move || consumer_loop(&ctx, display)
        })
        .map_err(|e| {
            log::error!("failed to create display task: {e}");
            ctx.stop();
            PipelineError::Spawn(e)
        })?;

    log::info!("pipeline up: {} samples, {} bins", ctx.config.sample_count, ctx.config.num_bins);
    Ok(PipelineHandles { producer, consumer })
}

/// Producer: acquire a centered block, transform it, publish. A failing
/// sampling driver ends the task; the display then keeps its last frame.
pub fn producer_loop<S: SamplingDriver>(ctx: &PipelineContext, driver: S) {
    let mut sampler = Sampler::new(driver, ctx.config.sample_count);
    let engine = FftEngine::new(ctx.config.sample_count, ctx.config.fft);
    let mut scratch = vec![Complex::new(0.0, 0.0); ctx.config.sample_count];

    while ctx.is_running() {
        let block = match sampler.acquire() {
            Ok(block) => block,
            Err(e) => {
                log::error!("sampling failed: {e}");
                break;
            }
        };

        engine.transform(block, &mut scratch);
        if let Err(e) = ctx.cell.publish(&mut scratch) {
            log::error!("spectrum publish failed: {e}");
            break;
        }

        thread::sleep(ctx.config.producer_period);
    }
}

/// Consumer: wait for a fresh generation, bin, optionally smooth, draw,
/// flush. A stale wait keeps the previous frame on screen; a dead peer or a
/// failing display ends the task.
pub fn consumer_loop<D: DisplayDriver>(ctx: &PipelineContext, mut display: D) {
    let binner = SpectrumBinner::new(&ctx.config);
    let renderer = BarRenderer::new(&ctx.config);
    let mut smoother = ctx
        .config
        .smoothing
        .map(|alpha| Ema::new(alpha, ctx.config.num_bins));

    let mut frame = Frame::new(ctx.config.screen_width, ctx.config.screen_height);
    let mut spectrum = Vec::new();
    let mut last_seen = 0u64;

    while ctx.is_running() {
        match ctx
            .cell
            .wait_newer(last_seen, ctx.config.stale_timeout, &mut spectrum)
        {
            Ok(generation) => {
                let dropped = generation - last_seen - 1;
                if dropped > 0 {
                    log::debug!("skipped {dropped} spectrum generation(s)");
                }
                last_seen = generation;

                let mut bins = binner.bin_magnitudes(&spectrum);
                if let Some(ema) = smoother.as_mut() {
                    ema.apply(&mut bins);
                }
                let heights = binner.scale_heights(&bins);

                if let Err(e) = renderer.render(&mut display, &mut frame, &heights) {
                    log::error!("display flush failed: {e}");
                    break;
                }
            }
            Err(PipelineError::Stale { .. }) => {
                if ctx.is_running() {
                    log::warn!("spectrum stale past generation {last_seen}; keeping last frame");
                }
            }
            Err(e) => {
                log::error!("{e}");
                break;
            }
        }

        thread::sleep(ctx.config.consumer_period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    #[test]
    fn context_rejects_invalid_config() {
        let config = Config {
            sample_count: 96,
            ..Config::default()
        };
        assert!(PipelineContext::new(config).is_err());
    }

    #[test]
    fn stop_flag_round_trips() {
        let ctx = PipelineContext::new(Config::default()).unwrap();
        assert!(ctx.is_running());
        ctx.stop();
        assert!(!ctx.is_running());
    }

    #[test]
    fn producer_publishes_generations() {
        use crate::drivers::tone::ToneDriver;

        let config = Config {
            producer_period: Duration::from_millis(1),
            ..Config::default()
        };
        let ctx = PipelineContext::new(config).unwrap();

        let producer = thread::Builder::new()
            .name("sampler".into())
            .spawn({
                let ctx = Arc::clone(&ctx);
                move || producer_loop(&ctx, ToneDriver::aligned_to_bin(8, 128))
            })
            .unwrap();

        let mut out = Vec::new();
        let generation = ctx
            .cell
            .wait_newer(0, Duration::from_secs(5), &mut out)
            .unwrap();
        assert!(generation >= 1);
        assert_eq!(out.len(), 128);

        ctx.stop();
        producer.join().unwrap();
    }
}
