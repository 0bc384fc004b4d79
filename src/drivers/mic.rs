use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::drivers::{DriverError, SamplingDriver};

// Backlog cap; roughly a third of a second at 48 kHz.
const CAP: usize = 16384;

/// Microphone front end over a cpal input stream. The stream itself is not
/// `Send`, so it stays with this struct on the spawning thread; the producer
/// task drains samples through a [`MicSampler`] handle.
pub struct MicCapture {
    samples: Arc<Mutex<VecDeque<i32>>>,
    _stream: cpal::Stream,
}

impl MicCapture {
    pub fn start() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .context("no audio input device")?;
        if let Ok(name) = device.name() {
            log::info!("cpal input device: {name}");
        }

        let config = device.default_input_config()?;
        let samples = Arc::new(Mutex::new(VecDeque::with_capacity(CAP)));
        let samples_cloned = Arc::clone(&samples);

        let err_fn = |err| {
            log::warn!("cpal stream error: {err}");
        };

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _| push_samples(&samples_cloned, data.iter().copied()),
                err_fn,
                None,
            )?,
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _| {
                    push_samples(
                        &samples_cloned,
                        data.iter().map(|&s| s as f32 / i16::MAX as f32),
                    )
                },
                err_fn,
                None,
            )?,
            cpal::SampleFormat::U16 => device.build_input_stream(
                &config.into(),
                move |data: &[u16], _| {
                    push_samples(
                        &samples_cloned,
                        data.iter().map(|&s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0),
                    )
                },
                err_fn,
                None,
            )?,
            other => anyhow::bail!("unsupported input sample format: {other:?}"),
        };

        stream.play()?;
        Ok(Self {
            samples,
            _stream: stream,
        })
    }

    /// Sampling handle for the producer task. Keep the capture alive for as
    /// long as the handle is in use.
    pub fn sampler(&self) -> MicSampler {
        MicSampler {
            samples: Arc::clone(&self.samples),
        }
    }
}

pub struct MicSampler {
    samples: Arc<Mutex<VecDeque<i32>>>,
}

impl SamplingDriver for MicSampler {
    fn read_raw_sample(&mut self) -> Result<i32, DriverError> {
        // Brief grace for the stream callback to land more data before the
        // source counts as starved.
        for _ in 0..50 {
            if let Some(raw) = self.samples.lock().unwrap().pop_front() {
                return Ok(raw);
            }
            thread::sleep(Duration::from_millis(1));
        }
        Err(DriverError::Starved)
    }
}

fn push_samples(buf: &Arc<Mutex<VecDeque<i32>>>, data: impl Iterator<Item = f32>) {
    let mut guard = buf.lock().unwrap();
    for s in data {
        guard.push_back(quantize(s));
    }
    while guard.len() > CAP {
        guard.pop_front();
    }
}

// Map [-1, 1] onto a 12-bit unsigned converter range. The sampler removes
// the midpoint offset again as DC.
fn quantize(s: f32) -> i32 {
    (s.clamp(-1.0, 1.0) * 2047.0 + 2048.0) as i32
}
