use num_complex::Complex;
use std::mem;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::pipeline::PipelineError;

struct Slot {
    spectrum: Vec<Complex<f32>>,
    generation: u64,
}

/// Publish/subscribe cell for the shared spectrum buffer.
///
/// The producer swaps a fully-written buffer in under the lock and bumps the
/// generation counter; the consumer waits for a generation newer than the
/// last one it saw and copies the buffer out. Readers can never observe a
/// partial transform, the producer never waits on a slow reader, and the
/// counter makes dropped and duplicate frames observable instead of silent.
pub struct SpectrumCell {
    slot: Mutex<Slot>,
    updated: Condvar,
}

impl SpectrumCell {
    pub fn new(size: usize) -> Self {
        Self {
            slot: Mutex::new(Slot {
                spectrum: vec![Complex::new(0.0, 0.0); size],
                generation: 0,
            }),
            updated: Condvar::new(),
        }
    }

    /// Swap `spectrum` in as the newest generation. On return, `spectrum`
    /// holds the previously published buffer, ready for reuse as scratch.
    pub fn publish(&self, spectrum: &mut Vec<Complex<f32>>) -> Result<u64, PipelineError> {
        let mut slot = self.slot.lock().map_err(|_| PipelineError::PeerDied)?;
        mem::swap(&mut slot.spectrum, spectrum);
        slot.generation += 1;
        let generation = slot.generation;
        drop(slot);

        self.updated.notify_all();
        Ok(generation)
    }

    /// Wait (bounded) for a generation newer than `last_seen` and copy it
    /// into `out`. Returns the observed generation, or `Stale` if nothing
    /// new was published within `timeout`.
    pub fn wait_newer(
        &self,
        last_seen: u64,
        timeout: Duration,
        out: &mut Vec<Complex<f32>>,
    ) -> Result<u64, PipelineError> {
        let slot = self.slot.lock().map_err(|_| PipelineError::PeerDied)?;
        let (slot, wait) = self
            .updated
            .wait_timeout_while(slot, timeout, |s| s.generation <= last_seen)
            .map_err(|_| PipelineError::PeerDied)?;

        if slot.generation <= last_seen {
            debug_assert!(wait.timed_out());
            return Err(PipelineError::Stale {
                last_seen,
                waited: timeout,
            });
        }

        out.clear();
        out.extend_from_slice(&slot.spectrum);
        Ok(slot.generation)
    }

    pub fn generation(&self) -> u64 {
        self.slot.lock().map(|s| s.generation).unwrap_or(u64::MAX)
    }
}
