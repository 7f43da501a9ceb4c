//! Millisecond pacing.
//!
//! The durations requested by the test sequence only need to be human-observable. [`BusyDelay`] is not
//! calibrated to any clock: its real duration scales with the CPU frequency and the memory latency of the
//! instruction fetch. Run the `test_delay` main to measure it on a given board.

use crate::board::DELAY_LOOPS_PER_MS;
use crate::binding::nop_delay;
use heapless::Vec;

pub trait DelayMs {
    /// block for approximately `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<D: DelayMs + ?Sized> DelayMs for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// the duration actually waited for a requested duration, shrunk by 1000x under `tiny_delay` for simulation
pub const fn effective_ms(ms: u32) -> u32 {
    if cfg!(feature = "tiny_delay") {
        if ms == 0 {
            0
        } else {
            1 + (ms - 1) / 1000
        }
    } else {
        ms
    }
}

/// busy loop of `loops_per_ms` `nop` instructions per millisecond
#[derive(Debug, Clone, Copy)]
pub struct BusyDelay {
    pub loops_per_ms: u32,
}

impl BusyDelay {
    pub const fn new() -> Self {
        Self::with_loops_per_ms(DELAY_LOOPS_PER_MS)
    }

    pub const fn with_loops_per_ms(loops_per_ms: u32) -> Self {
        Self { loops_per_ms }
    }
}

impl Default for BusyDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs for BusyDelay {
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..effective_ms(ms) {
            nop_delay(self.loops_per_ms);
        }
    }
}

/// waits on the BSP timer instead of counting instructions
#[cfg(not(test))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTimerDelay;

#[cfg(not(test))]
impl DelayMs for NativeTimerDelay {
    fn delay_ms(&mut self, ms: u32) {
        crate::util::sleep(&crate::util::BspTimer, effective_ms(ms) as f64 * 1e-3);
    }
}

/// returns immediately and remembers every requested duration
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay<const J: usize = 128> {
    pub requested: Vec<u32, J>,
    /// number of requests that did not fit in `requested`
    pub dropped: usize,
    /// the sum of all requested durations, including the dropped ones
    pub total_ms: u64,
}

impl<const J: usize> RecordingDelay<J> {
    pub fn new() -> Self {
        Self {
            requested: Vec::new(),
            dropped: 0,
            total_ms: 0,
        }
    }
}

impl<const J: usize> DelayMs for RecordingDelay<J> {
    fn delay_ms(&mut self, ms: u32) {
        if self.requested.push(ms).is_err() {
            self.dropped += 1;
        }
        self.total_ms += ms as u64;
    }
}
