//! Wall-clock timing for the delay calibration and the capture window, on top of a free-running counter.

use core::sync::atomic::{compiler_fence, Ordering};

/// a free-running counter; only the platform knows its width and frequency
pub trait TickSource {
    fn now(&self) -> u64;
    /// seconds from `start` to `end`, valid as long as the counter wrapped at most once in between
    fn seconds_between(&self, start: u64, end: u64) -> f32;
}

/// the native timer of the BSP (e.g. a 32 bit counter at 150MHz on the A72, wrapping every 28.6s)
#[cfg(not(test))]
#[derive(Debug, Clone, Copy, Default)]
pub struct BspTimer;

#[cfg(not(test))]
impl TickSource for BspTimer {
    fn now(&self) -> u64 {
        unsafe { crate::binding::extern_c::get_native_time() }
    }
    fn seconds_between(&self, start: u64, end: u64) -> f32 {
        unsafe { crate::binding::extern_c::diff_native_time(start, end) }
    }
}

/// elapsed time that survives counter wrap, provided it is polled more often than the counter period
pub struct Stopwatch<'a, T: TickSource> {
    timer: &'a T,
    start: u64,
    folded: f64,
}

impl<'a, T: TickSource> Stopwatch<'a, T> {
    /// counters wrapping faster than twice this period are not supported
    pub const FOLD_SECONDS: f64 = 0.5;

    pub fn start(timer: &'a T) -> Self {
        compiler_fence(Ordering::SeqCst);
        Self {
            timer,
            start: timer.now(),
            folded: 0.,
        }
    }

    pub fn elapsed(&mut self) -> f64 {
        compiler_fence(Ordering::SeqCst);
        let now = self.timer.now();
        let local = self.timer.seconds_between(self.start, now) as f64;
        if local > Self::FOLD_SECONDS {
            self.start = now;
            self.folded += local;
            return self.folded;
        }
        self.folded + local
    }
}

pub fn sleep<T: TickSource>(timer: &T, seconds: f64) {
    let mut stopwatch = Stopwatch::start(timer);
    while stopwatch.elapsed() < seconds {}
}

/// seconds spent in `routine`; the counter cannot be polled meanwhile, so `routine` must be shorter than
/// one counter period
pub fn measure<T: TickSource, F: FnOnce()>(timer: &T, routine: F) -> f64 {
    let mut stopwatch = Stopwatch::start(timer);
    routine();
    stopwatch.elapsed()
}

/// busy-loop iterations per millisecond that would have made `requested_ms` take exactly that long
pub fn calibrated_loops_per_ms(loops_per_ms: u32, requested_ms: u32, measured_seconds: f64) -> Option<u32> {
    if !(measured_seconds > 0.) || requested_ms == 0 {
        return None;
    }
    let calibrated = (loops_per_ms as f64) * (requested_ms as f64) / (measured_seconds * 1e3);
    if calibrated < 1. || calibrated > u32::MAX as f64 {
        return None;
    }
    Some(calibrated as u32)
}
