//! Tick counter abstraction
//!
//! Blocking delays use [`embedded_hal::delay::DelayNs`] directly; this
//! module covers reading monotonic time and bounding waits with a
//! [`Deadline`].

pub use embedded_hal::delay::DelayNs;

/// Monotonic millisecond tick source
///
/// The counter is 32 bits and wraps after ~49.7 days; use
/// [`elapsed_ms`](Clock::elapsed_ms) rather than subtracting by hand.
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u32;

    /// Milliseconds since an earlier `now_ms` reading, across wraparound
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }

    /// Seconds since boot, for UI animation timing
    fn now_secs(&self) -> f64 {
        f64::from(self.now_ms()) / 1000.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// A timeout armed at a point in time
///
/// Expires once `timeout_ms` milliseconds have passed since it was
/// started; a zero timeout is already expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    start_ms: u32,
    timeout_ms: u32,
}

impl Deadline {
    pub fn start<C: Clock + ?Sized>(clock: &C, timeout_ms: u32) -> Self {
        Self {
            start_ms: clock.now_ms(),
            timeout_ms,
        }
    }

    pub fn is_expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        clock.elapsed_ms(self.start_ms) >= self.timeout_ms
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}
