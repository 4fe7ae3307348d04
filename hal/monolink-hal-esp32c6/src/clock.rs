//! Tick source backed by the system timer

use esp_hal::delay::Delay;
use esp_hal::time::Instant;
use monolink_hal::Clock;

/// Milliseconds since boot from the esp-hal system timer
#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl EspClock {
    pub fn new() -> Self {
        Self
    }

    /// Busy-wait delay provider matching this clock
    pub fn delay(&self) -> Delay {
        Delay::new()
    }
}

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping 32-bit counter
        Instant::now().duration_since_epoch().as_millis() as u32
    }
}
