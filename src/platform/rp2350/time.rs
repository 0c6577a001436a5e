//! Embassy-based time source.

use crate::core::traits::TimeSource;

/// Monotonic time from the embassy time driver.
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }

    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
