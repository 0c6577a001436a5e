//! Time abstraction for platform-agnostic timing.
//!
//! The encoder tracker and stall detection only need "microseconds since
//! boot"; this trait abstracts over embassy's `Instant` on the target and a
//! controllable mock in host tests.

use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// Implementations:
/// - `EmbassyTime` (in `platform::rp2350`) backed by `embassy_time::Instant`
/// - [`MockTime`] for host tests with manually advanced time
pub trait TimeSource: Clone {
    /// Current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Current time in milliseconds since system start.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Elapsed microseconds since a reference point, saturating at zero.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Mock time source for deterministic testing of timing-dependent code.
///
/// # Example
///
/// ```
/// use spectral::core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(1000);
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
