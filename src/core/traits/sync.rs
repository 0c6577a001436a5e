//! Synchronized state abstraction.
//!
//! The encoder tracker's state is written from the pulse-capture context and
//! read from the control tick. This trait abstracts the handoff so the same
//! tracker code runs under embassy's critical-section mutex on the target and
//! under `RefCell` in single-threaded host tests. The closure-based API
//! guarantees the tick observes a consistent snapshot, never a half-updated
//! count/timestamp pair.

/// Platform-agnostic synchronized state access.
pub trait SharedState<T> {
    /// Access state immutably.
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably.
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

// ============================================================================
// Embassy Implementation
// ============================================================================

#[cfg(feature = "pico2_w")]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Embassy-based synchronized state using a critical-section mutex.
///
/// The critical section makes access atomic with respect to the encoder
/// pulse task, so tick-rate reads never tear.
#[cfg(feature = "pico2_w")]
pub struct EmbassyState<T> {
    inner: Mutex<CriticalSectionRawMutex, core::cell::RefCell<T>>,
}

#[cfg(feature = "pico2_w")]
impl<T> EmbassyState<T> {
    /// Creates a new `EmbassyState`. Const, so it can back a `static`.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(core::cell::RefCell::new(value)),
        }
    }
}

#[cfg(feature = "pico2_w")]
impl<T> SharedState<T> for EmbassyState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock synchronized state using `RefCell` for single-threaded tests.
///
/// # Panics
///
/// Panics if borrowing rules are violated (e.g. `with_mut` inside `with`),
/// which indicates a bug in the test code.
pub struct MockState<T> {
    inner: core::cell::RefCell<T>,
}

impl<T> MockState<T> {
    /// Creates a new `MockState` wrapping the given value.
    pub const fn new(value: T) -> Self {
        Self {
            inner: core::cell::RefCell::new(value),
        }
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.borrow())
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.inner.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_state_read_write() {
        let state = MockState::new(0u32);
        state.with_mut(|v| *v = 7);
        assert_eq!(state.with(|v| *v), 7);
    }

    #[test]
    fn mock_state_closure_return_value() {
        let state = MockState::new((3u32, 4u32));
        let sum = state.with(|(a, b)| a + b);
        assert_eq!(sum, 7);
    }

    #[test]
    fn mock_state_snapshot_is_consistent() {
        // A reader copying the whole value inside one `with` call can never
        // observe a partial update.
        let state = MockState::new((0u32, 0u64));
        state.with_mut(|v| *v = (1, 100));
        let snap = state.with(|v| *v);
        assert_eq!(snap, (1, 100));
    }
}
