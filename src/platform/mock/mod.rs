//! Mock platform implementation for testing
//!
//! Mock implementations of the platform traits for unit and integration
//! testing without hardware.
//!
//! # Feature Gate
//!
//! Available during test builds (`#[cfg(test)]`) and when the `mock` feature
//! is enabled.

#![cfg(any(test, feature = "mock"))]

mod adc;
mod gpio;
mod pwm;

pub use adc::MockAdc;
pub use gpio::MockGpio;
pub use pwm::MockPwm;
