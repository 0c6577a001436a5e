//! Platform interface traits.

pub mod adc;
pub mod gpio;
pub mod pwm;

pub use adc::AdcInterface;
pub use gpio::{GpioInterface, GpioMode};
pub use pwm::{PwmConfig, PwmInterface};
