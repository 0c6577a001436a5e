//! GPIO interface trait
//!
//! Direction switches, step buttons, and the safety switch are read through
//! this interface; the motor direction line is driven through it.

use crate::platform::Result;

/// GPIO pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioMode {
    /// Input mode (high impedance)
    Input,
    /// Input mode with pull-up resistor
    InputPullUp,
    /// Input mode with pull-down resistor
    InputPullDown,
    /// Output mode (push-pull)
    OutputPushPull,
}

/// GPIO interface trait
///
/// # Safety Invariants
///
/// - The pin must be initialized before use
/// - Only one owner per pin instance
pub trait GpioInterface {
    /// Set the pin high. Only valid in output modes.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is
    /// not configured as an output.
    fn set_high(&mut self) -> Result<()>;

    /// Set the pin low. Only valid in output modes.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is
    /// not configured as an output.
    fn set_low(&mut self) -> Result<()>;

    /// Read the pin state: `true` = high, `false` = low.
    ///
    /// Valid in both input and output modes.
    fn read(&self) -> bool;

    /// Set the pin mode.
    fn set_mode(&mut self, mode: GpioMode) -> Result<()>;

    /// Get the current pin mode.
    fn mode(&self) -> GpioMode;
}
