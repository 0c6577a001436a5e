//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO pin
///
/// Tracks pin state and mode for test verification. Input level is set by the
/// test via [`MockGpio::set_level`].
#[derive(Debug)]
pub struct MockGpio {
    level: bool,
    mode: GpioMode,
}

impl MockGpio {
    /// Create an input pin at the given level.
    pub fn input(level: bool) -> Self {
        Self {
            level,
            mode: GpioMode::InputPullUp,
        }
    }

    /// Create an output pin, initially low.
    pub fn output() -> Self {
        Self {
            level: false,
            mode: GpioMode::OutputPushPull,
        }
    }

    /// Drive the simulated input level.
    pub fn set_level(&mut self, level: bool) {
        self.level = level;
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        if self.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.level = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        if self.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.level = false;
        Ok(())
    }

    fn read(&self) -> bool {
        self.level
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
