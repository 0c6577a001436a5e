//! RP2350 GPIO implementation.
//!
//! Wraps `embassy_rp::gpio::Flex` so a pin's direction can follow
//! [`GpioMode`] at runtime: the direction output line and the status LED are
//! outputs, switches and buttons are pulled inputs.

use embassy_rp::gpio::{Flex, Pull};

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

pub struct Rp2350Gpio<'d> {
    pin: Flex<'d>,
    mode: GpioMode,
}

impl<'d> Rp2350Gpio<'d> {
    /// Wrap a pin and apply the initial mode.
    pub fn new(pin: Flex<'d>, mode: GpioMode) -> Self {
        let mut gpio = Self { pin, mode };
        gpio.apply_mode(mode);
        gpio
    }

    fn apply_mode(&mut self, mode: GpioMode) {
        match mode {
            GpioMode::Input => {
                self.pin.set_pull(Pull::None);
                self.pin.set_as_input();
            }
            GpioMode::InputPullUp => {
                self.pin.set_pull(Pull::Up);
                self.pin.set_as_input();
            }
            GpioMode::InputPullDown => {
                self.pin.set_pull(Pull::Down);
                self.pin.set_as_input();
            }
            GpioMode::OutputPushPull => {
                self.pin.set_as_output();
            }
        }
        self.mode = mode;
    }

    fn is_output(&self) -> bool {
        self.mode == GpioMode::OutputPushPull
    }
}

impl GpioInterface for Rp2350Gpio<'_> {
    fn set_high(&mut self) -> Result<()> {
        if !self.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.pin.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        if !self.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.pin.set_low();
        Ok(())
    }

    fn read(&self) -> bool {
        if self.is_output() {
            self.pin.is_set_high()
        } else {
            self.pin.is_high()
        }
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.apply_mode(mode);
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
