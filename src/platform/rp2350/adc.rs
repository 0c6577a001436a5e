//! RP2350 ADC implementation.
//!
//! The RP2350 has a single ADC peripheral multiplexed over several input
//! pins, so the converter is shared through a `RefCell` while each
//! [`Rp2350Adc`] owns its channel. The control task runs on one executor,
//! so the borrow is never contended.

use core::cell::RefCell;

use embassy_rp::adc::{Adc, Blocking, Channel};

use crate::platform::{
    error::{AdcError, PlatformError},
    traits::AdcInterface,
    Result,
};

/// Full-scale reading of the 12-bit converter.
const ADC_FULL_SCALE: f32 = 4095.0;

/// One pot input: a channel on the shared converter.
pub struct Rp2350Adc<'d> {
    adc: &'d RefCell<Adc<'d, Blocking>>,
    channel: Channel<'d>,
}

impl<'d> Rp2350Adc<'d> {
    pub fn new(adc: &'d RefCell<Adc<'d, Blocking>>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AdcInterface for Rp2350Adc<'_> {
    fn read_fraction(&mut self) -> Result<f32> {
        let raw = self
            .adc
            .borrow_mut()
            .blocking_read(&mut self.channel)
            .map_err(|_| PlatformError::Adc(AdcError::ConversionFailed))?;
        Ok((raw as f32 / ADC_FULL_SCALE).clamp(0.0, 1.0))
    }
}
