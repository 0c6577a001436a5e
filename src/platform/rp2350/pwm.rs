//! RP2350 PWM implementation.
//!
//! Wraps an `embassy_rp` PWM slice channel. The motor drive runs this at
//! 50 Hz for servo-style pulse widths; the lamp runs at a high frequency
//! for flicker-free dimming. Frequency changes pick the smallest clock
//! divider that keeps the counter top within 16 bits, so low frequencies
//! keep maximum duty resolution.

use embassy_rp::pwm::{Config as SliceConfig, Pwm};
use fixed::traits::ToFixed;

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};

/// Default system clock feeding the PWM slices.
const CLK_SYS_HZ: u32 = 150_000_000;

/// Which compare register of the slice this output drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    A,
    B,
}

pub struct Rp2350Pwm<'d> {
    pwm: Pwm<'d>,
    slice_config: SliceConfig,
    channel: PwmChannel,
    duty_cycle: f32,
    frequency: u32,
    enabled: bool,
}

impl<'d> Rp2350Pwm<'d> {
    /// Wrap a slice output and apply the initial configuration.
    ///
    /// The `Pwm` must have been created on the pin matching `channel`.
    pub fn new(pwm: Pwm<'d>, channel: PwmChannel, config: PwmConfig) -> Result<Self> {
        let mut out = Self {
            pwm,
            slice_config: SliceConfig::default(),
            channel,
            duty_cycle: 0.0,
            frequency: 0,
            enabled: false,
        };
        out.set_frequency(config.frequency)?;
        out.set_duty_cycle(config.duty_cycle)?;
        Ok(out)
    }

    /// Divider and counter top for a target frequency.
    fn timing_for(frequency: u32) -> Option<(u16, u16)> {
        if frequency == 0 || frequency > CLK_SYS_HZ / 2 {
            return None;
        }
        // Smallest integer divider that fits the period in a 16-bit counter
        let divider = (CLK_SYS_HZ / (frequency * 65_536)) + 1;
        if divider > 255 {
            return None;
        }
        let top = CLK_SYS_HZ / (divider * frequency);
        if top < 2 || top > 65_536 {
            return None;
        }
        Some((divider as u16, (top - 1) as u16))
    }

    fn apply(&mut self) {
        self.slice_config.enable = self.enabled;
        self.pwm.set_config(&self.slice_config);
    }
}

impl PwmInterface for Rp2350Pwm<'_> {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty_cycle = duty_cycle;
        let span = self.slice_config.top as u32 + 1;
        let compare = (duty_cycle * span as f32) as u32;
        let compare = compare.min(span) as u16;
        match self.channel {
            PwmChannel::A => self.slice_config.compare_a = compare,
            PwmChannel::B => self.slice_config.compare_b = compare,
        }
        self.apply();
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        let (divider, top) = Self::timing_for(frequency)
            .ok_or(PlatformError::Pwm(PwmError::InvalidFrequency))?;
        self.frequency = frequency;
        self.slice_config.divider = divider.to_fixed();
        self.slice_config.top = top;
        self.apply();
        // Reapply the duty so the compare tracks the new top
        self.set_duty_cycle(self.duty_cycle)
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.apply();
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.apply();
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
