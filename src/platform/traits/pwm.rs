//! PWM interface trait
//!
//! Two outputs use this interface: the lamp (high-frequency duty-cycle
//! dimming) and the motor drive (servo-style pulse width at 50 Hz).

use crate::platform::Result;

/// PWM configuration
#[derive(Debug, Clone, Copy)]
pub struct PwmConfig {
    /// PWM frequency in Hz
    pub frequency: u32,
    /// Initial duty cycle (0.0 = 0%, 1.0 = 100%)
    pub duty_cycle: f32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 50, // 50 Hz for the motor drive pulse
            duty_cycle: 0.0,
        }
    }
}

/// PWM output interface
///
/// # Safety Invariants
///
/// - The PWM peripheral must be initialized before use
/// - Only one owner per channel
/// - Duty cycle must be in range [0.0, 1.0]
pub trait PwmInterface {
    /// Set PWM duty cycle as a fraction (0.0 = 0%, 1.0 = 100%).
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` if the duty
    /// cycle is outside [0.0, 1.0].
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    /// Get the current duty cycle.
    fn duty_cycle(&self) -> f32;

    /// Set the output high-time in microseconds.
    ///
    /// Convenience for servo-style signals: converts the pulse width to a
    /// duty cycle at the channel's current frequency.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidPulseWidth)` if the pulse
    /// is longer than the PWM period.
    fn set_pulse_width_us(&mut self, pulse_us: u32) -> Result<()> {
        let period_us = 1_000_000.0 / self.frequency() as f32;
        let duty = pulse_us as f32 / period_us;
        if duty > 1.0 {
            return Err(crate::platform::PlatformError::Pwm(
                crate::platform::error::PwmError::InvalidPulseWidth,
            ));
        }
        self.set_duty_cycle(duty)
    }

    /// Set PWM frequency in Hz.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidFrequency)` if the
    /// frequency cannot be achieved with the current clock configuration.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Get the current frequency in Hz.
    fn frequency(&self) -> u32;

    /// Enable the output.
    fn enable(&mut self);

    /// Disable the output.
    fn disable(&mut self);

    /// Check if the output is enabled.
    fn is_enabled(&self) -> bool;
}
