//! Platform error types
//!
//! Platform implementations map their HAL-specific errors to these variants.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// ADC operation failed
    Adc(AdcError),
    /// PWM operation failed
    Pwm(PwmError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// Platform initialization failed
    InitializationFailed,
    /// Invalid configuration provided
    InvalidConfig,
}

/// ADC-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    /// Conversion did not complete
    ConversionFailed,
    /// Requested channel does not exist
    InvalidChannel,
}

/// PWM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Duty cycle outside [0.0, 1.0]
    InvalidDutyCycle,
    /// Frequency cannot be achieved with the current clock configuration
    InvalidFrequency,
    /// Pulse width outside the channel's period
    InvalidPulseWidth,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Invalid pin number
    InvalidPin,
    /// Invalid mode for operation
    InvalidMode,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Adc(e) => write!(f, "ADC error: {:?}", e),
            PlatformError::Pwm(e) => write!(f, "PWM error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "Platform initialization failed"),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}
