//! ADC interface trait
//!
//! The operator pots (speed, brightness, shutter blades/angle, slew rates)
//! are read through this interface as normalized fractions.

use crate::platform::Result;

/// ADC input interface
///
/// Platform implementations must provide this interface for analog reads.
///
/// # Safety Invariants
///
/// - The ADC peripheral must be initialized before use
/// - Only one owner per channel instance
pub trait AdcInterface {
    /// Read the channel as a normalized fraction.
    ///
    /// Returns a value in [0.0, 1.0]. Implementations clamp readings that
    /// fall outside the converter's expected range rather than erroring;
    /// `Err` is reserved for conversion failures.
    fn read_fraction(&mut self) -> Result<f32>;
}
