//! Mock ADC implementation for testing

use crate::platform::{traits::AdcInterface, Result};

/// Mock ADC channel
///
/// Returns a test-controlled reading; values outside [0.0, 1.0] are clamped
/// the same way hardware implementations clamp out-of-range conversions.
#[derive(Debug)]
pub struct MockAdc {
    value: f32,
}

impl MockAdc {
    /// Create a mock channel reading the given fraction.
    pub fn new(value: f32) -> Self {
        Self { value }
    }

    /// Set the value the next read will return.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }
}

impl AdcInterface for MockAdc {
    fn read_fraction(&mut self) -> Result<f32> {
        Ok(self.value.clamp(0.0, 1.0))
    }
}
