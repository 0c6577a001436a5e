//! Platform abstraction layer
//!
//! Hardware access for the control core goes exclusively through the traits
//! in [`traits`]; all platform-specific code lives under this module.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{AdcInterface, GpioInterface, PwmInterface};
